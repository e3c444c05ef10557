//! I/O half of the dashboard coordinator: turns a `DashboardPlan` into rows.
//!
//! Content generation is best effort. A meeting that fails to generate is
//! logged and skipped; the next planning pass sees an empty board and tries
//! again. Database errors are not survivable and propagate.

use sqlx::PgPool;
use tracing::{info, warn};

use crate::dashboard::coordinator::DashboardPlan;
use crate::generation::generator;
use crate::llm_client::LlmClient;
use crate::models::meeting::MeetingRow;
use crate::models::session::SessionRow;
use crate::models::task::TaskRow;
use crate::store;

/// Tag stored on tasks spawned from a meeting outcome.
const SOURCE_MEETING: &str = "meeting";

#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub created_meeting: Option<MeetingRow>,
    pub created_tasks: Vec<TaskRow>,
}

/// Applies a plan: inserts the meeting and task rows it calls for and
/// updates the in-memory session counters. The caller persists the session
/// row afterwards, once, together with its other changes.
pub async fn execute_plan(
    pool: &PgPool,
    llm: &LlmClient,
    session: &mut SessionRow,
    plan: &DashboardPlan,
    position: &str,
    company: &str,
    follow_up_origin: Option<&str>,
) -> Result<ExecutionReport, sqlx::Error> {
    let mut report = ExecutionReport::default();
    let player_level = session.level as u32;
    let tasks_completed = session.stats.0.tasks_completed;

    if let Some(request) = &plan.meeting_request {
        let recent_titles = store::tasks::recent_completed_titles(pool, session.id, 5).await?;
        match generator::generate_meeting(
            llm,
            request.meeting_type,
            position,
            player_level,
            &recent_titles,
        )
        .await
        {
            Ok(draft) => {
                let row = store::meetings::insert(
                    pool,
                    session.id,
                    request.meeting_type,
                    &draft,
                    &request.reason,
                )
                .await?;
                session.push_recent_meeting_type(request.meeting_type.as_str());
                info!(
                    meeting_id = %row.id,
                    meeting_type = request.meeting_type.as_str(),
                    reason = %request.reason.to_tag(),
                    "meeting scheduled"
                );
                report.created_meeting = Some(row);
            }
            Err(e) => warn!("meeting generation failed, continuing without one: {e}"),
        }
    }

    for _ in 0..plan.follow_up_tasks {
        let draft = generator::generate_task(
            llm,
            position,
            company,
            player_level,
            tasks_completed,
            follow_up_origin,
        )
        .await;
        let row =
            store::tasks::insert(pool, session.id, &draft, Some(SOURCE_MEETING), plan.follow_up_source)
                .await?;
        info!(task_id = %row.id, "follow-up task created from meeting outcome");
        report.created_tasks.push(row);
    }

    for _ in 0..plan.replenish_tasks {
        let draft =
            generator::generate_task(llm, position, company, player_level, tasks_completed, None)
                .await;
        let row = store::tasks::insert(pool, session.id, &draft, None, None).await?;
        info!(task_id = %row.id, "task board replenished");
        report.created_tasks.push(row);
    }

    session.tasks_since_last_meeting = plan.tasks_since_last_meeting as i32;
    Ok(report)
}
