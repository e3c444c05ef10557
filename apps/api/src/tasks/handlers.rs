//! Axum route handler for task submission. One request runs the whole
//! pipeline: grade, XP ledger, coordinator planning, content generation,
//! and a single session write at the end.

use axum::{
    extract::{Path, State},
    Json,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dashboard;
use crate::errors::AppError;
use crate::grading::grader;
use crate::models::session::SessionStatus;
use crate::models::task::{TaskStatus, MAX_TASK_ATTEMPTS};
use crate::progression;
use crate::sessions::handlers::load_session;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct SubmitTaskRequest {
    pub solution: Value,
}

/// POST /api/v1/sessions/:id/tasks/:task_id/submit
pub async fn handle_submit_task(
    State(state): State<AppState>,
    Path((session_id, task_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SubmitTaskRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    if session.status() != SessionStatus::Employed {
        return Err(AppError::Validation(
            "tasks can only be submitted while employed".into(),
        ));
    }
    let mut task = store::tasks::get(&state.db, task_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("task {task_id} not found")))?;
    if task.session_id != session_id {
        return Err(AppError::Forbidden(
            "task belongs to a different session".into(),
        ));
    }
    if !task.is_open() {
        return Err(AppError::Validation(format!(
            "task is already {}",
            task.status
        )));
    }

    let result = grader::grade_task(&state.llm, &task, &req.solution).await?;

    task.attempts += 1;
    task.score = Some(result.score as i32);
    let mut xp_gained: u32 = 0;
    let mut level_up = false;

    let event = if result.passed {
        task.status = TaskStatus::Completed.as_str().to_string();
        task.consecutive_failures = 0;
        session.stats.0.tasks_completed += 1;

        xp_gained = task.xp_reward.max(0) as u32;
        let progress = progression::add_xp(
            session.level.max(1) as u32,
            session.xp.max(0) as u32,
            xp_gained,
        );
        level_up = progress.leveled_up;
        session.level = progress.level as i32;
        session.xp = progress.xp as i32;

        dashboard::DashboardEvent::TaskCompleted
    } else {
        task.consecutive_failures += 1;
        task.status = failure_status(task.attempts).as_str().to_string();
        dashboard::DashboardEvent::TaskFailed {
            task_id: task.id,
            consecutive_failures: task.consecutive_failures.max(0) as u32,
        }
    };
    store::tasks::save_outcome(&state.db, &task).await?;
    tracing::info!(
        session_id = %session_id,
        task_id = %task_id,
        score = result.score,
        passed = result.passed,
        "task graded"
    );

    // Plan against post-grade counts, then create whatever the plan asks for.
    let snapshot = dashboard::snapshot(&state.db, &session).await?;
    let plan = dashboard::plan(&event, &snapshot, &mut StdRng::from_os_rng());
    let (position, company) = workplace(&state, &session).await?;
    let report = dashboard::execute_plan(
        &state.db,
        &state.llm,
        &mut session,
        &plan,
        &position,
        &company,
        None,
    )
    .await?;

    store::sessions::save(&state.db, &session).await?;

    let meeting = report.created_meeting.as_ref();
    Ok(Json(json!({
        "passed": result.passed,
        "score": result.score,
        "feedback": result.feedback,
        "xp_gained": xp_gained,
        "new_level": session.level,
        "level_up": level_up,
        "new_task": report.created_tasks.first().map(|t| t.to_public()),
        "meeting_triggered": meeting.is_some(),
        "meeting_id": meeting.map(|m| m.id),
        "meeting_type": meeting.map(|m| m.meeting_type.clone()),
    })))
}

/// Status after a failed graded attempt: the task stays in progress until
/// the attempt budget is spent, then closes as failed.
fn failure_status(attempts: i32) -> TaskStatus {
    if attempts >= MAX_TASK_ATTEMPTS {
        TaskStatus::Failed
    } else {
        TaskStatus::InProgress
    }
}

/// Position and company for generation prompts, from the current job.
pub async fn workplace(
    state: &AppState,
    session: &crate::models::session::SessionRow,
) -> Result<(String, String), AppError> {
    if let Some(job_id) = session.current_job_id {
        if let Some(job) = store::jobs::get(&state.db, job_id).await? {
            return Ok((job.position, job.company));
        }
    }
    // Degenerate state; prompts still work with the profession alone.
    Ok((session.profession.clone(), "the company".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_attempt_keeps_task_in_progress_until_budget_spent() {
        assert_eq!(failure_status(1), TaskStatus::InProgress);
        assert_eq!(failure_status(MAX_TASK_ATTEMPTS - 1), TaskStatus::InProgress);
        assert_eq!(failure_status(MAX_TASK_ATTEMPTS), TaskStatus::Failed);
        assert_eq!(failure_status(MAX_TASK_ATTEMPTS + 1), TaskStatus::Failed);
    }
}
