//! Dashboard coordinator: decides when meetings appear and when the task
//! board is topped up. Planning (`coordinator`) is pure and seeded-testable;
//! row creation lives in `executor`; tier and probability knobs in `policy`.

pub mod coordinator;
pub mod executor;
pub mod policy;

use sqlx::PgPool;

use crate::models::session::SessionRow;
use crate::store;

pub use coordinator::{plan, DashboardEvent, DashboardPlan, DashboardSnapshot};
pub use executor::{execute_plan, ExecutionReport};

/// Reads the counts the planner needs for one session.
pub async fn snapshot(
    pool: &PgPool,
    session: &SessionRow,
) -> Result<DashboardSnapshot, sqlx::Error> {
    let active_tasks = store::tasks::count_open(pool, session.id).await? as u32;
    let active_meetings = store::meetings::count_active(pool, session.id).await? as u32;
    Ok(DashboardSnapshot {
        player_level: session.level as u32,
        tasks_since_last_meeting: session.tasks_since_last_meeting.max(0) as u32,
        active_tasks,
        active_meetings,
        recent_meeting_types: session.recent_meeting_types.0.clone(),
    })
}
