pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::meetings::handlers as meetings;
use crate::sessions::handlers as sessions;
use crate::state::AppState;
use crate::tasks::handlers as tasks;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route("/api/v1/sessions/:id", get(sessions::handle_get_session))
        .route(
            "/api/v1/sessions/:id/dashboard",
            get(sessions::handle_dashboard),
        )
        // Job market
        .route(
            "/api/v1/sessions/:id/jobs/generate",
            post(jobs::handle_generate_jobs),
        )
        .route("/api/v1/sessions/:id/jobs", get(jobs::handle_list_jobs))
        .route(
            "/api/v1/sessions/:id/jobs/:job_id/interview",
            post(jobs::handle_start_interview),
        )
        .route(
            "/api/v1/sessions/:id/jobs/:job_id/interview/submit",
            post(jobs::handle_submit_interview),
        )
        // Work
        .route(
            "/api/v1/sessions/:id/tasks/:task_id/submit",
            post(tasks::handle_submit_task),
        )
        .route(
            "/api/v1/sessions/:id/meetings/:meeting_id/respond",
            post(meetings::handle_respond),
        )
        .route(
            "/api/v1/sessions/:id/meetings/:meeting_id/complete",
            post(meetings::handle_complete),
        )
        .with_state(state)
}
