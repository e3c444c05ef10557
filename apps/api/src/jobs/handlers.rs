//! Axum route handlers for the job market: listing generation, browsing,
//! and the interview flow that ends in a hire.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dashboard;
use crate::errors::AppError;
use crate::generation::cv::{update_cv, CvAction};
use crate::generation::generator;
use crate::grading::{grader, PASS_THRESHOLD};
use crate::models::job::{JobListingRow, JobStatus};
use crate::models::session::{JobHistoryEntry, SessionStatus};
use crate::progression;
use crate::sessions::handlers::load_session;
use crate::state::AppState;
use crate::store;

const DEFAULT_JOB_BATCH: u32 = 5;
const INTERVIEW_PASS_XP: u32 = 100;

#[derive(Debug, Default, Deserialize)]
pub struct GenerateJobsRequest {
    pub count: Option<u32>,
    pub player_level: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitInterviewRequest {
    pub answers: Vec<String>,
}

/// POST /api/v1/sessions/:id/jobs/generate
/// Replaces the job board: active listings expire, a fresh batch lands.
pub async fn handle_generate_jobs(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    req: Option<Json<GenerateJobsRequest>>,
) -> Result<Json<Value>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    if session.status() == SessionStatus::Interviewing {
        return Err(AppError::Validation(
            "finish or abandon the current interview before browsing jobs".into(),
        ));
    }

    let req = req.map(|Json(r)| r).unwrap_or_default();
    let count = req.count.unwrap_or(DEFAULT_JOB_BATCH);
    let player_level = req.player_level.unwrap_or(session.level.max(1) as u32);

    let expired = store::jobs::expire_active(&state.db, session_id).await?;
    if expired > 0 {
        tracing::debug!(session_id = %session_id, expired, "expired stale listings");
    }

    let drafts = generator::generate_jobs(&state.llm, &session.profession, player_level, count).await;
    let mut jobs = Vec::with_capacity(drafts.len());
    for draft in &drafts {
        jobs.push(store::jobs::insert(&state.db, session_id, draft).await?);
    }
    tracing::info!(session_id = %session_id, count = jobs.len(), "job batch generated");

    if session.status() == SessionStatus::Graduated {
        session.status = SessionStatus::JobSearching.as_str().to_string();
        store::sessions::save(&state.db, &session).await?;
    }

    Ok(Json(json!({
        "jobs": jobs.iter().map(|j| j.to_public()).collect::<Vec<_>>(),
    })))
}

/// GET /api/v1/sessions/:id/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    load_session(&state, session_id).await?;
    let jobs = store::jobs::list_active(&state.db, session_id).await?;
    Ok(Json(json!({
        "jobs": jobs.iter().map(|j| j.to_public()).collect::<Vec<_>>(),
    })))
}

/// POST /api/v1/sessions/:id/jobs/:job_id/interview
/// Starts an interview: questions are generated on first request and cached
/// on the listing; expected answers never leave the server.
pub async fn handle_start_interview(
    State(state): State<AppState>,
    Path((session_id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    let job = load_job(&state, session_id, job_id).await?;
    if job.status != JobStatus::Active.as_str() {
        return Err(AppError::Validation(format!(
            "job is no longer open (status: {})",
            job.status
        )));
    }

    let questions = match &job.interview_questions {
        Some(qs) => qs.0.clone(),
        None => {
            let generated = generator::generate_interview_questions(&state.llm, &job).await?;
            store::jobs::set_interview_questions(&state.db, job_id, &generated).await?;
            generated
        }
    };

    session.status = SessionStatus::Interviewing.as_str().to_string();
    store::sessions::save(&state.db, &session).await?;
    tracing::info!(session_id = %session_id, job_id = %job_id, "interview started");

    Ok(Json(json!({
        "job_id": job_id,
        "questions": questions.iter().map(|q| &q.question).collect::<Vec<_>>(),
    })))
}

/// POST /api/v1/sessions/:id/jobs/:job_id/interview/submit
/// Grades every answer, averages the scores, and hires on a passing mean.
pub async fn handle_submit_interview(
    State(state): State<AppState>,
    Path((session_id, job_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SubmitInterviewRequest>,
) -> Result<Json<Value>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    if session.status() != SessionStatus::Interviewing {
        return Err(AppError::Validation(
            "no interview in progress for this session".into(),
        ));
    }
    let job = load_job(&state, session_id, job_id).await?;
    let questions = job
        .interview_questions
        .as_ref()
        .map(|qs| qs.0.clone())
        .ok_or_else(|| AppError::Validation("interview has not been started".into()))?;
    if req.answers.len() != questions.len() {
        return Err(AppError::Validation(format!(
            "expected {} answers, got {}",
            questions.len(),
            req.answers.len()
        )));
    }

    let mut feedback = Vec::with_capacity(questions.len());
    let mut total: u32 = 0;
    for (question, answer) in questions.iter().zip(&req.answers) {
        let result = grader::grade_free_text(
            &state.llm,
            &question.question,
            &question.expected_answer,
            answer,
        )
        .await?;
        total += result.score;
        feedback.push(json!({
            "question": question.question,
            "score": result.score,
            "feedback": result.feedback,
        }));
    }
    let overall_score = total / questions.len() as u32;
    let passed = overall_score >= PASS_THRESHOLD;

    let mut xp_gained = 0;
    let mut level_up = false;
    if passed {
        let progress = progression::add_xp(
            session.level.max(1) as u32,
            session.xp.max(0) as u32,
            INTERVIEW_PASS_XP,
        );
        xp_gained = INTERVIEW_PASS_XP;
        level_up = progress.leveled_up;
        session.level = progress.level as i32;
        session.xp = progress.xp as i32;
        session.status = SessionStatus::Employed.as_str().to_string();
        session.current_job_id = Some(job.id);
        session.job_history.0.push(JobHistoryEntry {
            job_id: job.id,
            company: job.company.clone(),
            position: job.position.clone(),
            accepted_at: Utc::now(),
        });
        session.cv = sqlx::types::Json(update_cv(
            session.cv.0.clone(),
            CvAction::AddJob {
                company: job.company.clone(),
                position: job.position.clone(),
                summary: format!("Hired as {} after a passing interview", job.position),
            },
        ));
        session.stats.0.jobs_held += 1;
        session.stats.0.interviews_passed += 1;
        // Counter starts fresh at the new job.
        session.tasks_since_last_meeting = 0;

        // The accepted listing leaves the market along with its siblings.
        store::jobs::expire_active(&state.db, session_id).await?;
        store::jobs::set_status(&state.db, job.id, JobStatus::Applied).await?;

        // Seed the empty dashboard.
        let snapshot = dashboard::snapshot(&state.db, &session).await?;
        let plan = dashboard::plan(
            &dashboard::DashboardEvent::Hired,
            &snapshot,
            &mut StdRng::from_os_rng(),
        );
        dashboard::execute_plan(
            &state.db,
            &state.llm,
            &mut session,
            &plan,
            &job.position,
            &job.company,
            None,
        )
        .await?;
        tracing::info!(session_id = %session_id, job_id = %job_id, overall_score, "hired");
    } else {
        session.status = SessionStatus::JobSearching.as_str().to_string();
        session.stats.0.interviews_failed += 1;
        tracing::info!(session_id = %session_id, job_id = %job_id, overall_score, "interview failed");
    }

    store::sessions::save(&state.db, &session).await?;

    Ok(Json(json!({
        "passed": passed,
        "overall_score": overall_score,
        "feedback": feedback,
        "xp_gained": xp_gained,
        "new_level": session.level,
        "level_up": level_up,
    })))
}

/// Job lookup scoped to a session: wrong session gets a 403, unknown id a 404.
async fn load_job(
    state: &AppState,
    session_id: Uuid,
    job_id: Uuid,
) -> Result<JobListingRow, AppError> {
    let job = store::jobs::get(&state.db, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job {job_id} not found")))?;
    if job.session_id != session_id {
        return Err(AppError::Forbidden(
            "job belongs to a different session".into(),
        ));
    }
    Ok(job)
}
