use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::job::{InterviewQuestion, JobDraft, JobListingRow, JobStatus};

pub async fn insert(
    pool: &PgPool,
    session_id: Uuid,
    draft: &JobDraft,
) -> Result<JobListingRow, sqlx::Error> {
    sqlx::query_as::<_, JobListingRow>(
        r#"
        INSERT INTO job_listings
            (id, session_id, company, position, location, job_type,
             salary_min, salary_max, level, requirements, responsibilities,
             benefits, description, status, interview_questions, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, NULL, $15)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session_id)
    .bind(&draft.company)
    .bind(&draft.position)
    .bind(&draft.location)
    .bind(draft.job_type.as_str())
    .bind(draft.salary_min)
    .bind(draft.salary_max)
    .bind(draft.level.as_str())
    .bind(&draft.requirements)
    .bind(&draft.responsibilities)
    .bind(&draft.benefits)
    .bind(&draft.description)
    .bind(JobStatus::Active.as_str())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<JobListingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobListingRow>("SELECT * FROM job_listings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_active(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Vec<JobListingRow>, sqlx::Error> {
    sqlx::query_as::<_, JobListingRow>(
        r#"
        SELECT * FROM job_listings
        WHERE session_id = $1 AND status = 'active'
        ORDER BY created_at DESC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

/// Expires every active listing for a session. Called before a new batch is
/// generated so only the latest batch is ever applicable.
pub async fn expire_active(pool: &PgPool, session_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE job_listings SET status = 'expired' WHERE session_id = $1 AND status = 'active'",
    )
    .bind(session_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn set_interview_questions(
    pool: &PgPool,
    job_id: Uuid,
    questions: &[InterviewQuestion],
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE job_listings SET interview_questions = $2 WHERE id = $1")
        .bind(job_id)
        .bind(Json(questions))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn set_status(
    pool: &PgPool,
    job_id: Uuid,
    status: JobStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE job_listings SET status = $2 WHERE id = $1")
        .bind(job_id)
        .bind(status.as_str())
        .execute(pool)
        .await?;
    Ok(())
}
