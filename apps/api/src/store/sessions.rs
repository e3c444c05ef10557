use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::session::{CvData, SessionRow, SessionStats, SessionStatus};

/// Creates a fresh session for a profession, already searching for work.
pub async fn create(
    pool: &PgPool,
    profession: &str,
    level: i32,
) -> Result<SessionRow, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>(
        r#"
        INSERT INTO sessions
            (id, profession, level, xp, status, current_job_id,
             job_history, cv, stats, tasks_since_last_meeting,
             recent_meeting_types, created_at, updated_at)
        VALUES ($1, $2, $3, 0, $4, NULL, $5, $6, $7, 0, $8, $9, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(profession)
    .bind(level)
    .bind(SessionStatus::JobSearching.as_str())
    .bind(Json(Vec::<serde_json::Value>::new()))
    .bind(Json(CvData::default()))
    .bind(Json(SessionStats::default()))
    .bind(Json(Vec::<String>::new()))
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Writes back every mutable session field. Handlers mutate the row in
/// memory through a request and persist once at the end.
pub async fn save(pool: &PgPool, session: &SessionRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE sessions SET
            level = $2,
            xp = $3,
            status = $4,
            current_job_id = $5,
            job_history = $6,
            cv = $7,
            stats = $8,
            tasks_since_last_meeting = $9,
            recent_meeting_types = $10,
            updated_at = $11
        WHERE id = $1
        "#,
    )
    .bind(session.id)
    .bind(session.level)
    .bind(session.xp)
    .bind(&session.status)
    .bind(session.current_job_id)
    .bind(&session.job_history)
    .bind(&session.cv)
    .bind(&session.stats)
    .bind(session.tasks_since_last_meeting)
    .bind(&session.recent_meeting_types)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}
