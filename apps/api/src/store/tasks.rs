use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::task::{TaskDraft, TaskRow, TaskStatus};

pub async fn insert(
    pool: &PgPool,
    session_id: Uuid,
    draft: &TaskDraft,
    source: Option<&str>,
    source_meeting_id: Option<Uuid>,
) -> Result<TaskRow, sqlx::Error> {
    sqlx::query_as::<_, TaskRow>(
        r#"
        INSERT INTO tasks
            (id, session_id, title, description, format, payload, difficulty,
             xp_reward, status, attempts, consecutive_failures, score,
             source, source_meeting_id, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, 0, NULL, $10, $11, $12, $12)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session_id)
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(draft.payload.format().as_str())
    .bind(Json(&draft.payload))
    .bind(draft.difficulty)
    .bind(draft.xp_reward)
    .bind(TaskStatus::Pending.as_str())
    .bind(source)
    .bind(source_meeting_id)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<TaskRow>, sqlx::Error> {
    sqlx::query_as::<_, TaskRow>("SELECT * FROM tasks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Open tasks are pending or in progress; completed and failed ones no
/// longer count toward the board.
pub async fn list_open(pool: &PgPool, session_id: Uuid) -> Result<Vec<TaskRow>, sqlx::Error> {
    sqlx::query_as::<_, TaskRow>(
        r#"
        SELECT * FROM tasks
        WHERE session_id = $1 AND status IN ('pending', 'in_progress')
        ORDER BY created_at ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

pub async fn count_open(pool: &PgPool, session_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM tasks WHERE session_id = $1 AND status IN ('pending', 'in_progress')",
    )
    .bind(session_id)
    .fetch_one(pool)
    .await
}

/// Persists the grading outcome fields after a submission.
pub async fn save_outcome(pool: &PgPool, task: &TaskRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE tasks SET
            status = $2,
            attempts = $3,
            consecutive_failures = $4,
            score = $5,
            updated_at = $6
        WHERE id = $1
        "#,
    )
    .bind(task.id)
    .bind(&task.status)
    .bind(task.attempts)
    .bind(task.consecutive_failures)
    .bind(task.score)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Titles of the most recently completed tasks, newest first. Feeds meeting
/// generation so conversations reference real work.
pub async fn recent_completed_titles(
    pool: &PgPool,
    session_id: Uuid,
    limit: i64,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        r#"
        SELECT title FROM tasks
        WHERE session_id = $1 AND status = 'completed'
        ORDER BY updated_at DESC
        LIMIT $2
        "#,
    )
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .await
}
