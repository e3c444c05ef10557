use chrono::Utc;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::meeting::{MeetingDraft, MeetingRow, MeetingType, TriggerReason};

pub async fn insert(
    pool: &PgPool,
    session_id: Uuid,
    meeting_type: MeetingType,
    draft: &MeetingDraft,
    reason: &TriggerReason,
) -> Result<MeetingRow, sqlx::Error> {
    sqlx::query_as::<_, MeetingRow>(
        r#"
        INSERT INTO meetings
            (id, session_id, meeting_type, title, context, participants,
             topics, conversation, current_topic, status, evaluation,
             trigger_reason, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 0, 'active', NULL, $9, $10, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(session_id)
    .bind(meeting_type.as_str())
    .bind(&draft.title)
    .bind(&draft.context)
    .bind(Json(&draft.participants))
    .bind(Json(&draft.topics))
    .bind(Json(Vec::<serde_json::Value>::new()))
    .bind(reason.to_tag())
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<MeetingRow>, sqlx::Error> {
    sqlx::query_as::<_, MeetingRow>("SELECT * FROM meetings WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_active(
    pool: &PgPool,
    session_id: Uuid,
) -> Result<Vec<MeetingRow>, sqlx::Error> {
    sqlx::query_as::<_, MeetingRow>(
        r#"
        SELECT * FROM meetings
        WHERE session_id = $1 AND status = 'active'
        ORDER BY created_at ASC
        "#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
}

pub async fn count_active(pool: &PgPool, session_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM meetings WHERE session_id = $1 AND status = 'active'",
    )
    .bind(session_id)
    .fetch_one(pool)
    .await
}

/// Writes back conversation progress and, once evaluated, the final state.
pub async fn save_progress(pool: &PgPool, meeting: &MeetingRow) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE meetings SET
            conversation = $2,
            current_topic = $3,
            status = $4,
            evaluation = $5,
            updated_at = $6
        WHERE id = $1
        "#,
    )
    .bind(meeting.id)
    .bind(&meeting.conversation)
    .bind(meeting.current_topic)
    .bind(&meeting.status)
    .bind(&meeting.evaluation)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}
