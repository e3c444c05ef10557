//! Axum route handlers for the meeting conversation loop and the single
//! end-of-meeting evaluation.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::types::Json as SqlJson;
use uuid::Uuid;

use crate::dashboard;
use crate::errors::AppError;
use crate::generation::generator;
use crate::models::meeting::{ConversationEntry, MeetingEvaluation, MeetingRow};
use crate::progression;
use crate::sessions::handlers::load_session;
use crate::state::AppState;
use crate::store;
use crate::tasks::handlers::workplace;

/// XP for a meeting the evaluator scored at or above the pass bar.
const MEETING_XP_GOOD: u32 = 50;
/// Consolation XP: showing up still teaches something.
const MEETING_XP_POOR: u32 = 20;

const PLAYER_SPEAKER: &str = "player";

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub topic_id: i32,
    pub response: String,
}

/// POST /api/v1/sessions/:id/meetings/:meeting_id/respond
/// One conversational turn: the player answers the current topic, the
/// participants react, the meeting advances to the next topic.
pub async fn handle_respond(
    State(state): State<AppState>,
    Path((session_id, meeting_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<RespondRequest>,
) -> Result<Json<Value>, AppError> {
    load_session(&state, session_id).await?;
    let mut meeting = load_meeting(&state, session_id, meeting_id).await?;
    if !meeting.is_active() {
        return Err(AppError::Validation("meeting is already completed".into()));
    }
    if meeting.all_topics_answered() {
        return Err(AppError::Validation(
            "all topics are answered, complete the meeting".into(),
        ));
    }
    if req.topic_id != meeting.current_topic {
        return Err(AppError::Validation(format!(
            "topic {} is not the current topic ({})",
            req.topic_id, meeting.current_topic
        )));
    }
    let response = req.response.trim();
    if response.is_empty() {
        return Err(AppError::Validation("response must not be empty".into()));
    }

    meeting.conversation.0.push(ConversationEntry {
        speaker: PLAYER_SPEAKER.to_string(),
        content: response.to_string(),
        timestamp: Utc::now(),
    });

    let replies = generator::generate_meeting_replies(&state.llm, &meeting, response).await?;
    let now = Utc::now();
    for reply in &replies.replies {
        meeting.conversation.0.push(ConversationEntry {
            speaker: reply.speaker.clone(),
            content: reply.content.clone(),
            timestamp: now,
        });
    }

    meeting.current_topic += 1;
    let meeting_complete = meeting.all_topics_answered();
    store::meetings::save_progress(&state.db, &meeting).await?;
    tracing::info!(
        meeting_id = %meeting_id,
        topic = req.topic_id,
        replies = replies.replies.len(),
        "meeting turn recorded"
    );

    Ok(Json(respond_payload(
        &replies,
        meeting.current_topic,
        meeting_complete,
    )))
}

fn respond_payload(
    replies: &generator::MeetingReplies,
    next_topic_index: i32,
    meeting_complete: bool,
) -> Value {
    json!({
        "ai_responses": replies
            .replies
            .iter()
            .map(|r| json!({ "speaker": r.speaker, "content": r.content }))
            .collect::<Vec<_>>(),
        "evaluation": replies.assessment,
        "next_topic_index": next_topic_index,
        "meeting_complete": meeting_complete,
    })
}

/// POST /api/v1/sessions/:id/meetings/:meeting_id/complete
/// Evaluates the whole conversation in one call, pays out XP, and lets the
/// coordinator schedule follow-up work.
pub async fn handle_complete(
    State(state): State<AppState>,
    Path((session_id, meeting_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let mut session = load_session(&state, session_id).await?;
    let mut meeting = load_meeting(&state, session_id, meeting_id).await?;
    if !meeting.is_active() {
        return Err(AppError::Validation("meeting is already completed".into()));
    }
    if !meeting.all_topics_answered() {
        return Err(AppError::Validation(format!(
            "{} of {} topics still unanswered",
            meeting.topics.0.len() - meeting.current_topic.max(0) as usize,
            meeting.topics.0.len()
        )));
    }

    let outcome = generator::evaluate_meeting(&state.llm, &meeting).await?;
    let xp_gained = if outcome.score >= 70 {
        MEETING_XP_GOOD
    } else {
        MEETING_XP_POOR
    };
    let progress = progression::add_xp(
        session.level.max(1) as u32,
        session.xp.max(0) as u32,
        xp_gained,
    );
    session.level = progress.level as i32;
    session.xp = progress.xp as i32;

    meeting.status = "completed".to_string();
    meeting.evaluation = Some(SqlJson(MeetingEvaluation {
        score: outcome.score,
        xp_earned: xp_gained as i32,
        strengths: outcome.strengths.clone(),
        improvements: outcome.improvements.clone(),
    }));
    store::meetings::save_progress(&state.db, &meeting).await?;
    tracing::info!(
        meeting_id = %meeting_id,
        score = outcome.score,
        follow_ups = outcome.follow_up_task_count,
        "meeting completed"
    );

    let event = dashboard::DashboardEvent::MeetingCompleted {
        meeting_id,
        should_generate_tasks: outcome.should_generate_tasks,
        follow_up_task_count: outcome.follow_up_task_count,
    };
    let snapshot = dashboard::snapshot(&state.db, &session).await?;
    let plan = dashboard::plan(&event, &snapshot, &mut StdRng::from_os_rng());
    let (position, company) = workplace(&state, &session).await?;
    let origin = (!outcome.follow_up_summary.trim().is_empty())
        .then_some(outcome.follow_up_summary.as_str());
    let report = dashboard::execute_plan(
        &state.db,
        &state.llm,
        &mut session,
        &plan,
        &position,
        &company,
        origin,
    )
    .await?;

    store::sessions::save(&state.db, &session).await?;

    Ok(Json(json!({
        "overall_score": outcome.score,
        "xp_gained": xp_gained,
        "level_up": progress.leveled_up,
        "new_level": session.level,
        "generated_tasks": report.created_tasks.iter().map(|t| t.to_public()).collect::<Vec<_>>(),
    })))
}

/// Meeting lookup scoped to a session.
async fn load_meeting(
    state: &AppState,
    session_id: Uuid,
    meeting_id: Uuid,
) -> Result<MeetingRow, AppError> {
    let meeting = store::meetings::get(&state.db, meeting_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("meeting {meeting_id} not found")))?;
    if meeting.session_id != session_id {
        return Err(AppError::Forbidden(
            "meeting belongs to a different session".into(),
        ));
    }
    Ok(meeting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::generator::{MeetingReplies, MeetingReply};

    #[test]
    fn test_respond_payload_carries_per_turn_evaluation() {
        let replies = MeetingReplies {
            replies: vec![MeetingReply {
                speaker: "Priya (Engineering Manager)".to_string(),
                content: "That tradeoff makes sense.".to_string(),
            }],
            assessment: Some("Clear reasoning, grounded in the incident timeline.".to_string()),
        };
        let payload = respond_payload(&replies, 2, false);
        assert_eq!(
            payload["evaluation"],
            "Clear reasoning, grounded in the incident timeline."
        );
        assert_eq!(payload["next_topic_index"], 2);
        assert_eq!(payload["meeting_complete"], false);
        assert_eq!(payload["ai_responses"][0]["speaker"], "Priya (Engineering Manager)");
    }

    #[test]
    fn test_respond_payload_evaluation_is_nullable() {
        let replies = MeetingReplies {
            replies: Vec::new(),
            assessment: None,
        };
        let payload = respond_payload(&replies, 1, true);
        assert!(payload["evaluation"].is_null());
        assert_eq!(payload["meeting_complete"], true);
    }
}
