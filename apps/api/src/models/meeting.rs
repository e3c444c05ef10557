use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingType {
    OneOnOne,
    TeamMeeting,
    StakeholderPresentation,
    PerformanceReview,
    ProjectUpdate,
    FeedbackSession,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::OneOnOne => "one_on_one",
            MeetingType::TeamMeeting => "team_meeting",
            MeetingType::StakeholderPresentation => "stakeholder_presentation",
            MeetingType::PerformanceReview => "performance_review",
            MeetingType::ProjectUpdate => "project_update",
            MeetingType::FeedbackSession => "feedback_session",
        }
    }
}

/// Why a meeting was generated. Recorded for provenance, never consulted by
/// game logic after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerReason {
    TaskCompletion,
    TaskFailure(Uuid),
    DashboardReplenishment,
}

impl TriggerReason {
    pub fn to_tag(&self) -> String {
        match self {
            TriggerReason::TaskCompletion => "task_completion".to_string(),
            TriggerReason::TaskFailure(task_id) => format!("task_failure_{task_id}"),
            TriggerReason::DashboardReplenishment => "dashboard_replenishment".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: String,
    pub personality: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingTopic {
    pub question: String,
    pub context: String,
    pub expected_points: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub speaker: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of the single completion-evaluation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingEvaluation {
    pub score: i32,
    pub xp_earned: i32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MeetingRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub meeting_type: String,
    pub title: String,
    pub context: String,
    pub participants: Json<Vec<Participant>>,
    pub topics: Json<Vec<MeetingTopic>>,
    pub conversation: Json<Vec<ConversationEntry>>,
    pub current_topic: i32,
    pub status: String,
    pub evaluation: Option<Json<MeetingEvaluation>>,
    pub trigger_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MeetingRow {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// All topics answered; the meeting is ready for its completion evaluation.
    pub fn all_topics_answered(&self) -> bool {
        self.current_topic as usize >= self.topics.0.len()
    }

    /// Client-facing view: expected discussion points are stripped.
    pub fn to_public(&self) -> Value {
        let topics: Vec<Value> = self
            .topics
            .0
            .iter()
            .map(|t| serde_json::json!({ "question": t.question, "context": t.context }))
            .collect();
        serde_json::json!({
            "id": self.id,
            "meeting_type": self.meeting_type,
            "title": self.title,
            "context": self.context,
            "participants": self.participants.0,
            "topics": topics,
            "conversation": self.conversation.0,
            "current_topic": self.current_topic,
            "status": self.status,
            "trigger_reason": self.trigger_reason,
        })
    }
}

/// A validated meeting produced by the generator, ready for insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingDraft {
    pub title: String,
    pub context: String,
    pub participants: Vec<Participant>,
    pub topics: Vec<MeetingTopic>,
}
