use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A task is marked failed (no longer retryable) after this many attempts.
pub const MAX_TASK_ATTEMPTS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskFormat {
    TextAnswer,
    MultipleChoice,
    FillInBlank,
    Matching,
    CodeReview,
    Prioritization,
}

impl TaskFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskFormat::TextAnswer => "text_answer",
            TaskFormat::MultipleChoice => "multiple_choice",
            TaskFormat::FillInBlank => "fill_in_blank",
            TaskFormat::Matching => "matching",
            TaskFormat::CodeReview => "code_review",
            TaskFormat::Prioritization => "prioritization",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct McOption {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityItem {
    pub id: String,
    pub text: String,
}

/// Format-specific task content. The tagged representation guarantees exactly
/// one variant is populated; `format()` must agree with the row's format column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum TaskPayload {
    TextAnswer {
        expected_points: Vec<String>,
    },
    MultipleChoice {
        options: Vec<McOption>,
        correct_answer: String,
    },
    FillInBlank {
        /// Prompt text with blank markers, e.g. "A ___ is sent before the ___".
        text: String,
        /// Expected answers, one per blank, in order.
        blanks: Vec<String>,
    },
    Matching {
        left: Vec<String>,
        right: Vec<String>,
        correct_pairs: Vec<MatchingPair>,
    },
    CodeReview {
        code: String,
        bugs: Vec<String>,
    },
    Prioritization {
        items: Vec<PriorityItem>,
        correct_order: Vec<String>,
    },
}

impl TaskPayload {
    pub fn format(&self) -> TaskFormat {
        match self {
            TaskPayload::TextAnswer { .. } => TaskFormat::TextAnswer,
            TaskPayload::MultipleChoice { .. } => TaskFormat::MultipleChoice,
            TaskPayload::FillInBlank { .. } => TaskFormat::FillInBlank,
            TaskPayload::Matching { .. } => TaskFormat::Matching,
            TaskPayload::CodeReview { .. } => TaskFormat::CodeReview,
            TaskPayload::Prioritization { .. } => TaskFormat::Prioritization,
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaskRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub title: String,
    pub description: String,
    pub format: String,
    pub payload: Json<TaskPayload>,
    pub difficulty: i32,
    pub xp_reward: i32,
    pub status: String,
    pub attempts: i32,
    pub consecutive_failures: i32,
    pub score: Option<i32>,
    pub source: Option<String>,
    pub source_meeting_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRow {
    pub fn is_open(&self) -> bool {
        self.status == "pending" || self.status == "in_progress"
    }

    /// Client-facing view: grading keys (correct answers, expected points,
    /// known bugs, correct ordering) are stripped from the payload.
    pub fn to_public(&self) -> Value {
        let content = match &self.payload.0 {
            TaskPayload::TextAnswer { .. } => serde_json::json!({}),
            TaskPayload::MultipleChoice { options, .. } => serde_json::json!({ "options": options }),
            TaskPayload::FillInBlank { text, blanks } => {
                serde_json::json!({ "text": text, "blank_count": blanks.len() })
            }
            TaskPayload::Matching { left, right, .. } => {
                serde_json::json!({ "left": left, "right": right })
            }
            TaskPayload::CodeReview { code, bugs } => {
                serde_json::json!({ "code": code, "bug_count": bugs.len() })
            }
            TaskPayload::Prioritization { items, .. } => serde_json::json!({ "items": items }),
        };
        serde_json::json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "format": self.format,
            "content": content,
            "difficulty": self.difficulty,
            "xp_reward": self.xp_reward,
            "status": self.status,
            "attempts": self.attempts,
            "source": self.source,
            "source_meeting_id": self.source_meeting_id,
        })
    }
}

/// A validated task produced by the generator, ready for insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub payload: TaskPayload,
    pub difficulty: i32,
    pub xp_reward: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_mc_payload() -> TaskPayload {
        TaskPayload::MultipleChoice {
            options: vec![
                McOption { id: "A".into(), text: "First".into() },
                McOption { id: "B".into(), text: "Second".into() },
                McOption { id: "C".into(), text: "Third".into() },
                McOption { id: "D".into(), text: "Fourth".into() },
            ],
            correct_answer: "C".into(),
        }
    }

    #[test]
    fn test_payload_tag_matches_format() {
        assert_eq!(sample_mc_payload().format(), TaskFormat::MultipleChoice);
        let p = TaskPayload::Prioritization {
            items: vec![
                PriorityItem { id: "1".into(), text: "x".into() },
                PriorityItem { id: "2".into(), text: "y".into() },
            ],
            correct_order: vec!["2".into(), "1".into()],
        };
        assert_eq!(p.format(), TaskFormat::Prioritization);
    }

    #[test]
    fn test_payload_deserializes_single_tagged_variant() {
        let json = r#"{
            "format": "fill_in_blank",
            "text": "TCP uses a ___ handshake",
            "blanks": ["three-way"]
        }"#;
        let payload: TaskPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.format(), TaskFormat::FillInBlank);
    }

    #[test]
    fn test_payload_rejects_unknown_format_tag() {
        let json = r#"{"format": "essay", "expected_points": []}"#;
        assert!(serde_json::from_str::<TaskPayload>(json).is_err());
    }

    #[test]
    fn test_public_view_strips_grading_keys() {
        let row = TaskRow {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            title: "Pick one".into(),
            description: "Choose the right option".into(),
            format: "multiple_choice".into(),
            payload: Json(sample_mc_payload()),
            difficulty: 3,
            xp_reward: 50,
            status: "pending".into(),
            attempts: 0,
            consecutive_failures: 0,
            score: None,
            source: None,
            source_meeting_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let public = serde_json::to_string(&row.to_public()).unwrap();
        assert!(!public.contains("correct_answer"));
        assert!(public.contains("options"));
    }

    #[test]
    fn test_is_open_by_status() {
        let mut row = TaskRow {
            id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
            title: "t".into(),
            description: "d".into(),
            format: "text_answer".into(),
            payload: Json(TaskPayload::TextAnswer { expected_points: vec![] }),
            difficulty: 1,
            xp_reward: 10,
            status: "pending".into(),
            attempts: 0,
            consecutive_failures: 0,
            score: None,
            source: None,
            source_meeting_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(row.is_open());
        row.status = "in_progress".into();
        assert!(row.is_open());
        row.status = "completed".into();
        assert!(!row.is_open());
        row.status = "failed".into();
        assert!(!row.is_open());
    }
}
