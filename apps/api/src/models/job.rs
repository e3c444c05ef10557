use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Default salary band applied when the generator omits one.
pub const DEFAULT_SALARY_RANGE: (i32, i32) = (40_000, 60_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Remote,
    Hybrid,
    Onsite,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Remote => "remote",
            JobType::Hybrid => "hybrid",
            JobType::Onsite => "onsite",
        }
    }

    /// Lenient parse for generator output; unknown values default to remote.
    pub fn normalize(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "hybrid" => JobType::Hybrid,
            "onsite" | "on-site" | "on_site" => JobType::Onsite,
            _ => JobType::Remote,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobLevel {
    Entry,
    Mid,
    Senior,
}

impl JobLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobLevel::Entry => "entry",
            JobLevel::Mid => "mid",
            JobLevel::Senior => "senior",
        }
    }

    /// Unknown levels normalize to entry rather than failing the batch.
    pub fn normalize(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "mid" | "mid-level" | "intermediate" => JobLevel::Mid,
            "senior" | "staff" | "principal" | "lead" => JobLevel::Senior,
            _ => JobLevel::Entry,
        }
    }

    /// Maps a player level (1-10) to the listing tier requested from the generator.
    pub fn for_player_level(player_level: u32) -> Self {
        match player_level {
            0..=3 => JobLevel::Entry,
            4..=6 => JobLevel::Mid,
            _ => JobLevel::Senior,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Active,
    Expired,
    Applied,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Active => "active",
            JobStatus::Expired => "expired",
            JobStatus::Applied => "applied",
        }
    }
}

/// An interview question with its hidden grading key.
/// `expected_answer` is for grading guidance only and must never be serialized
/// into a client-facing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub expected_answer: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobListingRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub company: String,
    pub position: String,
    pub location: String,
    pub job_type: String,
    pub salary_min: i32,
    pub salary_max: i32,
    pub level: String,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub benefits: Vec<String>,
    pub description: String,
    pub status: String,
    pub interview_questions: Option<Json<Vec<InterviewQuestion>>>,
    pub created_at: DateTime<Utc>,
}

impl JobListingRow {
    /// Client-facing representation; interview grading keys are stripped.
    pub fn to_public(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "company": self.company,
            "position": self.position,
            "location": self.location,
            "job_type": self.job_type,
            "salary_min": self.salary_min,
            "salary_max": self.salary_max,
            "level": self.level,
            "requirements": self.requirements,
            "responsibilities": self.responsibilities,
            "benefits": self.benefits,
            "description": self.description,
            "status": self.status,
        })
    }
}

/// A validated, normalized job produced by the generator, ready for insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobDraft {
    pub company: String,
    pub position: String,
    pub location: String,
    pub job_type: JobType,
    pub salary_min: i32,
    pub salary_max: i32,
    pub level: JobLevel,
    pub requirements: Vec<String>,
    pub responsibilities: Vec<String>,
    pub benefits: Vec<String>,
    pub description: String,
}
