use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::progression;

/// How many recent meeting types the session remembers for repetition avoidance.
pub const RECENT_MEETING_WINDOW: usize = 5;

/// Career phase of a session. Transitions:
/// graduated → job_searching → interviewing → employed, with employed able to
/// re-enter job_searching (job switching) while keeping the current job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Graduated,
    JobSearching,
    Interviewing,
    Employed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Graduated => "graduated",
            SessionStatus::JobSearching => "job_searching",
            SessionStatus::Interviewing => "interviewing",
            SessionStatus::Employed => "employed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "graduated" => Some(SessionStatus::Graduated),
            "job_searching" => Some(SessionStatus::JobSearching),
            "interviewing" => Some(SessionStatus::Interviewing),
            "employed" => Some(SessionStatus::Employed),
            _ => None,
        }
    }
}

/// CV data carried on the session document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CvData {
    pub experience: Vec<CvExperience>,
    pub skills: Vec<String>,
    pub accomplishments: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvExperience {
    pub company: String,
    pub position: String,
    pub summary: String,
}

/// Lifetime counters shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub tasks_completed: u32,
    pub interviews_passed: u32,
    pub interviews_failed: u32,
    pub jobs_held: u32,
}

/// A job the player held, recorded when they accept a new position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobHistoryEntry {
    pub job_id: Uuid,
    pub company: String,
    pub position: String,
    pub accepted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SessionRow {
    pub id: Uuid,
    pub profession: String,
    pub level: i32,
    pub xp: i32,
    pub status: String,
    pub current_job_id: Option<Uuid>,
    pub job_history: Json<Vec<JobHistoryEntry>>,
    pub cv: Json<CvData>,
    pub stats: Json<SessionStats>,
    pub tasks_since_last_meeting: i32,
    pub recent_meeting_types: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SessionRow {
    pub fn status(&self) -> SessionStatus {
        SessionStatus::parse(&self.status).unwrap_or(SessionStatus::JobSearching)
    }

    /// XP still needed within the current level. Derived, never stored.
    pub fn xp_to_next_level(&self) -> i32 {
        if self.level >= progression::MAX_LEVEL as i32 {
            return 0;
        }
        (progression::xp_required_for_level(self.level as u32) as i32 - self.xp).max(0)
    }

    /// Records a meeting type in the bounded recency window.
    pub fn push_recent_meeting_type(&mut self, meeting_type: &str) {
        self.recent_meeting_types.0.push(meeting_type.to_string());
        let len = self.recent_meeting_types.0.len();
        if len > RECENT_MEETING_WINDOW {
            self.recent_meeting_types.0.drain(..len - RECENT_MEETING_WINDOW);
        }
    }

    /// Wire representation returned by session endpoints.
    pub fn to_snapshot(&self) -> Value {
        serde_json::json!({
            "session_id": self.id,
            "profession": self.profession,
            "level": self.level,
            "xp": self.xp,
            "xp_to_next_level": self.xp_to_next_level(),
            "status": self.status,
            "current_job_id": self.current_job_id,
            "job_history": self.job_history.0,
            "cv": self.cv.0,
            "stats": self.stats.0,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session(level: i32, xp: i32) -> SessionRow {
        SessionRow {
            id: Uuid::new_v4(),
            profession: "software engineer".to_string(),
            level,
            xp,
            status: "employed".to_string(),
            current_job_id: None,
            job_history: Json(vec![]),
            cv: Json(CvData::default()),
            stats: Json(SessionStats::default()),
            tasks_since_last_meeting: 0,
            recent_meeting_types: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_round_trips() {
        for s in [
            SessionStatus::Graduated,
            SessionStatus::JobSearching,
            SessionStatus::Interviewing,
            SessionStatus::Employed,
        ] {
            assert_eq!(SessionStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(SessionStatus::parse("retired"), None);
    }

    #[test]
    fn test_xp_to_next_level_is_derived() {
        let session = make_session(3, 150);
        // level 3 → 4 requires 600
        assert_eq!(session.xp_to_next_level(), 450);
    }

    #[test]
    fn test_xp_to_next_level_zero_at_cap() {
        let session = make_session(10, 5000);
        assert_eq!(session.xp_to_next_level(), 0);
    }

    #[test]
    fn test_recent_meeting_window_is_bounded() {
        let mut session = make_session(1, 0);
        for t in [
            "one_on_one",
            "team_meeting",
            "project_update",
            "one_on_one",
            "feedback_session",
            "performance_review",
        ] {
            session.push_recent_meeting_type(t);
        }
        assert_eq!(session.recent_meeting_types.0.len(), RECENT_MEETING_WINDOW);
        // Oldest entry dropped
        assert_eq!(session.recent_meeting_types.0[0], "team_meeting");
        assert_eq!(
            session.recent_meeting_types.0.last().map(String::as_str),
            Some("performance_review")
        );
    }

    #[test]
    fn test_snapshot_exposes_derived_field() {
        let session = make_session(2, 100);
        let snapshot = session.to_snapshot();
        assert_eq!(snapshot["xp_to_next_level"], 300);
        assert_eq!(snapshot["level"], 2);
    }
}
