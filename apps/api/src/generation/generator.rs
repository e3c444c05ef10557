//! Content generator operations: jobs, interview questions, tasks, meetings,
//! in-meeting replies, and the end-of-meeting evaluation.
//!
//! Shape of every operation: build prompt → call_json → normalize → validate,
//! regenerating up to CONTENT_ATTEMPTS on bad output. Jobs and tasks degrade
//! to deterministic fallbacks; the conversational kinds surface
//! `GenerationError::Unavailable` because a canned interview or meeting would
//! be worse than an honest retryable error.

use serde::Deserialize;
use tracing::warn;

use crate::generation::fallback::{fallback_jobs, fallback_task};
use crate::generation::prompts::{
    EVALUATION_PROMPT_TEMPLATE, EVALUATION_SYSTEM, INTERVIEW_PROMPT_TEMPLATE, INTERVIEW_SYSTEM,
    JOBS_PROMPT_TEMPLATE, JOBS_SYSTEM, MEETING_PROMPT_TEMPLATE, MEETING_SYSTEM,
    REPLIES_PROMPT_TEMPLATE, REPLIES_SYSTEM, TASK_PROMPT_TEMPLATE, TASK_SYSTEM,
};
use crate::generation::validate::{
    validate_job, validate_meeting, validate_task, QUESTION_RANGE,
};
use crate::generation::{GenerationError, CONTENT_ATTEMPTS};
use crate::llm_client::prompts::{SCORING_INSTRUCTION, WORLD_INSTRUCTION};
use crate::llm_client::LlmClient;
use crate::models::job::{
    InterviewQuestion, JobDraft, JobLevel, JobListingRow, JobType, DEFAULT_SALARY_RANGE,
};
use crate::models::meeting::{MeetingDraft, MeetingRow, MeetingType};
use crate::models::task::{TaskDraft, TaskPayload};

// ────────────────────────────────────────────────────────────────────────────
// Wire types (lenient shapes accepted from the model, normalized before use)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct JobWire {
    #[serde(default)]
    company: String,
    #[serde(default)]
    position: String,
    location: Option<String>,
    job_type: Option<String>,
    salary_min: Option<i32>,
    salary_max: Option<i32>,
    level: Option<String>,
    #[serde(default)]
    requirements: Vec<String>,
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default)]
    benefits: Vec<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskWire {
    title: String,
    #[serde(default)]
    description: String,
    difficulty: Option<i32>,
    xp_reward: Option<i32>,
    payload: TaskPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeetingReply {
    pub speaker: String,
    pub content: String,
}

/// Participant reactions to one player response, plus a brief per-turn
/// assessment echoed back to the client.
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingReplies {
    pub replies: Vec<MeetingReply>,
    pub assessment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EvaluationWire {
    score: i64,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    should_generate_tasks: bool,
    follow_up_task_count: Option<i64>,
    follow_up_summary: Option<String>,
}

/// Normalized end-of-meeting evaluation.
#[derive(Debug, Clone)]
pub struct MeetingEvaluationOutcome {
    pub score: i32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub should_generate_tasks: bool,
    pub follow_up_task_count: u32,
    pub follow_up_summary: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Jobs
// ────────────────────────────────────────────────────────────────────────────

/// Generates a batch of job listings. Infallible by design: if the service
/// cannot produce a batch where at least half the jobs match the requested
/// profession (keyword heuristic, 50% threshold) within CONTENT_ATTEMPTS,
/// the deterministic template set fills the gap.
pub async fn generate_jobs(
    llm: &LlmClient,
    profession: &str,
    player_level: u32,
    count: u32,
) -> Vec<JobDraft> {
    let count = count.clamp(1, 20) as usize;
    let player_level = player_level.clamp(1, 10);
    let level = JobLevel::for_player_level(player_level);

    let prompt = JOBS_PROMPT_TEMPLATE
        .replace("{world}", WORLD_INSTRUCTION)
        .replace("{count}", &count.to_string())
        .replace("{profession}", profession)
        .replace("{level}", level.as_str());

    let mut matched: Vec<JobDraft> = Vec::new();
    let mut off_profession: Vec<JobDraft> = Vec::new();

    for attempt in 1..=CONTENT_ATTEMPTS {
        match llm.call_json::<Vec<JobWire>>(&prompt, JOBS_SYSTEM).await {
            Ok(wires) => {
                for wire in wires {
                    let Some(draft) = normalize_job(wire, level) else { continue };
                    if validate_job(&draft).is_err() {
                        continue;
                    }
                    if profession_matches(profession, &draft) {
                        matched.push(draft);
                    } else {
                        off_profession.push(draft);
                    }
                }
            }
            Err(e) => warn!(attempt, "job batch generation failed: {e}"),
        }
        // Majority heuristic satisfied: stop burning attempts.
        if matched.len() * 2 >= count {
            break;
        }
    }

    let mut jobs = if matched.len() * 2 >= count {
        matched.extend(off_profession);
        matched
    } else {
        warn!(
            matched = matched.len(),
            requested = count,
            "profession match below threshold, padding from fallback templates"
        );
        matched
    };

    if jobs.len() < count {
        let missing = count - jobs.len();
        jobs.extend(fallback_jobs(profession, player_level, missing));
    }
    jobs.truncate(count);
    jobs
}

fn normalize_job(wire: JobWire, requested_level: JobLevel) -> Option<JobDraft> {
    if wire.company.trim().is_empty() || wire.position.trim().is_empty() {
        return None;
    }
    let (default_min, default_max) = DEFAULT_SALARY_RANGE;
    let (salary_min, salary_max) = match (wire.salary_min, wire.salary_max) {
        (Some(min), Some(max)) if min <= max && min > 0 => (min, max),
        _ => (default_min, default_max),
    };
    Some(JobDraft {
        company: wire.company.trim().to_string(),
        position: wire.position.trim().to_string(),
        location: wire.location.unwrap_or_else(|| "Remote".to_string()),
        job_type: wire.job_type.as_deref().map(JobType::normalize).unwrap_or(JobType::Remote),
        salary_min,
        salary_max,
        level: wire.level.as_deref().map(JobLevel::normalize).unwrap_or(requested_level),
        requirements: wire.requirements,
        responsibilities: wire.responsibilities,
        benefits: wire.benefits,
        description: wire.description.unwrap_or_default(),
    })
}

/// Keyword heuristic: a job matches if any profession word (3+ chars) appears
/// in its position or description, case-insensitive.
fn profession_matches(profession: &str, job: &JobDraft) -> bool {
    let haystack = format!("{} {}", job.position, job.description).to_lowercase();
    let mut keywords = profession
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() >= 3)
        .map(str::to_string)
        .collect::<Vec<_>>();
    if keywords.is_empty() {
        keywords.push(profession.to_lowercase());
    }
    keywords.iter().any(|k| haystack.contains(k.as_str()))
}

// ────────────────────────────────────────────────────────────────────────────
// Interview questions
// ────────────────────────────────────────────────────────────────────────────

/// Generates 3-5 interview questions with hidden grading keys. No fallback:
/// failure surfaces as a retryable `Unavailable`.
pub async fn generate_interview_questions(
    llm: &LlmClient,
    job: &JobListingRow,
) -> Result<Vec<InterviewQuestion>, GenerationError> {
    let prompt = INTERVIEW_PROMPT_TEMPLATE
        .replace("{position}", &job.position)
        .replace("{company}", &job.company)
        .replace("{level}", &job.level)
        .replace("{requirements}", &job.requirements.join("; "));

    let mut last_failure = String::from("no attempts made");
    for attempt in 1..=CONTENT_ATTEMPTS {
        match llm
            .call_json::<Vec<InterviewQuestion>>(&prompt, INTERVIEW_SYSTEM)
            .await
        {
            Ok(questions) => {
                let well_formed = QUESTION_RANGE.contains(&questions.len())
                    && questions
                        .iter()
                        .all(|q| !q.question.trim().is_empty() && !q.expected_answer.trim().is_empty());
                if well_formed {
                    return Ok(questions);
                }
                last_failure = format!("got {} malformed/out-of-range questions", questions.len());
                warn!(attempt, "{last_failure}");
            }
            Err(e) => {
                last_failure = e.to_string();
                warn!(attempt, "interview generation failed: {last_failure}");
            }
        }
    }
    Err(GenerationError::Unavailable { reason: last_failure })
}

// ────────────────────────────────────────────────────────────────────────────
// Tasks
// ────────────────────────────────────────────────────────────────────────────

/// Generates one work task. Infallible: persistent failure degrades to the
/// deterministic fallback task so the dashboard never starves.
pub async fn generate_task(
    llm: &LlmClient,
    position: &str,
    company: &str,
    player_level: u32,
    tasks_completed: u32,
    origin: Option<&str>,
) -> TaskDraft {
    let player_level = player_level.clamp(1, 10);
    // Follow-up tasks carry the meeting outcome they grew out of.
    let origin_line = match origin {
        Some(summary) => format!("This task follows up on a meeting outcome: {summary}"),
        None => String::new(),
    };
    let prompt = TASK_PROMPT_TEMPLATE
        .replace("{world}", WORLD_INSTRUCTION)
        .replace("{position}", position)
        .replace("{company}", company)
        .replace("{player_level}", &player_level.to_string())
        .replace("{tasks_completed}", &tasks_completed.to_string())
        .replace("{origin}", &origin_line);

    for attempt in 1..=CONTENT_ATTEMPTS {
        match llm.call_json::<TaskWire>(&prompt, TASK_SYSTEM).await {
            Ok(wire) => {
                let draft = normalize_task(wire, player_level);
                match validate_task(&draft) {
                    Ok(()) => return draft,
                    Err(e) => warn!(attempt, "generated task rejected: {e}"),
                }
            }
            Err(e) => warn!(attempt, "task generation failed: {e}"),
        }
    }
    warn!("task generation exhausted, using fallback task");
    fallback_task(position, player_level)
}

fn normalize_task(wire: TaskWire, player_level: u32) -> TaskDraft {
    let difficulty = wire.difficulty.unwrap_or(player_level as i32).clamp(1, 10);
    // XP correlates with difficulty; the generator's own number wins when sane.
    let default_xp = 20 + 10 * difficulty;
    let xp_reward = wire.xp_reward.unwrap_or(default_xp).clamp(10, 200);
    TaskDraft {
        title: wire.title.trim().to_string(),
        description: wire.description.trim().to_string(),
        payload: wire.payload,
        difficulty,
        xp_reward,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Meetings
// ────────────────────────────────────────────────────────────────────────────

/// Generates a meeting of the requested type. No fallback: a scripted meeting
/// would defeat the point, so failure surfaces as retryable `Unavailable`.
pub async fn generate_meeting(
    llm: &LlmClient,
    meeting_type: MeetingType,
    position: &str,
    player_level: u32,
    recent_task_titles: &[String],
) -> Result<MeetingDraft, GenerationError> {
    let recent = if recent_task_titles.is_empty() {
        "none yet".to_string()
    } else {
        recent_task_titles.join("; ")
    };
    let prompt = MEETING_PROMPT_TEMPLATE
        .replace("{world}", WORLD_INSTRUCTION)
        .replace("{meeting_type}", meeting_type.as_str())
        .replace("{position}", position)
        .replace("{player_level}", &player_level.clamp(1, 10).to_string())
        .replace("{recent_tasks}", &recent);

    let mut last_failure = String::from("no attempts made");
    for attempt in 1..=CONTENT_ATTEMPTS {
        match llm.call_json::<MeetingDraft>(&prompt, MEETING_SYSTEM).await {
            Ok(draft) => match validate_meeting(&draft) {
                Ok(()) => return Ok(draft),
                Err(e) => {
                    last_failure = e.to_string();
                    warn!(attempt, "generated meeting rejected: {last_failure}");
                }
            },
            Err(e) => {
                last_failure = e.to_string();
                warn!(attempt, "meeting generation failed: {last_failure}");
            }
        }
    }
    Err(GenerationError::Unavailable { reason: last_failure })
}

/// Generates in-character participant replies for the meeting's current topic.
pub async fn generate_meeting_replies(
    llm: &LlmClient,
    meeting: &MeetingRow,
    player_response: &str,
) -> Result<MeetingReplies, GenerationError> {
    let topic_question = meeting
        .topics
        .0
        .get(meeting.current_topic as usize)
        .map(|t| t.question.clone())
        .unwrap_or_default();
    let prompt = REPLIES_PROMPT_TEMPLATE
        .replace("{world}", WORLD_INSTRUCTION)
        .replace("{meeting_json}", &meeting_context_json(meeting))
        .replace("{topic_question}", &topic_question)
        .replace("{player_response}", player_response);

    let mut last_failure = String::from("no attempts made");
    for attempt in 1..=CONTENT_ATTEMPTS {
        match llm.call_json::<MeetingReplies>(&prompt, REPLIES_SYSTEM).await {
            Ok(replies) if !replies.replies.is_empty() => return Ok(replies),
            Ok(_) => {
                last_failure = "reply batch was empty".to_string();
                warn!(attempt, "{last_failure}");
            }
            Err(e) => {
                last_failure = e.to_string();
                warn!(attempt, "reply generation failed: {last_failure}");
            }
        }
    }
    Err(GenerationError::Unavailable { reason: last_failure })
}

/// The single end-of-meeting evaluation call. Besides the score, the model
/// decides whether the discussion produced follow-up work (0-3 tasks).
pub async fn evaluate_meeting(
    llm: &LlmClient,
    meeting: &MeetingRow,
) -> Result<MeetingEvaluationOutcome, GenerationError> {
    let prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{scoring}", SCORING_INSTRUCTION)
        .replace("{meeting_json}", &meeting_context_json(meeting));

    let mut last_failure = String::from("no attempts made");
    for attempt in 1..=CONTENT_ATTEMPTS {
        match llm.call_json::<EvaluationWire>(&prompt, EVALUATION_SYSTEM).await {
            Ok(wire) => return Ok(normalize_evaluation(wire)),
            Err(e) => {
                last_failure = e.to_string();
                warn!(attempt, "meeting evaluation failed: {last_failure}");
            }
        }
    }
    Err(GenerationError::Unavailable { reason: last_failure })
}

fn normalize_evaluation(wire: EvaluationWire) -> MeetingEvaluationOutcome {
    let score = wire.score.clamp(0, 100) as i32;
    let follow_up_task_count = if wire.should_generate_tasks {
        wire.follow_up_task_count.unwrap_or(1).clamp(0, 3) as u32
    } else {
        0
    };
    MeetingEvaluationOutcome {
        score,
        strengths: wire.strengths,
        improvements: wire.improvements,
        should_generate_tasks: wire.should_generate_tasks && follow_up_task_count > 0,
        follow_up_task_count,
        follow_up_summary: wire.follow_up_summary.unwrap_or_default(),
    }
}

/// Serializes the meeting for prompting: topics keep their expected_points
/// (the model needs the rubric) and the conversation log is included verbatim.
fn meeting_context_json(meeting: &MeetingRow) -> String {
    serde_json::json!({
        "meeting_type": meeting.meeting_type,
        "title": meeting.title,
        "context": meeting.context,
        "participants": meeting.participants.0,
        "topics": meeting.topics.0,
        "conversation": meeting.conversation.0,
        "current_topic": meeting.current_topic,
    })
    .to_string()
}
