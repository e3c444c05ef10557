//! Grading orchestration. Structured formats route to the local graders in
//! `formats`; free text runs pre-validation and only then the grading LLM.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::generation::{GenerationError, CONTENT_ATTEMPTS};
use crate::grading::formats;
use crate::grading::prevalidate::pre_validate;
use crate::grading::prompts::{GRADING_PROMPT_TEMPLATE, GRADING_SYSTEM};
use crate::grading::{GradeResult, GradingError};
use crate::llm_client::prompts::SCORING_INSTRUCTION;
use crate::llm_client::LlmClient;
use crate::models::task::{TaskPayload, TaskRow};

#[derive(Debug, Deserialize)]
struct GradeWire {
    score: i64,
    #[serde(default)]
    feedback: String,
}

/// Grades a task submission. The task's format decides the path; only
/// text_answer tasks can reach the LLM, and only when pre-validation
/// declines to rule.
pub async fn grade_task(
    llm: &LlmClient,
    task: &TaskRow,
    solution: &Value,
) -> Result<GradeResult, GradingError> {
    match &task.payload.0 {
        TaskPayload::MultipleChoice { correct_answer, .. } => {
            formats::grade_multiple_choice(correct_answer, solution)
        }
        TaskPayload::FillInBlank { blanks, .. } => formats::grade_fill_in_blank(blanks, solution),
        TaskPayload::Matching { correct_pairs, .. } => {
            formats::grade_matching(correct_pairs, solution)
        }
        TaskPayload::CodeReview { bugs, .. } => formats::grade_code_review(bugs, solution),
        TaskPayload::Prioritization { items, correct_order } => {
            formats::grade_prioritization(items, correct_order, solution)
        }
        TaskPayload::TextAnswer { expected_points } => {
            let submission = solution.as_str().ok_or_else(|| {
                GradingError::MalformedSolution("text_answer expects a string".to_string())
            })?;
            let question = format!("{}\n{}", task.title, task.description);
            grade_free_text(llm, &question, &expected_points.join("\n- "), submission).await
        }
    }
}

/// Two-stage free-text grading, shared by text tasks and interview answers.
pub async fn grade_free_text(
    llm: &LlmClient,
    question: &str,
    expected: &str,
    submission: &str,
) -> Result<GradeResult, GradingError> {
    if let Some(result) = pre_validate(submission) {
        debug!(score = result.score, "submission resolved by pre-validation");
        return Ok(result);
    }

    let prompt = GRADING_PROMPT_TEMPLATE
        .replace("{scoring}", SCORING_INSTRUCTION)
        .replace("{question}", question)
        .replace("{expected}", expected)
        .replace("{submission}", submission);

    let mut last_failure = String::from("no attempts made");
    for attempt in 1..=CONTENT_ATTEMPTS {
        match llm.call_json::<GradeWire>(&prompt, GRADING_SYSTEM).await {
            Ok(wire) => {
                let score = wire.score.clamp(0, 100) as u32;
                return Ok(GradeResult::new(score, wire.feedback));
            }
            Err(e) => {
                last_failure = e.to_string();
                warn!(attempt, "grading call failed: {last_failure}");
            }
        }
    }
    Err(GradingError::Generation(GenerationError::Unavailable {
        reason: last_failure,
    }))
}
