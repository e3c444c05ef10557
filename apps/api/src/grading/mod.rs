// Grader: numeric score (0-100), pass/fail at 70, human-readable feedback.
// Structured formats grade locally and never touch the LLM; free text runs
// pre-validation first and only degenerate-free submissions reach the LLM.

pub mod formats;
pub mod grader;
pub mod prevalidate;
pub mod prompts;

use thiserror::Error;

use crate::generation::GenerationError;

/// The pass bar. `passed` is derived from this in exactly one place.
pub const PASS_THRESHOLD: u32 = 70;

#[derive(Debug, Clone, PartialEq)]
pub struct GradeResult {
    pub score: u32,
    pub passed: bool,
    pub feedback: String,
}

impl GradeResult {
    /// The only constructor: clamps the score and derives `passed`, so
    /// `passed == (score >= 70)` holds for every result in the system.
    pub fn new(score: u32, feedback: impl Into<String>) -> Self {
        let score = score.min(100);
        Self { score, passed: score >= PASS_THRESHOLD, feedback: feedback.into() }
    }
}

#[derive(Debug, Error)]
pub enum GradingError {
    /// The submission does not have the shape the task format requires.
    #[error("malformed solution: {0}")]
    MalformedSolution(String),

    /// The grading LLM call failed after retries. No safe local fallback:
    /// inventing a score would be worse than a retryable error.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_is_derived_from_threshold() {
        assert!(!GradeResult::new(69, "").passed);
        assert!(GradeResult::new(70, "").passed);
        assert!(GradeResult::new(100, "").passed);
        assert!(!GradeResult::new(0, "").passed);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let r = GradeResult::new(250, "over-enthusiastic model");
        assert_eq!(r.score, 100);
        assert!(r.passed);
    }
}
