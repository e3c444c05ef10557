//! Pre-validation: fast, local, deterministic scoring of degenerate free-text
//! submissions. Anything resolved here never reaches the grading LLM call,
//! which keeps the obvious cases cheap and instant.

use crate::grading::GradeResult;

/// Auto-pass bar: a submission this substantial skips the LLM entirely.
const AUTO_PASS_WORDS: usize = 30;
const AUTO_PASS_DISTINCT: usize = 20;
const AUTO_PASS_SCORE: u32 = 80;

/// Token-diversity floor; below it the submission is treated as filler.
const DIVERSITY_MIN_WORDS: usize = 10;
const DIVERSITY_RATIO: f64 = 0.4;

const GIVE_UP_PHRASES: [&str; 4] = ["i don't know", "i dont know", "no idea", "dunno"];

/// Returns a grade for degenerate or obviously substantial submissions,
/// or `None` when the submission deserves a real grading call.
pub fn pre_validate(submission: &str) -> Option<GradeResult> {
    let trimmed = submission.trim();
    if trimmed.is_empty() {
        return Some(GradeResult::new(0, "No answer was submitted."));
    }

    let lower = trimmed.to_lowercase();
    if GIVE_UP_PHRASES.iter().any(|p| lower.contains(p)) {
        return Some(GradeResult::new(
            5,
            "Giving up scores almost nothing. Attempt an answer, even a partial one.",
        ));
    }

    let words: Vec<&str> = trimmed.split_whitespace().collect();
    if words.len() < 5 {
        return Some(GradeResult::new(
            10,
            "The answer is too short to evaluate. Explain your reasoning in full sentences.",
        ));
    }

    let distinct = distinct_word_count(&words);
    if words.len() >= DIVERSITY_MIN_WORDS
        && (distinct as f64 / words.len() as f64) < DIVERSITY_RATIO
    {
        return Some(GradeResult::new(
            5,
            "The answer repeats itself without adding substance.",
        ));
    }

    if words.len() >= AUTO_PASS_WORDS && distinct >= AUTO_PASS_DISTINCT {
        return Some(GradeResult::new(
            AUTO_PASS_SCORE,
            "A substantial, varied answer covering the question at reasonable depth.",
        ));
    }

    None
}

fn distinct_word_count(words: &[&str]) -> usize {
    let mut seen: Vec<String> = words
        .iter()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
    seen.sort();
    seen.dedup();
    seen.len()
}
