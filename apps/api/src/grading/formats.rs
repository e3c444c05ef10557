//! Local graders for structured task formats. These are exact and
//! deterministic; the grading LLM is never consulted for them.

use serde_json::Value;

use crate::grading::{GradeResult, GradingError};
use crate::models::task::{MatchingPair, PriorityItem};

/// Multiple choice: exact option-id match, all or nothing.
pub fn grade_multiple_choice(correct_answer: &str, solution: &Value) -> Result<GradeResult, GradingError> {
    let picked = solution_str(solution, "multiple_choice expects an option id string")?;
    if picked.trim().eq_ignore_ascii_case(correct_answer.trim()) {
        Ok(GradeResult::new(100, "Correct."))
    } else {
        Ok(GradeResult::new(0, "That is not the right option."))
    }
}

/// Fill in the blank: proportional credit per blank, order-sensitive.
pub fn grade_fill_in_blank(expected: &[String], solution: &Value) -> Result<GradeResult, GradingError> {
    let answers = solution_str_array(solution, "fill_in_blank expects an array of strings")?;
    let correct = expected
        .iter()
        .zip(answers.iter())
        .filter(|(e, a)| normalized_eq(e, a))
        .count();
    let score = proportional(correct, expected.len());
    Ok(GradeResult::new(
        score,
        format!("{correct} of {} blanks correct.", expected.len()),
    ))
}

/// Matching: proportional credit per correctly matched pair.
pub fn grade_matching(correct_pairs: &[MatchingPair], solution: &Value) -> Result<GradeResult, GradingError> {
    let submitted: Vec<MatchingPair> = serde_json::from_value(solution.clone())
        .map_err(|_| GradingError::MalformedSolution(
            "matching expects an array of {left, right} pairs".to_string(),
        ))?;
    let correct = correct_pairs
        .iter()
        .filter(|expected| {
            submitted
                .iter()
                .any(|s| normalized_eq(&s.left, &expected.left) && normalized_eq(&s.right, &expected.right))
        })
        .count();
    let score = proportional(correct, correct_pairs.len());
    Ok(GradeResult::new(
        score,
        format!("{correct} of {} pairs matched correctly.", correct_pairs.len()),
    ))
}

/// Code review: credit per known bug the reviewer's write-up identifies.
/// A bug counts as found when at least half of its significant words (4+
/// chars) appear in the submission.
pub fn grade_code_review(bugs: &[String], solution: &Value) -> Result<GradeResult, GradingError> {
    let review = solution_str(solution, "code_review expects the review text as a string")?;
    let review_lower = review.to_lowercase();
    let found = bugs.iter().filter(|bug| bug_mentioned(bug, &review_lower)).count();
    let score = proportional(found, bugs.len());
    Ok(GradeResult::new(
        score,
        format!("Identified {found} of {} planted defects.", bugs.len()),
    ))
}

fn bug_mentioned(bug: &str, review_lower: &str) -> bool {
    let significant: Vec<String> = bug
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| w.len() >= 4)
        .collect();
    if significant.is_empty() {
        return review_lower.contains(&bug.to_lowercase());
    }
    let hits = significant.iter().filter(|w| review_lower.contains(w.as_str())).count();
    hits * 2 >= significant.len()
}

/// Prioritization: pairwise rank concordance against the expected order.
/// Full credit only for the exact order; partial credit degrades smoothly.
pub fn grade_prioritization(
    items: &[PriorityItem],
    correct_order: &[String],
    solution: &Value,
) -> Result<GradeResult, GradingError> {
    let submitted = solution_str_array(solution, "prioritization expects an array of item ids")?;
    if submitted.len() != correct_order.len() {
        return Err(GradingError::MalformedSolution(format!(
            "expected {} item ids, got {}",
            correct_order.len(),
            submitted.len()
        )));
    }
    for id in &submitted {
        if !items.iter().any(|i| i.id == *id) {
            return Err(GradingError::MalformedSolution(format!("unknown item id '{id}'")));
        }
    }

    let rank_of = |order: &[String], id: &str| order.iter().position(|x| x == id);
    let n = correct_order.len();
    let mut concordant = 0usize;
    let mut total = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            total += 1;
            let (a, b) = (&correct_order[i], &correct_order[j]);
            // a precedes b in the expected order; does it in the submission?
            match (rank_of(&submitted, a), rank_of(&submitted, b)) {
                (Some(ra), Some(rb)) if ra < rb => concordant += 1,
                _ => {}
            }
        }
    }
    let score = proportional(concordant, total);
    Ok(GradeResult::new(
        score,
        format!("{concordant} of {total} orderings placed correctly."),
    ))
}

fn proportional(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

fn normalized_eq(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn solution_str<'a>(solution: &'a Value, hint: &str) -> Result<&'a str, GradingError> {
    solution
        .as_str()
        .ok_or_else(|| GradingError::MalformedSolution(hint.to_string()))
}

fn solution_str_array(solution: &Value, hint: &str) -> Result<Vec<String>, GradingError> {
    serde_json::from_value(solution.clone())
        .map_err(|_| GradingError::MalformedSolution(hint.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multiple_choice_exact_match() {
        let r = grade_multiple_choice("C", &json!("C")).unwrap();
        assert_eq!(r.score, 100);
        assert!(r.passed);

        let r = grade_multiple_choice("C", &json!("A")).unwrap();
        assert_eq!(r.score, 0);
        assert!(!r.passed);
    }

    #[test]
    fn test_multiple_choice_case_insensitive() {
        assert_eq!(grade_multiple_choice("C", &json!(" c ")).unwrap().score, 100);
    }

    #[test]
    fn test_multiple_choice_rejects_non_string() {
        assert!(matches!(
            grade_multiple_choice("C", &json!(3)),
            Err(GradingError::MalformedSolution(_))
        ));
    }

    #[test]
    fn test_fill_in_blank_proportional() {
        let expected = vec!["three-way".to_string(), "SYN".to_string()];
        let r = grade_fill_in_blank(&expected, &json!(["three-way", "ACK"])).unwrap();
        assert_eq!(r.score, 50);
        assert!(!r.passed);

        let r = grade_fill_in_blank(&expected, &json!(["Three-Way", "syn"])).unwrap();
        assert_eq!(r.score, 100);
    }

    #[test]
    fn test_fill_in_blank_is_order_sensitive() {
        let expected = vec!["client".to_string(), "server".to_string()];
        let r = grade_fill_in_blank(&expected, &json!(["server", "client"])).unwrap();
        assert_eq!(r.score, 0);
    }

    #[test]
    fn test_matching_partial_credit() {
        let pairs = vec![
            MatchingPair { left: "HTTP".into(), right: "80".into() },
            MatchingPair { left: "HTTPS".into(), right: "443".into() },
        ];
        let r = grade_matching(
            &pairs,
            &json!([
                {"left": "HTTP", "right": "80"},
                {"left": "HTTPS", "right": "80"}
            ]),
        )
        .unwrap();
        assert_eq!(r.score, 50);
    }

    #[test]
    fn test_code_review_bug_overlap() {
        let bugs = vec![
            "off-by-one error in the loop bound".to_string(),
            "unchecked null pointer dereference".to_string(),
        ];
        let r = grade_code_review(
            &bugs,
            &json!("The loop bound has an off-by-one error; looks fine otherwise"),
        )
        .unwrap();
        assert_eq!(r.score, 50);

        let r = grade_code_review(
            &bugs,
            &json!("There is an off-by-one in the loop bound and a null pointer dereference goes unchecked"),
        )
        .unwrap();
        assert_eq!(r.score, 100);
        assert!(r.passed);
    }

    #[test]
    fn test_prioritization_exact_order_full_credit() {
        let items = vec![
            PriorityItem { id: "1".into(), text: "a".into() },
            PriorityItem { id: "2".into(), text: "b".into() },
            PriorityItem { id: "3".into(), text: "c".into() },
        ];
        let correct = vec!["2".to_string(), "1".to_string(), "3".to_string()];
        let r = grade_prioritization(&items, &correct, &json!(["2", "1", "3"])).unwrap();
        assert_eq!(r.score, 100);
    }

    #[test]
    fn test_prioritization_partial_concordance() {
        let items = vec![
            PriorityItem { id: "1".into(), text: "a".into() },
            PriorityItem { id: "2".into(), text: "b".into() },
            PriorityItem { id: "3".into(), text: "c".into() },
        ];
        let correct = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        // Swapping the last two keeps 2 of 3 pairs concordant.
        let r = grade_prioritization(&items, &correct, &json!(["1", "3", "2"])).unwrap();
        assert_eq!(r.score, 67);
    }

    #[test]
    fn test_prioritization_rejects_unknown_ids() {
        let items = vec![
            PriorityItem { id: "1".into(), text: "a".into() },
            PriorityItem { id: "2".into(), text: "b".into() },
        ];
        let correct = vec!["1".to_string(), "2".to_string()];
        assert!(matches!(
            grade_prioritization(&items, &correct, &json!(["1", "9"])),
            Err(GradingError::MalformedSolution(_))
        ));
        assert!(matches!(
            grade_prioritization(&items, &correct, &json!(["1"])),
            Err(GradingError::MalformedSolution(_))
        ));
    }
}
