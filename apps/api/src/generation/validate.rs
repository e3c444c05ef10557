//! Consistency checks applied to generated content before it is persisted.
//! Anything rejected here is regenerated (bounded) rather than propagated.

use crate::generation::GenerationError;
use crate::models::job::JobDraft;
use crate::models::meeting::MeetingDraft;
use crate::models::task::{TaskDraft, TaskPayload};

/// Interview question batches must land in this range.
pub const QUESTION_RANGE: std::ops::RangeInclusive<usize> = 3..=5;
/// Meeting topic counts must land in this range.
pub const TOPIC_RANGE: std::ops::RangeInclusive<usize> = 3..=5;

pub fn validate_job(job: &JobDraft) -> Result<(), GenerationError> {
    if job.company.trim().is_empty() || job.position.trim().is_empty() {
        return Err(GenerationError::Validation(
            "job missing company or position".to_string(),
        ));
    }
    if job.salary_min > job.salary_max {
        return Err(GenerationError::Validation(format!(
            "job salary range inverted: {} > {}",
            job.salary_min, job.salary_max
        )));
    }
    Ok(())
}

pub fn validate_task(task: &TaskDraft) -> Result<(), GenerationError> {
    if task.title.trim().is_empty() {
        return Err(GenerationError::Validation("task missing title".to_string()));
    }
    if !(1..=10).contains(&task.difficulty) {
        return Err(GenerationError::Validation(format!(
            "task difficulty {} out of range",
            task.difficulty
        )));
    }
    validate_payload(&task.payload)
}

/// Format-specific payload arity rules. The tagged enum already guarantees
/// exactly one variant; this checks the variant is internally consistent.
pub fn validate_payload(payload: &TaskPayload) -> Result<(), GenerationError> {
    match payload {
        TaskPayload::TextAnswer { expected_points } => {
            if expected_points.is_empty() {
                return Err(GenerationError::Validation(
                    "text_answer task has no expected points".to_string(),
                ));
            }
        }
        TaskPayload::MultipleChoice { options, correct_answer } => {
            if options.len() != 4 {
                return Err(GenerationError::Validation(format!(
                    "multiple_choice task has {} options, expected 4",
                    options.len()
                )));
            }
            if !options.iter().any(|o| o.id == *correct_answer) {
                return Err(GenerationError::Validation(format!(
                    "multiple_choice correct_answer '{correct_answer}' is not an option id"
                )));
            }
        }
        TaskPayload::FillInBlank { text, blanks } => {
            let markers = text.matches("___").count();
            if blanks.is_empty() || markers != blanks.len() {
                return Err(GenerationError::Validation(format!(
                    "fill_in_blank has {markers} markers but {} answers",
                    blanks.len()
                )));
            }
        }
        TaskPayload::Matching { left, right, correct_pairs } => {
            if left.is_empty() || left.len() != right.len() {
                return Err(GenerationError::Validation(
                    "matching task sides have mismatched lengths".to_string(),
                ));
            }
            if correct_pairs.len() != left.len() {
                return Err(GenerationError::Validation(
                    "matching task does not pair every left item".to_string(),
                ));
            }
            for pair in correct_pairs {
                if !left.contains(&pair.left) || !right.contains(&pair.right) {
                    return Err(GenerationError::Validation(format!(
                        "matching pair '{}' → '{}' references unknown items",
                        pair.left, pair.right
                    )));
                }
            }
        }
        TaskPayload::CodeReview { code, bugs } => {
            if code.trim().is_empty() || bugs.is_empty() {
                return Err(GenerationError::Validation(
                    "code_review task needs code and at least one known bug".to_string(),
                ));
            }
        }
        TaskPayload::Prioritization { items, correct_order } => {
            if items.len() < 2 {
                return Err(GenerationError::Validation(
                    "prioritization task needs at least 2 items".to_string(),
                ));
            }
            if correct_order.len() != items.len() {
                return Err(GenerationError::Validation(
                    "prioritization correct_order length mismatch".to_string(),
                ));
            }
            for id in correct_order {
                if !items.iter().any(|i| i.id == *id) {
                    return Err(GenerationError::Validation(format!(
                        "prioritization correct_order references unknown item '{id}'"
                    )));
                }
            }
            // Must be a permutation, not just a subset with repeats.
            let mut seen = correct_order.clone();
            seen.sort();
            seen.dedup();
            if seen.len() != correct_order.len() {
                return Err(GenerationError::Validation(
                    "prioritization correct_order repeats an item".to_string(),
                ));
            }
        }
    }
    Ok(())
}

pub fn validate_meeting(meeting: &MeetingDraft) -> Result<(), GenerationError> {
    if meeting.participants.is_empty() {
        return Err(GenerationError::Validation(
            "meeting has no participants".to_string(),
        ));
    }
    if !TOPIC_RANGE.contains(&meeting.topics.len()) {
        return Err(GenerationError::Validation(format!(
            "meeting has {} topics, expected 3-5",
            meeting.topics.len()
        )));
    }
    if meeting.topics.iter().any(|t| t.question.trim().is_empty()) {
        return Err(GenerationError::Validation(
            "meeting topic has an empty question".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::meeting::{MeetingTopic, Participant};
    use crate::models::task::{MatchingPair, McOption, PriorityItem};

    fn mc_options(n: usize) -> Vec<McOption> {
        (0..n)
            .map(|i| McOption {
                id: char::from(b'A' + i as u8).to_string(),
                text: format!("option {i}"),
            })
            .collect()
    }

    fn draft(payload: TaskPayload) -> TaskDraft {
        TaskDraft {
            title: "Task".into(),
            description: "Do it".into(),
            payload,
            difficulty: 3,
            xp_reward: 50,
        }
    }

    #[test]
    fn test_multiple_choice_requires_exactly_4_options() {
        let bad = draft(TaskPayload::MultipleChoice {
            options: mc_options(3),
            correct_answer: "A".into(),
        });
        assert!(validate_task(&bad).is_err());

        let good = draft(TaskPayload::MultipleChoice {
            options: mc_options(4),
            correct_answer: "C".into(),
        });
        assert!(validate_task(&good).is_ok());
    }

    #[test]
    fn test_multiple_choice_correct_answer_must_be_an_option() {
        let bad = draft(TaskPayload::MultipleChoice {
            options: mc_options(4),
            correct_answer: "Z".into(),
        });
        assert!(validate_task(&bad).is_err());
    }

    #[test]
    fn test_fill_in_blank_marker_count_must_match() {
        let good = draft(TaskPayload::FillInBlank {
            text: "A ___ connects to a ___".into(),
            blanks: vec!["client".into(), "server".into()],
        });
        assert!(validate_task(&good).is_ok());

        let bad = draft(TaskPayload::FillInBlank {
            text: "A ___ connects".into(),
            blanks: vec!["client".into(), "server".into()],
        });
        assert!(validate_task(&bad).is_err());
    }

    #[test]
    fn test_matching_pairs_must_cover_all_items() {
        let bad = draft(TaskPayload::Matching {
            left: vec!["a".into(), "b".into()],
            right: vec!["1".into(), "2".into()],
            correct_pairs: vec![MatchingPair { left: "a".into(), right: "1".into() }],
        });
        assert!(validate_task(&bad).is_err());
    }

    #[test]
    fn test_prioritization_order_must_be_permutation() {
        let items = vec![
            PriorityItem { id: "1".into(), text: "x".into() },
            PriorityItem { id: "2".into(), text: "y".into() },
        ];
        let repeated = draft(TaskPayload::Prioritization {
            items: items.clone(),
            correct_order: vec!["1".into(), "1".into()],
        });
        assert!(validate_task(&repeated).is_err());

        let good = draft(TaskPayload::Prioritization {
            items,
            correct_order: vec!["2".into(), "1".into()],
        });
        assert!(validate_task(&good).is_ok());
    }

    #[test]
    fn test_difficulty_bounds() {
        let mut t = draft(TaskPayload::TextAnswer { expected_points: vec!["p".into()] });
        t.difficulty = 0;
        assert!(validate_task(&t).is_err());
        t.difficulty = 11;
        assert!(validate_task(&t).is_err());
        t.difficulty = 10;
        assert!(validate_task(&t).is_ok());
    }

    #[test]
    fn test_meeting_topic_count_window() {
        let participant = Participant {
            name: "Sam".into(),
            role: "Manager".into(),
            personality: "calm".into(),
        };
        let topic = MeetingTopic {
            question: "How did the launch go?".into(),
            context: "ctx".into(),
            expected_points: vec!["p".into()],
        };

        let two = MeetingDraft {
            title: "m".into(),
            context: "c".into(),
            participants: vec![participant.clone()],
            topics: vec![topic.clone(); 2],
        };
        assert!(validate_meeting(&two).is_err());

        let four = MeetingDraft {
            title: "m".into(),
            context: "c".into(),
            participants: vec![participant.clone()],
            topics: vec![topic.clone(); 4],
        };
        assert!(validate_meeting(&four).is_ok());

        let six = MeetingDraft {
            title: "m".into(),
            context: "c".into(),
            participants: vec![participant],
            topics: vec![topic; 6],
        };
        assert!(validate_meeting(&six).is_err());
    }

    #[test]
    fn test_job_salary_range_must_be_ordered() {
        use crate::models::job::{JobLevel, JobType};
        let mut job = JobDraft {
            company: "Acme".into(),
            position: "Engineer".into(),
            location: "Remote".into(),
            job_type: JobType::Remote,
            salary_min: 90_000,
            salary_max: 70_000,
            level: JobLevel::Mid,
            requirements: vec![],
            responsibilities: vec![],
            benefits: vec![],
            description: "desc".into(),
        };
        assert!(validate_job(&job).is_err());
        job.salary_max = 95_000;
        assert!(validate_job(&job).is_ok());
    }
}
