//! CV bookkeeping. Purely local: the CV is a structured record the player
//! accumulates, and the three update actions are deterministic list edits.

use serde::Deserialize;

use crate::models::session::{CvData, CvExperience};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CvAction {
    AddJob {
        company: String,
        position: String,
        summary: String,
    },
    AddAccomplishment {
        accomplishment: String,
    },
    AddSkills {
        skills: Vec<String>,
    },
}

/// Applies a CV action. Skills behave as a case-insensitive set; repeated
/// accomplishments are dropped; jobs append in chronological order.
pub fn update_cv(mut cv: CvData, action: CvAction) -> CvData {
    match action {
        CvAction::AddJob { company, position, summary } => {
            cv.experience.push(CvExperience { company, position, summary });
        }
        CvAction::AddAccomplishment { accomplishment } => {
            let accomplishment = accomplishment.trim().to_string();
            if !accomplishment.is_empty() && !cv.accomplishments.contains(&accomplishment) {
                cv.accomplishments.push(accomplishment);
            }
        }
        CvAction::AddSkills { skills } => {
            for skill in skills {
                let skill = skill.trim().to_string();
                if skill.is_empty() {
                    continue;
                }
                let exists = cv
                    .skills
                    .iter()
                    .any(|s| s.eq_ignore_ascii_case(&skill));
                if !exists {
                    cv.skills.push(skill);
                }
            }
        }
    }
    cv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_job_appends_in_order() {
        let cv = update_cv(
            CvData::default(),
            CvAction::AddJob {
                company: "Acme".into(),
                position: "Engineer".into(),
                summary: "Built APIs".into(),
            },
        );
        let cv = update_cv(
            cv,
            CvAction::AddJob {
                company: "Globex".into(),
                position: "Senior Engineer".into(),
                summary: "Led a team".into(),
            },
        );
        assert_eq!(cv.experience.len(), 2);
        assert_eq!(cv.experience[0].company, "Acme");
        assert_eq!(cv.experience[1].company, "Globex");
    }

    #[test]
    fn test_skills_deduplicate_case_insensitively() {
        let cv = update_cv(
            CvData::default(),
            CvAction::AddSkills { skills: vec!["SQL".into(), "sql".into(), " Python ".into()] },
        );
        assert_eq!(cv.skills, vec!["SQL".to_string(), "Python".to_string()]);

        let cv = update_cv(cv, CvAction::AddSkills { skills: vec!["PYTHON".into()] });
        assert_eq!(cv.skills.len(), 2);
    }

    #[test]
    fn test_accomplishments_skip_duplicates_and_blanks() {
        let cv = update_cv(
            CvData::default(),
            CvAction::AddAccomplishment { accomplishment: "Shipped v2".into() },
        );
        let cv = update_cv(
            cv,
            CvAction::AddAccomplishment { accomplishment: "Shipped v2".into() },
        );
        let cv = update_cv(cv, CvAction::AddAccomplishment { accomplishment: "   ".into() });
        assert_eq!(cv.accomplishments, vec!["Shipped v2".to_string()]);
    }

    #[test]
    fn test_action_deserializes_from_tagged_json() {
        let json = r#"{"action": "add_skills", "skills": ["Rust"]}"#;
        let action: CvAction = serde_json::from_str(json).unwrap();
        assert!(matches!(action, CvAction::AddSkills { .. }));
    }
}
