//! Trigger policy knobs: level tiers, meeting spacing, the success-trigger
//! probability curve, and level-weighted meeting type selection.

use rand::Rng;

use crate::models::meeting::MeetingType;

/// Probability at the tier's lower spacing bound.
const BASE_TRIGGER_PROBABILITY: f64 = 0.35;
/// Added per completed task beyond the lower bound, so the trigger cannot
/// fall arbitrarily behind the expected spacing.
const TRIGGER_PROBABILITY_STEP: f64 = 0.25;
/// Hard ceiling below certainty: some variability is always preserved.
const TRIGGER_PROBABILITY_CAP: f64 = 0.90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelTier {
    Entry,
    Mid,
    Senior,
}

impl LevelTier {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=3 => LevelTier::Entry,
            4..=6 => LevelTier::Mid,
            _ => LevelTier::Senior,
        }
    }

    /// Expected meeting spacing in completed tasks: (lower, upper).
    /// Seniors meet more often than juniors.
    pub fn meeting_spacing(&self) -> (u32, u32) {
        match self {
            LevelTier::Entry => (3, 5),
            LevelTier::Mid => (2, 4),
            LevelTier::Senior => (2, 3),
        }
    }

    /// Weighted meeting type mix for success-path and replenishment meetings.
    /// feedback_session is reserved for the failure trigger.
    fn meeting_type_weights(&self) -> &'static [(MeetingType, u32)] {
        match self {
            LevelTier::Entry => &[
                (MeetingType::OneOnOne, 4),
                (MeetingType::TeamMeeting, 3),
                (MeetingType::ProjectUpdate, 2),
            ],
            LevelTier::Mid => &[
                (MeetingType::TeamMeeting, 3),
                (MeetingType::ProjectUpdate, 3),
                (MeetingType::OneOnOne, 2),
                (MeetingType::StakeholderPresentation, 1),
                (MeetingType::PerformanceReview, 1),
            ],
            LevelTier::Senior => &[
                (MeetingType::StakeholderPresentation, 3),
                (MeetingType::ProjectUpdate, 2),
                (MeetingType::PerformanceReview, 2),
                (MeetingType::TeamMeeting, 2),
                (MeetingType::OneOnOne, 1),
            ],
        }
    }
}

/// Success-path trigger probability for the current tasks-since-last-meeting
/// counter. Zero below the tier's lower bound, then a rising curve capped
/// below certainty.
pub fn trigger_probability(tasks_since_last_meeting: u32, tier: LevelTier) -> f64 {
    let (lower, _upper) = tier.meeting_spacing();
    if tasks_since_last_meeting < lower {
        return 0.0;
    }
    let overshoot = (tasks_since_last_meeting - lower) as f64;
    (BASE_TRIGGER_PROBABILITY + overshoot * TRIGGER_PROBABILITY_STEP).min(TRIGGER_PROBABILITY_CAP)
}

/// Draws a meeting type from the tier's weighted set, excluding the most
/// recently used type when more than one candidate remains.
pub fn pick_meeting_type<R: Rng + ?Sized>(
    level: u32,
    recent_meeting_types: &[String],
    rng: &mut R,
) -> MeetingType {
    let weights = LevelTier::for_level(level).meeting_type_weights();
    let last_used = recent_meeting_types.last().map(String::as_str);

    let candidates: Vec<(MeetingType, u32)> = weights
        .iter()
        .copied()
        .filter(|(t, _)| Some(t.as_str()) != last_used)
        .collect();
    // Exclusion only when feasible: with a single candidate left, repetition
    // beats an empty draw.
    let pool: &[(MeetingType, u32)] = if candidates.len() > 1 { &candidates } else { weights };

    let total: u32 = pool.iter().map(|(_, w)| w).sum();
    let mut roll = rng.random_range(0..total);
    for (meeting_type, weight) in pool {
        if roll < *weight {
            return *meeting_type;
        }
        roll -= weight;
    }
    // Unreachable: roll < total by construction.
    pool[pool.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_tier_mapping() {
        assert_eq!(LevelTier::for_level(1), LevelTier::Entry);
        assert_eq!(LevelTier::for_level(3), LevelTier::Entry);
        assert_eq!(LevelTier::for_level(4), LevelTier::Mid);
        assert_eq!(LevelTier::for_level(6), LevelTier::Mid);
        assert_eq!(LevelTier::for_level(7), LevelTier::Senior);
        assert_eq!(LevelTier::for_level(10), LevelTier::Senior);
    }

    #[test]
    fn test_spacing_tightens_with_seniority() {
        assert_eq!(LevelTier::Entry.meeting_spacing(), (3, 5));
        assert_eq!(LevelTier::Mid.meeting_spacing(), (2, 4));
        assert_eq!(LevelTier::Senior.meeting_spacing(), (2, 3));
    }

    #[test]
    fn test_probability_zero_below_lower_bound() {
        assert_eq!(trigger_probability(0, LevelTier::Entry), 0.0);
        assert_eq!(trigger_probability(2, LevelTier::Entry), 0.0);
        assert_eq!(trigger_probability(1, LevelTier::Senior), 0.0);
    }

    #[test]
    fn test_probability_curve_rises_then_caps() {
        let p3 = trigger_probability(3, LevelTier::Entry);
        let p4 = trigger_probability(4, LevelTier::Entry);
        let p5 = trigger_probability(5, LevelTier::Entry);
        let p9 = trigger_probability(9, LevelTier::Entry);
        assert!((p3 - 0.35).abs() < 1e-9);
        assert!((p4 - 0.60).abs() < 1e-9);
        assert!((p5 - 0.85).abs() < 1e-9);
        assert!((p9 - 0.90).abs() < 1e-9, "curve must cap below certainty");
        assert!(p3 < p4 && p4 < p5);
    }

    #[test]
    fn test_probability_cap_is_never_certainty() {
        for counter in 0..50 {
            for tier in [LevelTier::Entry, LevelTier::Mid, LevelTier::Senior] {
                assert!(trigger_probability(counter, tier) < 1.0);
            }
        }
    }

    #[test]
    fn test_pick_excludes_most_recent_type() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let picked = pick_meeting_type(2, &["one_on_one".to_string()], &mut rng);
            assert_ne!(picked, MeetingType::OneOnOne);
        }
    }

    #[test]
    fn test_pick_only_draws_from_tier_set() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let picked = pick_meeting_type(1, &[], &mut rng);
            assert!(matches!(
                picked,
                MeetingType::OneOnOne | MeetingType::TeamMeeting | MeetingType::ProjectUpdate
            ));
            // feedback_session is failure-trigger only.
            assert_ne!(picked, MeetingType::FeedbackSession);
        }
    }

    #[test]
    fn test_pick_is_deterministic_for_a_seed() {
        let a: Vec<MeetingType> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| pick_meeting_type(8, &[], &mut rng)).collect()
        };
        let b: Vec<MeetingType> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..10).map(|_| pick_meeting_type(8, &[], &mut rng)).collect()
        };
        assert_eq!(a, b);
    }
}
