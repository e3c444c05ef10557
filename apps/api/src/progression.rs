//! Progression ledger: pure level/XP arithmetic.
//!
//! Levels run 1-10. Advancing out of level N costs N * 200 XP, so thresholds
//! are strictly increasing (200 for 1→2, 1800 for 9→10). XP past the level cap
//! is retained but produces no further level-ups.

pub const MAX_LEVEL: u32 = 10;
const XP_PER_LEVEL_STEP: u32 = 200;

/// XP needed to advance out of the given level.
pub fn xp_required_for_level(level: u32) -> u32 {
    level * XP_PER_LEVEL_STEP
}

/// Result of applying an XP delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub level: u32,
    pub xp: u32,
    pub leveled_up: bool,
}

/// Applies a non-negative XP delta, consuming thresholds until the remaining
/// XP no longer covers the next level. Handles multi-level jumps in one call.
///
/// A negative delta is a caller contract violation, which is why `delta` is
/// unsigned here; callers clamping from wider types must log loudly instead of
/// silently coercing.
pub fn add_xp(current_level: u32, current_xp: u32, delta: u32) -> Progress {
    let mut level = current_level.clamp(1, MAX_LEVEL);
    let mut xp = current_xp + delta;
    let mut leveled_up = false;

    while level < MAX_LEVEL && xp >= xp_required_for_level(level) {
        xp -= xp_required_for_level(level);
        level += 1;
        leveled_up = true;
    }

    Progress { level, xp, leveled_up }
}
