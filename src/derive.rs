//! Derived progression values.
//!
//! Pure functions over [`ProgressionState`] and the [`QuestBook`]. Nothing
//! here is stored; everything is recomputed on read.

use serde::Serialize;

use crate::model::{ProgressionState, QuestBook};

/// XP needed per level.
pub const XP_PER_LEVEL: u64 = 1000;

/// Level for a given XP total. Level 1 at zero, +1 every full 1000 XP.
pub fn level(total_xp: u64) -> u64 {
    total_xp / XP_PER_LEVEL + 1
}

/// XP accumulated since the start of the current level.
pub fn xp_into_level(total_xp: u64) -> u64 {
    total_xp % XP_PER_LEVEL
}

/// XP still missing before the next level.
pub fn xp_to_next_level(total_xp: u64) -> u64 {
    XP_PER_LEVEL - xp_into_level(total_xp)
}

/// Sum of every quest's XP plus the boss.
pub fn daily_xp_possible(book: &QuestBook) -> u64 {
    book.quests().iter().map(|q| u64::from(q.xp)).sum::<u64>() + u64::from(book.boss().xp)
}

/// XP earned today: known definitions flagged complete. Unknown keys count zero.
pub fn daily_xp_earned(state: &ProgressionState, book: &QuestBook) -> u64 {
    state
        .completed_quests
        .iter()
        .filter(|(_, done)| **done)
        .filter_map(|(id, _)| book.definition(id))
        .map(|q| u64::from(q.xp))
        .sum()
}

/// Rounded share of today's XP, clamped to 100. An empty book yields 0.
pub fn daily_progress_percent(state: &ProgressionState, book: &QuestBook) -> u8 {
    percent(daily_xp_earned(state, book), daily_xp_possible(book))
}

fn percent(earned: u64, possible: u64) -> u8 {
    if possible == 0 {
        return 0;
    }
    let pct = (earned as f64 / possible as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Every derived value at once, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub level: u64,
    pub total_xp: u64,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
    pub streak: u64,
    pub daily_xp_earned: u64,
    pub daily_xp_possible: u64,
    pub daily_progress_percent: u8,
    pub boss_defeated: bool,
}

impl Progress {
    pub fn compute(state: &ProgressionState, book: &QuestBook) -> Self {
        let earned = daily_xp_earned(state, book);
        let possible = daily_xp_possible(book);
        Self {
            level: level(state.total_xp),
            total_xp: state.total_xp,
            xp_into_level: xp_into_level(state.total_xp),
            xp_to_next_level: xp_to_next_level(state.total_xp),
            streak: state.streak,
            daily_xp_earned: earned,
            daily_xp_possible: possible,
            daily_progress_percent: percent(earned, possible),
            boss_defeated: state.is_completed(&book.boss().id),
        }
    }
}
