//! Progression state: the single persisted entity.

use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the logbook remembers between sessions.
///
/// Two independent halves live here. The cumulative half (`total_xp`,
/// `streak`) survives the daily reset; the per-day half (`completed_quests`,
/// `boss_objective`) is cleared by it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgressionState {
    #[serde(rename = "xp")]
    pub total_xp: u64,

    pub streak: u64,

    /// Completion flag per quest id. A missing key means not completed.
    /// Keys outside the quest book are kept but never counted.
    #[serde(rename = "completedQuests")]
    pub completed_quests: BTreeMap<String, bool>,

    #[serde(rename = "bossObjective")]
    pub boss_objective: String,
}

impl ProgressionState {
    pub fn is_completed(&self, quest_id: &str) -> bool {
        self.completed_quests.get(quest_id).copied().unwrap_or(false)
    }

    /// Clear the per-day half. XP and streak are untouched.
    pub(crate) fn clear_day(&mut self) {
        self.completed_quests.clear();
        self.boss_objective.clear();
    }
}
