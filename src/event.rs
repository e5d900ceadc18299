//! Structured events emitted by the store on every mutation.
//!
//! Events describe what just happened. They are returned to the caller and
//! logged; the logbook keeps no history of past days.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A structured event emitted by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Monotonic within one session. Consumers can detect gaps.
    pub seq: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    QuestToggled {
        quest_id: String,
        completed: bool,
        xp_delta: i64,
        total_xp: u64,
    },
    BossEngaged {
        objective: String,
        xp_delta: i64,
        total_xp: u64,
    },
    BossDisengaged {
        xp_delta: i64,
        total_xp: u64,
    },
    BossObjectiveSet {
        objective: String,
    },
    StreakIncremented {
        streak: u64,
    },
    StreakReset {
        previous: u64,
    },
    DailyCycleReset {
        cleared_quests: usize,
    },
}

impl EventKind {
    /// Short stable name, used for logs and metric labels.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::QuestToggled { .. } => "quest_toggled",
            EventKind::BossEngaged { .. } => "boss_engaged",
            EventKind::BossDisengaged { .. } => "boss_disengaged",
            EventKind::BossObjectiveSet { .. } => "boss_objective_set",
            EventKind::StreakIncremented { .. } => "streak_incremented",
            EventKind::StreakReset { .. } => "streak_reset",
            EventKind::DailyCycleReset { .. } => "daily_cycle_reset",
        }
    }

    /// Signed XP change carried by this event, zero for non-XP events.
    pub fn xp_delta(&self) -> i64 {
        match self {
            EventKind::QuestToggled { xp_delta, .. }
            | EventKind::BossEngaged { xp_delta, .. }
            | EventKind::BossDisengaged { xp_delta, .. } => *xp_delta,
            _ => 0,
        }
    }
}
