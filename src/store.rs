//! Progression store.
//!
//! The single writer of [`ProgressionState`]. Every mutation either fails
//! without touching state, or applies, saves the full record and returns the
//! [`Event`] describing it.

use chrono::Utc;
use tracing::{info, warn};

use crate::derive::Progress;
use crate::error::{Error, Result};
use crate::event::{Event, EventKind};
use crate::model::{ProgressionState, QuestBook};
use crate::storage::Storage;

/// Message carried by the validation error when the boss has no objective.
pub const OBJECTIVE_REQUIRED: &str = "Define the fight objective before engaging the boss!";

/// Result of [`ProgressionStore::engage_boss`].
#[derive(Debug, Clone)]
pub struct Engagement {
    pub event: Event,
    /// The boss was just defeated and a celebration should play.
    pub celebrate: bool,
}

/// Owns the progression state, the quest book and the storage behind them.
pub struct ProgressionStore {
    state: ProgressionState,
    book: QuestBook,
    storage: Storage,
    next_seq: u64,
}

impl ProgressionStore {
    /// Hydrate from storage. Never fails; damaged records load as defaults.
    pub fn open(storage: Storage, book: QuestBook) -> Self {
        let state = storage.load();
        info!(
            xp = state.total_xp,
            streak = state.streak,
            completed = state.completed_quests.values().filter(|done| **done).count(),
            "progression loaded"
        );
        Self {
            state,
            book,
            storage,
            next_seq: 1,
        }
    }

    /// Fresh state with in-memory storage (for testing).
    pub fn in_memory(book: QuestBook) -> Self {
        Self::open(Storage::in_memory(), book)
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn book(&self) -> &QuestBook {
        &self.book
    }

    /// All derived values for the current state.
    pub fn progress(&self) -> Progress {
        Progress::compute(&self.state, &self.book)
    }

    pub fn boss_defeated(&self) -> bool {
        self.state.is_completed(&self.book.boss().id)
    }

    // -----------------------------------------------------------------------
    // Per-day mutations
    // -----------------------------------------------------------------------

    /// Flip a quest's completion flag, adding `xp` on completion and
    /// removing it on un-completion.
    pub fn toggle_quest(&mut self, quest_id: &str, xp: u32) -> Result<Event> {
        let previous = self.state.clone();
        let completed = !self.state.is_completed(quest_id);
        let xp_delta = self.adjust_xp(completed, xp);
        self.state
            .completed_quests
            .insert(quest_id.to_string(), completed);

        info!(quest_id, completed, xp_delta, total_xp = self.state.total_xp, "quest toggled");
        self.commit(previous, EventKind::QuestToggled {
            quest_id: quest_id.to_string(),
            completed,
            xp_delta,
            total_xp: self.state.total_xp,
        })
    }

    /// Defeat the boss, or undo a defeat.
    ///
    /// Defeating requires a non-blank objective, which is recorded. Undoing
    /// ignores `objective`.
    pub fn engage_boss(&mut self, objective: &str) -> Result<Engagement> {
        let boss_id = self.book.boss().id.clone();
        let boss_xp = self.book.boss().xp;
        let defeated = self.state.is_completed(&boss_id);

        if !defeated && objective.trim().is_empty() {
            return Err(Error::Validation(OBJECTIVE_REQUIRED.to_string()));
        }

        let previous = self.state.clone();
        let xp_delta = self.adjust_xp(!defeated, boss_xp);
        let kind = if defeated {
            info!(xp_delta, total_xp = self.state.total_xp, "boss revived");
            EventKind::BossDisengaged {
                xp_delta,
                total_xp: self.state.total_xp,
            }
        } else {
            self.state.boss_objective = objective.to_string();
            info!(objective, xp_delta, total_xp = self.state.total_xp, "boss defeated");
            EventKind::BossEngaged {
                objective: objective.to_string(),
                xp_delta,
                total_xp: self.state.total_xp,
            }
        };
        self.state.completed_quests.insert(boss_id, !defeated);

        let event = self.commit(previous, kind)?;
        Ok(Engagement {
            event,
            celebrate: !defeated,
        })
    }

    /// Replace the boss objective. Callers reject edits while the boss is
    /// defeated.
    pub fn set_boss_objective(&mut self, text: &str) -> Result<Event> {
        let previous = self.state.clone();
        self.state.boss_objective = text.to_string();
        self.commit(previous, EventKind::BossObjectiveSet {
            objective: text.to_string(),
        })
    }

    /// Clear today's completions and objective when `confirmed`.
    /// XP and streak are kept. Returns `None` when declined.
    pub fn reset_daily_cycle(&mut self, confirmed: bool) -> Result<Option<Event>> {
        if !confirmed {
            info!("daily cycle reset declined");
            return Ok(None);
        }
        let previous = self.state.clone();
        let cleared_quests = self.state.completed_quests.len();
        self.state.clear_day();

        info!(cleared_quests, "daily cycle reset");
        self.commit(previous, EventKind::DailyCycleReset { cleared_quests })
            .map(Some)
    }

    // -----------------------------------------------------------------------
    // Streak
    // -----------------------------------------------------------------------

    pub fn increment_streak(&mut self) -> Result<Event> {
        let previous = self.state.clone();
        self.state.streak = self.state.streak.saturating_add(1);
        info!(streak = self.state.streak, "streak incremented");
        self.commit(previous, EventKind::StreakIncremented {
            streak: self.state.streak,
        })
    }

    pub fn reset_streak(&mut self) -> Result<Event> {
        let snapshot = self.state.clone();
        let previous = std::mem::take(&mut self.state.streak);
        info!(previous, "streak reset");
        self.commit(snapshot, EventKind::StreakReset { previous })
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Add or remove `xp`, saturating at zero. Returns the applied change.
    fn adjust_xp(&mut self, gain: bool, xp: u32) -> i64 {
        let before = self.state.total_xp;
        self.state.total_xp = if gain {
            before.saturating_add(u64::from(xp))
        } else {
            before.saturating_sub(u64::from(xp))
        };
        self.state.total_xp as i64 - before as i64
    }

    /// Save the full state and stamp the event. A failed save restores
    /// `previous`, so memory never runs ahead of the stored record.
    fn commit(&mut self, previous: ProgressionState, kind: EventKind) -> Result<Event> {
        if let Err(e) = self.storage.save(&self.state) {
            warn!(error = %e, mutation = kind.name(), "save failed, mutation rolled back");
            self.state = previous;
            return Err(e);
        }
        let event = Event {
            seq: self.next_seq,
            timestamp: Utc::now(),
            kind,
        };
        self.next_seq += 1;
        Ok(event)
    }
}
