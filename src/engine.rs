//! The tracker: public API for playing the logbook.
//!
//! Wraps the progression store with its collaborators. Validation failures
//! are surfaced through the prompter's alert, the daily reset goes through
//! its confirmation gate, and a boss defeat starts the celebration. Every
//! mutation is recorded on the session span and in metrics.

use opentelemetry::KeyValue;
use tracing::{Span, warn};
use uuid::Uuid;

use crate::celebration::{Celebration, Viewport};
use crate::config::Config;
use crate::derive::{Progress, level};
use crate::error::{Error, Result};
use crate::event::Event;
use crate::model::{ProgressionState, QuestBook};
use crate::prompt::Prompter;
use crate::storage::Storage;
use crate::store::{Engagement, ProgressionStore};
use crate::telemetry::{metrics, progress};

/// Question asked before the daily reset.
pub const RESET_PROMPT: &str = "Restart the daily cycle? Total XP and streak are kept.";

pub struct Tracker {
    store: ProgressionStore,
    prompter: Box<dyn Prompter>,
    celebration: Celebration,
    viewport: Viewport,
    session_id: Uuid,
    span: Span,
}

impl Tracker {
    pub fn new(store: ProgressionStore, prompter: impl Prompter + 'static) -> Self {
        let session_id = Uuid::new_v4();
        let span = progress::start_session_span(&session_id);
        span.record("logbook.level", level(store.state().total_xp));
        Self {
            store,
            prompter: Box::new(prompter),
            celebration: Celebration::new(),
            viewport: Viewport::from_terminal(),
            session_id,
            span,
        }
    }

    /// Open the configured storage and quest book.
    pub fn open(config: &Config, prompter: impl Prompter + 'static) -> Result<Self> {
        let storage = Storage::open(&config.data_dir)?;
        let book = config.quest_book()?;
        Ok(Self::new(ProgressionStore::open(storage, book), prompter))
    }

    /// Fresh tracker with in-memory storage (for testing).
    pub fn in_memory(book: QuestBook, prompter: impl Prompter + 'static) -> Self {
        Self::new(ProgressionStore::in_memory(book), prompter)
    }

    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    pub fn with_celebration(mut self, celebration: Celebration) -> Self {
        self.celebration = celebration;
        self
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    pub fn state(&self) -> &ProgressionState {
        self.store.state()
    }

    pub fn book(&self) -> &QuestBook {
        self.store.book()
    }

    pub fn progress(&self) -> Progress {
        self.store.progress()
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Toggle a daily quest by id. The boss has its own action.
    pub fn toggle(&mut self, quest_id: &str) -> Result<Event> {
        if self.book().is_boss(quest_id) {
            return Err(Error::NotAQuest(quest_id.to_string()));
        }
        let xp = self
            .book()
            .quest(quest_id)
            .map(|q| q.xp)
            .ok_or_else(|| Error::UnknownQuest(quest_id.to_string()))?;

        let event = self.store.toggle_quest(quest_id, xp)?;
        let completed = self.store.state().is_completed(quest_id);
        metrics::quest_toggles().add(
            1,
            &[
                KeyValue::new("quest_id", quest_id.to_string()),
                KeyValue::new("completed", completed.to_string()),
            ],
        );
        self.observe(&event);
        Ok(event)
    }

    /// Engage the boss. With no `objective`, the stored one is used.
    ///
    /// A blank objective raises an alert and fails without changing state.
    pub fn engage_boss(&mut self, objective: Option<&str>) -> Result<Engagement> {
        let objective = match objective {
            Some(text) => text.to_string(),
            None => self.store.state().boss_objective.clone(),
        };

        let engagement = match self.store.engage_boss(&objective) {
            Ok(engagement) => engagement,
            Err(Error::Validation(message)) => {
                warn!(%message, "boss engage rejected");
                metrics::boss_engagements().add(1, &[KeyValue::new("result", "rejected")]);
                self.prompter.alert(&message);
                return Err(Error::Validation(message));
            }
            Err(e) => return Err(e),
        };

        let result = if engagement.celebrate {
            self.celebration.trigger();
            "defeated"
        } else {
            "revived"
        };
        metrics::boss_engagements().add(1, &[KeyValue::new("result", result)]);
        self.observe(&engagement.event);
        Ok(engagement)
    }

    /// Edit the boss objective. Locked while the boss is defeated.
    pub fn set_boss_objective(&mut self, text: &str) -> Result<Event> {
        if self.store.boss_defeated() {
            return Err(Error::ObjectiveLocked);
        }
        let event = self.store.set_boss_objective(text)?;
        self.observe(&event);
        Ok(event)
    }

    pub fn increment_streak(&mut self) -> Result<Event> {
        let event = self.store.increment_streak()?;
        metrics::streak_changes().add(1, &[KeyValue::new("action", "increment")]);
        self.observe(&event);
        Ok(event)
    }

    pub fn reset_streak(&mut self) -> Result<Event> {
        let event = self.store.reset_streak()?;
        metrics::streak_changes().add(1, &[KeyValue::new("action", "reset")]);
        self.observe(&event);
        Ok(event)
    }

    /// Ask for confirmation, then clear today's progress. `None` if declined.
    pub fn reset_daily_cycle(&mut self) -> Result<Option<Event>> {
        let confirmed = self.prompter.confirm(RESET_PROMPT);
        metrics::daily_resets().add(1, &[KeyValue::new("confirmed", confirmed.to_string())]);

        let event = self.store.reset_daily_cycle(confirmed)?;
        if let Some(ref event) = event {
            self.observe(event);
        }
        Ok(event)
    }

    fn observe(&self, event: &Event) {
        let delta = event.kind.xp_delta();
        if delta != 0 {
            metrics::xp_delta().add(delta, &[]);
        }
        progress::record_mutation(&self.span, event, level(self.store.state().total_xp));
    }
}
