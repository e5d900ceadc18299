//! Core data model.
//!
//! Quests are static definitions fixed for the lifetime of the process.
//! Progression state is the single persisted entity that user actions mutate.

pub mod quest;
pub mod state;

pub use quest::{QuestBook, QuestDefinition};
pub use state::ProgressionState;
