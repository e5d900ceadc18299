//! # logbook-rpg
//!
//! Progression engine for a gamified daily quest logbook.
//!
//! Daily quests and one boss earn XP that accumulates into a level, next to
//! a manually kept day streak. State is persisted to a single JSON slot after
//! every change and restored at startup.

pub mod celebration;
pub mod config;
pub mod derive;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod prompt;
pub mod storage;
pub mod store;
pub mod telemetry;
