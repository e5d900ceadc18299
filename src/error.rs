//! Error types for logbook-rpg.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// User input rejected before any state changed.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("boss objective is locked while the boss is defeated")]
    ObjectiveLocked,

    #[error("unknown quest: {0}")]
    UnknownQuest(String),

    #[error("{0} is the boss; use `boss engage` instead")]
    NotAQuest(String),

    /// A stored field could not be read. Recovered by defaulting; never fatal.
    #[error("stored record unreadable: {0}")]
    PersistenceParse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
