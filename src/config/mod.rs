//! Typed configuration from environment variables.
//!
//! Loads once at startup. In local dev the binary calls
//! `dotenvy::dotenv().ok()` first so a `.env` file can supply the vars.

use crate::error::{Error, Result};
use crate::model::QuestBook;
use std::path::PathBuf;

/// Directory name under the platform data dir.
const APP_DIR: &str = "logbook-rpg";

#[derive(Debug, Clone)]
pub struct Config {
    /// Where the progression slot file lives.
    pub data_dir: PathBuf,
    /// Optional TOML quest book replacing the built-in quests.
    pub quest_file: Option<PathBuf>,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `LOGBOOK_DATA_DIR` falls back to the platform data directory; it is
    /// an error only when neither is available.
    pub fn from_env() -> Result<Self> {
        let data_dir = match non_empty_var("LOGBOOK_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir().map(|d| d.join(APP_DIR)).ok_or_else(|| {
                Error::Config(
                    "LOGBOOK_DATA_DIR is not set and no platform data directory exists"
                        .to_string(),
                )
            })?,
        };

        Ok(Self {
            data_dir,
            quest_file: non_empty_var("LOGBOOK_QUESTS").map(PathBuf::from),
            otel_endpoint: non_empty_var("OTEL_ENDPOINT"),
            log_level: non_empty_var("LOG_LEVEL").unwrap_or_else(|| "warn".to_string()),
        })
    }

    /// The quest book to play with: the configured file, or the built-in one.
    pub fn quest_book(&self) -> Result<QuestBook> {
        match &self.quest_file {
            Some(path) => QuestBook::load_from_file(path),
            None => Ok(QuestBook::builtin()),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
