//! Quest definitions and the quest book.
//!
//! The quest book is the static configuration: an ordered list of daily
//! quests plus one boss. It ships with built-in defaults and can be replaced
//! by a TOML file read once at startup. It is never edited while running.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A recurring daily task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestDefinition {
    /// Unique identifier. Also the key in the persisted completion map.
    pub id: String,
    pub title: String,
    /// Display label such as "04h00". Not enforced.
    #[serde(default)]
    pub time: Option<String>,
    /// XP awarded on completion. Always positive.
    pub xp: u32,
}

impl QuestDefinition {
    pub fn new(id: impl Into<String>, title: impl Into<String>, xp: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time: None,
            xp,
        }
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }
}

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
struct QuestBookFile {
    #[serde(default, rename = "quest")]
    quests: Vec<QuestDefinition>,
    boss: QuestDefinition,
}

/// The ordered quest list plus the boss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestBook {
    quests: Vec<QuestDefinition>,
    boss: QuestDefinition,
}

impl QuestBook {
    /// Build a quest book, rejecting duplicate or empty ids and zero XP.
    pub fn new(quests: Vec<QuestDefinition>, boss: QuestDefinition) -> Result<Self> {
        let mut seen = HashSet::new();
        for quest in quests.iter().chain(std::iter::once(&boss)) {
            if quest.id.trim().is_empty() {
                return Err(Error::Config("quest id must not be empty".to_string()));
            }
            if quest.xp == 0 {
                return Err(Error::Config(format!(
                    "quest {} must award a positive amount of XP",
                    quest.id
                )));
            }
            if !seen.insert(quest.id.as_str()) {
                return Err(Error::Config(format!("duplicate quest id: {}", quest.id)));
            }
        }
        Ok(Self { quests, boss })
    }

    /// The built-in daily routine.
    pub fn builtin() -> Self {
        Self {
            quests: vec![
                QuestDefinition::new("main_quest", "Main Quest: The Awakening", 50).at("04h00"),
                QuestDefinition::new("side_quest", "Side Quest: Devotional/Reading", 30),
                QuestDefinition::new("daily_task", "Daily Task: Armored Commute", 20),
            ],
            boss: QuestDefinition::new("boss_fight", "BOSS FIGHT: Ambush Zone", 100)
                .at("18h00 - 20h30"),
        }
    }

    /// Load a quest book from a TOML file.
    ///
    /// ```toml
    /// [[quest]]
    /// id = "main_quest"
    /// title = "Main Quest"
    /// time = "04h00"
    /// xp = 50
    ///
    /// [boss]
    /// id = "boss_fight"
    /// title = "Boss Fight"
    /// xp = 100
    /// ```
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read quest book {}: {e}", path.display()))
        })?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("bad quest book {}: {e}", path.display())))
    }

    /// Parse a quest book from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: QuestBookFile =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        Self::new(file.quests, file.boss)
    }

    /// Daily quests in display order, excluding the boss.
    pub fn quests(&self) -> &[QuestDefinition] {
        &self.quests
    }

    pub fn boss(&self) -> &QuestDefinition {
        &self.boss
    }

    /// Look up a regular quest by id. The boss is not returned here.
    pub fn quest(&self, id: &str) -> Option<&QuestDefinition> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// Look up any definition, boss included.
    pub fn definition(&self, id: &str) -> Option<&QuestDefinition> {
        if self.boss.id == id {
            Some(&self.boss)
        } else {
            self.quest(id)
        }
    }

    pub fn is_boss(&self, id: &str) -> bool {
        self.boss.id == id
    }
}

impl Default for QuestBook {
    fn default() -> Self {
        Self::builtin()
    }
}
