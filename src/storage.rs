//! Persistence adapter.
//!
//! The whole progression state lives in one named slot of a durable
//! key-value medium. Loaded once at startup, rewritten in full after every
//! mutation. Loading never fails: unreadable fields fall back to their
//! defaults one by one.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::ProgressionState;

/// Name of the slot holding the progression record.
pub const SLOT_NAME: &str = "logbook_rpg_data";

/// A single durable value.
pub trait Slot: Send {
    /// Current contents, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the contents. Either the new value is fully visible afterwards
    /// or the previous one remains.
    fn write(&mut self, value: &str) -> Result<()>;
}

/// Slot backed by a JSON file. Writes go to a sibling temp file that is then
/// renamed over the target.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The slot file for [`SLOT_NAME`] inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{SLOT_NAME}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for FileSlot {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, value: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// In-process slot. Clones share the same value, so a test can keep a handle
/// while the storage owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `raw`, as if an earlier session had saved it.
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(raw.into()))),
        }
    }

    /// Snapshot of the current contents.
    pub fn contents(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&mut self, value: &str) -> Result<()> {
        *self
            .value
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(value.to_string());
        Ok(())
    }
}

/// Storage backend. Owns the slot.
pub struct Storage {
    slot: Box<dyn Slot>,
}

impl Storage {
    /// Open file-backed storage in the given data directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            Error::Config(format!("cannot create data dir {}: {e}", dir.display()))
        })?;
        Ok(Self::with_slot(FileSlot::in_dir(dir)))
    }

    /// Ephemeral storage (for testing and dry runs).
    pub fn in_memory() -> Self {
        Self::with_slot(MemorySlot::new())
    }

    pub fn with_slot(slot: impl Slot + 'static) -> Self {
        Self {
            slot: Box::new(slot),
        }
    }

    /// Read the stored state. A missing record yields the default state;
    /// a damaged one yields whatever fields could be salvaged.
    pub fn load(&self) -> ProgressionState {
        match self.slot.read() {
            Ok(Some(raw)) => decode_record(&raw),
            Ok(None) => {
                debug!("no stored progression, starting fresh");
                ProgressionState::default()
            }
            Err(e) => {
                warn!(error = %e, "stored progression unreadable, starting fresh");
                ProgressionState::default()
            }
        }
    }

    /// Overwrite the stored record with the full state.
    pub fn save(&mut self, state: &ProgressionState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.slot.write(&json)?;
        debug!(xp = state.total_xp, streak = state.streak, "progression saved");
        Ok(())
    }
}

/// Decode a stored record field by field.
///
/// Each field defaults independently when missing or of the wrong shape.
/// Text that is not a JSON object yields the default state.
pub fn decode_record(raw: &str) -> ProgressionState {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            report(Error::PersistenceParse(format!("not valid json: {e}")));
            return ProgressionState::default();
        }
    };

    let Some(record) = value.as_object() else {
        report(Error::PersistenceParse("record is not an object".to_string()));
        return ProgressionState::default();
    };

    ProgressionState {
        total_xp: field(record, "xp", Value::as_u64).unwrap_or_default(),
        streak: field(record, "streak", Value::as_u64).unwrap_or_default(),
        completed_quests: field(record, "completedQuests", completion_map).unwrap_or_default(),
        boss_objective: field(record, "bossObjective", |v| v.as_str().map(str::to_string))
            .unwrap_or_default(),
    }
}

/// Extract one field. Missing and `null` are silent; anything else that
/// `extract` rejects is reported.
fn field<T>(
    record: &Map<String, Value>,
    name: &str,
    extract: impl Fn(&Value) -> Option<T>,
) -> Option<T> {
    match record.get(name) {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = extract(value);
            if parsed.is_none() {
                report(Error::PersistenceParse(format!(
                    "field {name} has unexpected value {value}"
                )));
            }
            parsed
        }
    }
}

/// Boolean entries survive; anything else in the map is dropped.
fn completion_map(value: &Value) -> Option<BTreeMap<String, bool>> {
    let entries = value.as_object()?;
    let mut map = BTreeMap::new();
    for (id, flag) in entries {
        match flag.as_bool() {
            Some(done) => {
                map.insert(id.clone(), done);
            }
            None => report(Error::PersistenceParse(format!(
                "completion flag for {id} is not a boolean"
            ))),
        }
    }
    Some(map)
}

fn report(error: Error) {
    warn!(%error, "defaulting stored progression field");
}
