//! Flat key/value persistence
//!
//! The store is a durable mirror of settings, records and the daily task.
//! It is read once at startup and written after every relevant change.
//! Values are plain scalars, except the daily task which is JSON.

use std::collections::HashMap;

use thiserror::Error;

use crate::sim::{DailyTask, DailyTaskRecord, DateKey};

#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;

/// Storage keys, one per persisted field
pub mod keys {
    pub const HIGH_SCORE: &str = "tile_echo_high_score";
    pub const DIFFICULTY: &str = "tile_echo_difficulty";
    pub const PALETTE: &str = "tile_echo_palette";
    pub const MUTED: &str = "tile_echo_muted";
    pub const MODE: &str = "tile_echo_mode";
    pub const BEST_ZEN: &str = "tile_echo_best_zen";
    pub const LAST_TASK_DATE: &str = "tile_echo_last_task_date";
    pub const LAST_TASK: &str = "tile_echo_last_task";
}

/// Store write failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage backend unavailable")]
    Unavailable,
    #[error("storage rejected write for {key}: {reason}")]
    Rejected { key: String, reason: String },
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key/value storage backend
pub trait Store {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// In-memory store (native runs and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing `Store::set`
    pub fn insert(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load the last daily task and its date; `None` if either is missing or corrupt
pub fn load_daily_task<S: Store + ?Sized>(store: &S) -> Option<DailyTaskRecord> {
    let raw_date = store.get(keys::LAST_TASK_DATE)?;
    let Some(date) = DateKey::parse(&raw_date) else {
        log::warn!("Invalid stored task date {:?}, ignoring", raw_date);
        return None;
    };
    let raw_task = store.get(keys::LAST_TASK)?;
    match serde_json::from_str::<DailyTask>(&raw_task) {
        Ok(task) => Some(DailyTaskRecord { date, task }),
        Err(e) => {
            log::warn!("Invalid stored daily task ({}), ignoring", e);
            None
        }
    }
}

/// Write the daily task and its date
pub fn save_daily_task<S: Store + ?Sized>(
    store: &mut S,
    record: &DailyTaskRecord,
) -> Result<(), PersistError> {
    let json = serde_json::to_string(&record.task)?;
    store.set(keys::LAST_TASK_DATE, record.date.as_str())?;
    store.set(keys::LAST_TASK, &json)?;
    log::debug!(
        "Daily task saved ({} {}/{})",
        record.task.id.as_str(),
        record.task.progress,
        record.task.target
    );
    Ok(())
}
