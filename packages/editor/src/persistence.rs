//! # Persistence
//!
//! Durable key-value storage for the open project and its history.
//!
//! Stored values are untrusted: anything that fails to parse is removed and
//! treated as absent, so a corrupt cache can never keep the editor from
//! starting. A [`KeyValueStore`] can be:
//! - **Memory-backed**: tests, or a front end that has no disk
//! - **Directory-backed**: one file per key, used by the CLI

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use arnika_model::{IdGenerator, ModelError, Project};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::history::{History, HistoryEntry};

/// Project snapshot key
pub const PROJECT_KEY: &str = "arnika_akre_project_v3";

/// History timeline key (JSON array of entries)
pub const HISTORY_KEY: &str = "arnika_history_v3";

/// Position of the live project in the timeline
pub const HISTORY_INDEX_KEY: &str = "arnika_history_index_v3";

/// Set to `"true"` once the onboarding tour was dismissed
pub const TOUR_KEY: &str = "arnika_tour_completed";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage quota exceeded: {needed} bytes needed, {quota} allowed")]
    QuotaExceeded { needed: usize, quota: usize },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage, the "local device storage" of a front end
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory store with an optional byte quota over all keys and values
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            values: Mutex::default(),
            quota: Some(quota),
        }
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values();

        if let Some(quota) = self.quota {
            let others: usize = values
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > quota {
                return Err(StorageError::QuotaExceeded { needed, quota });
            }
        }

        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values().remove(key);
        Ok(())
    }
}

/// One file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // Write then rename so a crash never leaves a half-written value
        let tmp = path.with_extension("tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Autosave status shown next to the project name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Last write failed (or nothing to write)
    Idle,
    /// Change observed, write pending
    Saving,
    /// Latest change is on disk
    Saved,
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SaveStatus::Idle => "idle",
            SaveStatus::Saving => "saving",
            SaveStatus::Saved => "saved",
        };
        f.write_str(text)
    }
}

/// State recovered at startup
#[derive(Debug, Clone, Default)]
pub struct Restored {
    pub project: Option<Project>,
    pub history: History,
    pub tour_completed: bool,
}

/// Load project, history and tour flag. Never fails: unreadable or corrupt
/// values are dropped (and removed from the store).
pub fn restore<S: KeyValueStore + ?Sized>(store: &S) -> Restored {
    let project = read_key(store, PROJECT_KEY).and_then(|raw| match Project::from_json(&raw) {
        Ok(mut project) => {
            if project.validate().is_err() {
                let fixed = project.rekey_duplicates(&mut IdGenerator::new());
                warn!(fixed, "stored project had duplicate ids");
            }
            Some(project)
        }
        Err(e) => {
            warn!(key = PROJECT_KEY, error = %e, "discarding unreadable project");
            discard(store, PROJECT_KEY);
            None
        }
    });

    let cursor = read_key(store, HISTORY_INDEX_KEY).and_then(|raw| {
        match serde_json::from_str::<usize>(&raw) {
            Ok(cursor) => Some(cursor),
            Err(e) => {
                warn!(key = HISTORY_INDEX_KEY, error = %e, "discarding unreadable history index");
                discard(store, HISTORY_INDEX_KEY);
                None
            }
        }
    });

    let history = read_key(store, HISTORY_KEY)
        .and_then(|raw| match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => {
                let (entries, cursor) = repair_entries(entries, cursor);
                Some(History::from_entries_at(entries, cursor))
            }
            Err(e) => {
                warn!(key = HISTORY_KEY, error = %e, "discarding unreadable history");
                discard(store, HISTORY_KEY);
                None
            }
        })
        .unwrap_or_default();

    let tour_completed = tour_completed(store);

    info!(
        project = project.as_ref().map(|p| p.name.as_str()).unwrap_or("<none>"),
        history = history.len(),
        cursor = ?history.cursor(),
        "restored local state"
    );

    Restored {
        project,
        history,
        tour_completed,
    }
}

/// Stored entries get the same checks as the stored project: entries
/// without slides are dropped, duplicate ids are rekeyed. The cursor stays
/// on its entry, or the nearest kept one before it.
fn repair_entries(
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
) -> (Vec<HistoryEntry>, Option<usize>) {
    let mut ids = IdGenerator::new();
    let mut kept = Vec::with_capacity(entries.len());
    let mut kept_cursor = None;

    for (index, mut entry) in entries.into_iter().enumerate() {
        match entry.project.validate() {
            Ok(()) => {}
            Err(ModelError::NoSlides) => {
                warn!(index, action = %entry.action, "dropping history entry without slides");
                continue;
            }
            Err(e) => {
                let fixed = entry.project.rekey_duplicates(&mut ids);
                warn!(index, fixed, error = %e, "history entry had duplicate ids");
            }
        }
        kept.push(entry);
        if cursor.is_some_and(|c| index <= c) {
            kept_cursor = Some(kept.len() - 1);
        }
    }

    let cursor = cursor.map(|_| kept_cursor.unwrap_or(0));
    (kept, cursor)
}

/// Write project and history. Both are serialized before anything is
/// written, so a serialization failure leaves the store untouched.
pub fn save<S: KeyValueStore + ?Sized>(
    store: &S,
    project: &Project,
    history: &History,
) -> Result<(), StorageError> {
    let project_json = serde_json::to_string(project)?;
    let history_json = serde_json::to_string(history.entries())?;

    store.set(PROJECT_KEY, &project_json)?;
    store.set(HISTORY_KEY, &history_json)?;
    save_cursor(store, history)?;

    debug!(
        bytes = project_json.len() + history_json.len(),
        "saved project and history"
    );
    Ok(())
}

/// Persist a session whose project was dissolved: the project key goes,
/// the history stays so the project can be restored from it.
pub fn save_history<S: KeyValueStore + ?Sized>(
    store: &S,
    history: &History,
) -> Result<(), StorageError> {
    let history_json = serde_json::to_string(history.entries())?;
    store.remove(PROJECT_KEY)?;
    store.set(HISTORY_KEY, &history_json)?;
    save_cursor(store, history)?;
    debug!(entries = history.len(), "saved history without project");
    Ok(())
}

/// Remove project and history (the "reset cache" path). The tour flag stays.
pub fn clear<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StorageError> {
    store.remove(PROJECT_KEY)?;
    store.remove(HISTORY_KEY)?;
    store.remove(HISTORY_INDEX_KEY)?;
    info!("cleared stored project and history");
    Ok(())
}

fn save_cursor<S: KeyValueStore + ?Sized>(
    store: &S,
    history: &History,
) -> Result<(), StorageError> {
    match history.cursor() {
        Some(cursor) => store.set(HISTORY_INDEX_KEY, &cursor.to_string()),
        None => store.remove(HISTORY_INDEX_KEY),
    }
}

pub fn tour_completed<S: KeyValueStore + ?Sized>(store: &S) -> bool {
    matches!(store.get(TOUR_KEY), Ok(Some(value)) if value == "true")
}

pub fn mark_tour_completed<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StorageError> {
    store.set(TOUR_KEY, "true")
}

fn read_key<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "could not read stored value");
            None
        }
    }
}

fn discard<S: KeyValueStore + ?Sized>(store: &S, key: &str) {
    if let Err(e) = store.remove(key) {
        warn!(key, error = %e, "could not remove stored value");
    }
}
