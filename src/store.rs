use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::lineup::{Assignments, Lineup, Performer, PerformerView};

/// Record holding the roster
pub const ARTISTS_KEY: &str = "warped-artists";
/// Record holding the slot mapping
pub const SCHEDULE_KEY: &str = "warped-schedule";

/// Flat string key-value persistence, the only storage the planner needs
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// In-process store, used by tests and throwaway sessions
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per record inside a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let write_err = |source| StoreError::Write {
            key: key.to_string(),
            path: path.clone(),
            source,
        };
        fs::create_dir_all(&self.dir).map_err(write_err)?;
        fs::write(&path, value).map_err(write_err)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Write {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }
}

/// Reads the lineup back from `store`.
///
/// Each record falls back on its own: a missing or unreadable roster means
/// the seed roster, a missing or unreadable schedule means nothing booked.
pub fn load_lineup<S: KeyValueStore + ?Sized>(store: &S, catalog: &Catalog) -> Lineup {
    let roster = read_record::<Vec<PerformerView>, _>(store, ARTISTS_KEY)
        .map(|views| views.into_iter().map(Performer::from).collect())
        .unwrap_or_else(|| catalog.seed_roster());
    let assignments = read_record::<Assignments, _>(store, SCHEDULE_KEY).unwrap_or_default();
    Lineup::new(catalog, roster, assignments)
}

/// Writes both records. The roster record carries each performer's derived
/// stage and time next to its name.
pub fn save_lineup<S: KeyValueStore + ?Sized>(store: &mut S, lineup: &Lineup) -> Result<(), StoreError> {
    let roster: Vec<PerformerView> = lineup
        .roster()
        .iter()
        .map(|p| PerformerView::of(lineup, p))
        .collect();
    let roster = serde_json::to_string(&roster).map_err(|source| StoreError::Encode {
        key: ARTISTS_KEY.to_string(),
        source,
    })?;
    let schedule = serde_json::to_string(lineup.assignments()).map_err(|source| StoreError::Encode {
        key: SCHEDULE_KEY.to_string(),
        source,
    })?;

    store.set(ARTISTS_KEY, &roster)?;
    store.set(SCHEDULE_KEY, &schedule)?;
    debug!(
        performers = lineup.roster().len(),
        scheduled = lineup.scheduled_count(),
        "saved lineup"
    );
    Ok(())
}

/// Drops both records
pub fn clear_lineup<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), StoreError> {
    store.remove(ARTISTS_KEY)?;
    store.remove(SCHEDULE_KEY)
}

fn read_record<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(error) => {
            warn!(key, %error, "could not read stored record, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(key, %error, "stored record is corrupt, using defaults");
            None
        }
    }
}
