//! Project persistence.
//!
//! Projects are JSON records kept in a host-provided [`KeyValueStore`],
//! one key per project name. Timestamps are Unix milliseconds from an
//! injected clock.

use crate::Document;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use time::OffsetDateTime;
use time::macros::format_description;
use wm_core::WardleyMap;

const KEY_PREFIX: &str = "wardley-project:";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("project not found: {0}")]
    NotFound(String),
    #[error("project name must not be empty")]
    EmptyName,
    #[error("Failed to import project: {0}")]
    Import(String),
    #[error("stored project is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// String key/value persistence, e.g. browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
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

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub name: String,
    pub raw_text: String,
    pub map: WardleyMap,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProjectRecord {
    pub fn document(&self) -> Document {
        Document {
            source: self.raw_text.clone(),
            map: self.map.clone(),
        }
    }
}

/// Shape accepted by [`ProjectStore::import`]; timestamps are optional.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedProject {
    name: Option<String>,
    raw_text: Option<String>,
    map: Option<serde_json::Value>,
    created_at: Option<i64>,
}

pub struct ProjectStore<S: KeyValueStore> {
    store: S,
    clock: Box<dyn Fn() -> i64>,
}

impl<S: KeyValueStore> ProjectStore<S> {
    /// A project store on the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, Box::new(now_ms))
    }

    pub fn with_clock(store: S, clock: Box<dyn Fn() -> i64>) -> Self {
        Self { store, clock }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Save under `name`, overwriting any previous version but keeping its
    /// creation time.
    pub fn save(&mut self, name: &str, raw_text: &str, map: &WardleyMap) -> Result<ProjectRecord, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let now = (self.clock)();
        let created_at = match self.get_record(name)? {
            Some(existing) => existing.created_at,
            None => now,
        };
        let record = ProjectRecord {
            name: name.to_string(),
            raw_text: raw_text.to_string(),
            map: map.clone(),
            created_at,
            updated_at: now,
        };
        self.put_record(&record)?;
        log::debug!("saved project {name:?}");
        Ok(record)
    }

    pub fn load(&self, name: &str) -> Result<ProjectRecord, StoreError> {
        self.get_record(name)?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }

    /// Remove a project. Returns whether it existed.
    pub fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let key = key_for(name);
        if self.store.get(&key)?.is_none() {
            return Ok(false);
        }
        self.store.delete(&key)?;
        Ok(true)
    }

    /// Every stored project, most recently updated first.
    pub fn list(&self) -> Result<Vec<ProjectRecord>, StoreError> {
        let mut records = Vec::new();
        for key in self.store.keys()? {
            let Some(name) = key.strip_prefix(KEY_PREFIX) else {
                continue;
            };
            match self.get_record(name) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => log::warn!("skipping unreadable project {name:?}: {e}"),
            }
        }
        records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.name.cmp(&b.name)));
        Ok(records)
    }

    /// Pretty-printed JSON of one project, for download.
    pub fn export(&self, name: &str) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.load(name)?)?)
    }

    /// Validate and store a project exported by [`export`](Self::export).
    /// An existing project with the same name is replaced.
    pub fn import(&mut self, json: &str) -> Result<ProjectRecord, StoreError> {
        let imported: ImportedProject =
            serde_json::from_str(json).map_err(|e| StoreError::Import(e.to_string()))?;
        let name = imported
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| StoreError::Import("missing project name".into()))?;
        let raw_text = imported
            .raw_text
            .ok_or_else(|| StoreError::Import("missing map text".into()))?;
        let map = match imported.map {
            Some(value @ serde_json::Value::Object(_)) => serde_json::from_value::<WardleyMap>(value)
                .map_err(|e| StoreError::Import(format!("invalid map data: {e}")))?,
            _ => return Err(StoreError::Import("missing map data".into())),
        };
        let now = (self.clock)();
        let record = ProjectRecord {
            name,
            raw_text,
            map,
            created_at: imported.created_at.unwrap_or(now),
            updated_at: now,
        };
        self.put_record(&record)?;
        Ok(record)
    }

    /// A default name for a new project, from the store's clock.
    pub fn generate_name(&self) -> String {
        generate_project_name((self.clock)())
    }

    fn get_record(&self, name: &str) -> Result<Option<ProjectRecord>, StoreError> {
        match self.store.get(&key_for(name))? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn put_record(&mut self, record: &ProjectRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string(record)?;
        self.store.set(&key_for(&record.name), json)
    }
}

fn key_for(name: &str) -> String {
    format!("{KEY_PREFIX}{}", name.trim())
}

/// `WardleyMap_YYYY-MM-DD_HH-MM` for the given Unix millisecond time, in UTC.
pub fn generate_project_name(unix_ms: i64) -> String {
    let format = format_description!("[year]-[month]-[day]_[hour]-[minute]");
    let stamp = OffsetDateTime::from_unix_timestamp_nanos(i128::from(unix_ms) * 1_000_000)
        .ok()
        .and_then(|t| t.format(&format).ok());
    match stamp {
        Some(stamp) => format!("WardleyMap_{stamp}"),
        None => "WardleyMap".to_string(),
    }
}

fn now_ms() -> i64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    i64::try_from(dur.as_millis()).unwrap_or(0)
}
