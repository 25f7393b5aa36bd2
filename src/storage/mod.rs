//! Local persistence for the schedule and theme
//!
//! Two entries in a key-value store, each a JSON document:
//! - `lumina_schedule_v1`: array of courses
//! - `lumina_theme_v1`: boolean, `true` for dark mode
//!
//! Nothing is versioned. A missing or unreadable schedule falls back to the
//! seed list; a missing or unreadable theme falls back to light.

pub mod file;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::StorageError;
use crate::hooks::{HookFn, MutationEvent};
use crate::schedule::seed_courses;
use crate::types::Course;

pub use file::FileStore;

/// Key holding the serialized course list
pub const SCHEDULE_KEY: &str = "lumina_schedule_v1";

/// Key holding the dark-mode flag
pub const THEME_KEY: &str = "lumina_theme_v1";

/// Opaque string key-value store
pub trait KeyValueStore: Send + Sync {
    /// Raw value under `key`, or `None` if never written
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store, for tests and throwaway sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl KeyValueStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Typed access to the two persisted entries
#[derive(Clone)]
pub struct ScheduleStore {
    backend: Arc<dyn KeyValueStore>,
}

impl ScheduleStore {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Stored courses, or the seed list when there are none or they cannot
    /// be read
    pub fn load_courses(&self) -> Vec<Course> {
        let raw = match self.backend.load(SCHEDULE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored schedule, using seed list");
                return seed_courses();
            }
            Err(e) => {
                warn!("Could not read stored schedule, using seed list: {}", e);
                return seed_courses();
            }
        };

        match serde_json::from_str::<Vec<Course>>(&raw) {
            Ok(courses) => {
                debug!("Loaded {} stored courses", courses.len());
                courses
            }
            Err(e) => {
                warn!("Stored schedule is malformed, using seed list: {}", e);
                seed_courses()
            }
        }
    }

    pub fn save_courses(&self, courses: &[Course]) -> Result<(), StorageError> {
        let json = serde_json::to_string(courses).map_err(|source| StorageError::Encode {
            key: SCHEDULE_KEY.to_string(),
            source,
        })?;
        self.backend.save(SCHEDULE_KEY, &json)
    }

    /// Stored theme flag; light when absent or unreadable
    pub fn load_dark_mode(&self) -> bool {
        match self.backend.load(THEME_KEY) {
            Ok(Some(raw)) => serde_json::from_str::<bool>(&raw).unwrap_or_else(|e| {
                warn!("Stored theme is malformed, using light: {}", e);
                false
            }),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read stored theme, using light: {}", e);
                false
            }
        }
    }

    pub fn save_dark_mode(&self, dark: bool) -> Result<(), StorageError> {
        let json = if dark { "true" } else { "false" };
        self.backend.save(THEME_KEY, json)
    }

    /// Mutation hook that writes the whole registry after every change
    pub fn persist_hook(&self) -> HookFn {
        let store = self.clone();
        Arc::new(move |event: &MutationEvent<'_>| {
            debug!("Persisting {} courses after {}", event.courses.len(), event.kind);
            store.save_courses(event.courses)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory() -> (Arc<MemoryStore>, ScheduleStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = ScheduleStore::new(backend.clone());
        (backend, store)
    }

    #[test]
    fn test_absent_schedule_falls_back_to_seed() {
        let (_, store) = memory();
        assert_eq!(store.load_courses(), seed_courses());
    }

    #[test]
    fn test_malformed_schedule_falls_back_to_seed() {
        let (backend, store) = memory();
        backend.save(SCHEDULE_KEY, "{not json").unwrap();
        assert_eq!(store.load_courses(), seed_courses());

        backend.save(SCHEDULE_KEY, r#"[{"id":"1"}]"#).unwrap();
        assert_eq!(store.load_courses(), seed_courses());
    }

    #[test]
    fn test_empty_stored_schedule_is_kept() {
        let (_, store) = memory();
        store.save_courses(&[]).unwrap();
        assert!(store.load_courses().is_empty());
    }

    #[test]
    fn test_courses_round_trip() {
        let (backend, store) = memory();
        let mut courses = seed_courses();
        courses.truncate(2);
        store.save_courses(&courses).unwrap();
        assert_eq!(store.load_courses(), courses);

        let raw = backend.load(SCHEDULE_KEY).unwrap().unwrap();
        assert!(raw.contains("\"timeSlot\":\"1st Period\""));
    }

    #[test]
    fn test_dark_mode_round_trip() {
        let (backend, store) = memory();
        assert!(!store.load_dark_mode());
        store.save_dark_mode(true).unwrap();
        assert!(store.load_dark_mode());
        assert_eq!(backend.load(THEME_KEY).unwrap().as_deref(), Some("true"));

        backend.save(THEME_KEY, "\"dark\"").unwrap();
        assert!(!store.load_dark_mode());
    }
}
