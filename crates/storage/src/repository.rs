use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::keys::StoreKey;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key-value store holding whole JSON documents.
///
/// Every write replaces the full value for a key; there are no partial
/// updates and no batching. Concurrent writers to the same key race and the
/// last write wins.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value for a key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store a raw value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove a key. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Load and decode the JSON document stored under `key`.
///
/// Returns `Ok(None)` if nothing has been stored yet.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the stored value is not valid JSON
/// for `T`, or any backend error.
pub async fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &StoreKey,
) -> Result<Option<T>, StorageError> {
    let name = key.as_key();
    let Some(raw) = store.get(&name).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::Serialization(format!("{name}: {e}")))
}

/// Encode `value` as JSON and overwrite `key` with it.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or any backend error.
pub async fn save_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &StoreKey,
    value: &T,
) -> Result<(), StorageError> {
    let name = key.as_key();
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(format!("{name}: {e}")))?;
    tracing::trace!(key = %name, bytes = raw.len(), "writing store value");
    store.set(&name, raw).await
}

/// Simple in-memory store for testing and demo runs.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Wraps the active store behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub store: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lms_core::model::{CourseId, EnrollmentSet};

    #[tokio::test]
    async fn json_round_trips_through_store() {
        let store = InMemoryStore::new();
        let mut set = EnrollmentSet::new();
        set.insert(CourseId::new("1"));
        save_json(&store, &StoreKey::EnrolledCourses, &set)
            .await
            .unwrap();

        assert_eq!(
            store.get("enrolled_courses").await.unwrap().as_deref(),
            Some(r#"["1"]"#)
        );
        let loaded: EnrollmentSet = load_json(&store, &StoreKey::EnrolledCourses)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(loaded, set);
    }

    #[tokio::test]
    async fn missing_key_loads_as_none() {
        let store = InMemoryStore::new();
        let loaded: Option<EnrollmentSet> = load_json(&store, &StoreKey::EnrolledCourses)
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn corrupt_json_is_a_serialization_error() {
        let store = InMemoryStore::new();
        store
            .set("watched_videos", "{not json".to_owned())
            .await
            .unwrap();
        let err = load_json::<EnrollmentSet>(&store, &StoreKey::WatchedVideos)
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Serialization(msg) if msg.starts_with("watched_videos")));
    }

    #[tokio::test]
    async fn remove_missing_key_is_ok() {
        let store = InMemoryStore::new();
        store.remove("courses").await.unwrap();
        assert!(store.get("courses").await.unwrap().is_none());
    }
}
