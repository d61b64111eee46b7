use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::{validate_key, KvBackend};

/// In-memory, HashMap-based backend.
///
/// Intended for tests and embedding. An optional byte quota makes it behave
/// like a browser storage area that refuses writes once full.
pub struct InMemoryKvBackend {
    entries: RwLock<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl InMemoryKvBackend {
    /// Create a new empty backend with no quota.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: None,
        }
    }

    /// Create a backend that rejects writes pushing the total of key and
    /// value bytes above `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total key and value bytes currently stored.
    pub fn used_bytes(&self) -> usize {
        self.entries
            .read()
            .map(|m| m.iter().map(|(k, v)| k.len() + v.len()).sum())
            .unwrap_or(0)
    }
}

impl Default for InMemoryKvBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KvBackend for InMemoryKvBackend {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        validate_key(key)?;
        let map = self.entries.read().map_err(|_| StoreError::Unavailable)?;
        Ok(map.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StoreResult<()> {
        validate_key(key)?;
        let mut map = self.entries.write().map_err(|_| StoreError::Unavailable)?;
        if let Some(quota) = self.quota_bytes {
            let others: usize = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > quota {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        validate_key(key)?;
        let mut map = self.entries.write().map_err(|_| StoreError::Unavailable)?;
        Ok(map.remove(key).is_some())
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(|_| StoreError::Unavailable)?;
        let mut keys: Vec<String> = map.keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

impl std::fmt::Debug for InMemoryKvBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvBackend")
            .field("key_count", &self.len())
            .field("quota_bytes", &self.quota_bytes)
            .finish()
    }
}

/// A backend whose every operation fails, as storage does when the host
/// runs in a restricted or private mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableKvBackend;

impl KvBackend for UnavailableKvBackend {
    fn read(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable)
    }

    fn write(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable)
    }

    fn delete(&self, _key: &str) -> StoreResult<bool> {
        Err(StoreError::Unavailable)
    }

    fn keys(&self) -> StoreResult<Vec<String>> {
        Err(StoreError::Unavailable)
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
