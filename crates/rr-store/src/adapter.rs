use std::collections::{BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use tracing::{debug, warn};

use crate::error::StoreError;
use crate::memory::InMemoryKvBackend;
use crate::traits::{validate_key, KvBackend};

/// Whether writes are reaching the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreMode {
    /// Writes go through to the backend.
    Persistent,
    /// The backend failed a write; writes now live only in this session.
    MemoryOnly,
}

/// Fail-soft adapter over a [`KvBackend`].
///
/// `get` returns `None` for both missing keys and backend failures.
/// `set` and `remove` never report failure. The first failed write or
/// delete switches the adapter into [`StoreMode::MemoryOnly`]: from then on
/// every mutation is recorded in an in-memory overlay (removals as
/// tombstones) and reads consult the overlay before the backend. The backend
/// is not retried for writes once the switch happened.
pub struct KvStore {
    backend: Box<dyn KvBackend>,
    /// `Some` once the adapter has fallen back to memory-only mode.
    overlay: RwLock<Option<HashMap<String, Option<String>>>>,
}

impl KvStore {
    /// Wrap a backend.
    pub fn new(backend: impl KvBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn KvBackend>) -> Self {
        Self {
            backend,
            overlay: RwLock::new(None),
        }
    }

    /// An adapter over a fresh [`InMemoryKvBackend`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryKvBackend::new())
    }

    /// Current persistence mode.
    pub fn mode(&self) -> StoreMode {
        let overlay = self.overlay.read().unwrap_or_else(PoisonError::into_inner);
        if overlay.is_some() {
            StoreMode::MemoryOnly
        } else {
            StoreMode::Persistent
        }
    }

    /// Returns `true` once writes no longer reach the backend.
    pub fn is_memory_only(&self) -> bool {
        self.mode() == StoreMode::MemoryOnly
    }

    /// Name of the wrapped backend.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Read `key`. Missing keys and backend failures both yield `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        {
            let overlay = self.overlay.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(value) = overlay.as_ref().and_then(|o| o.get(key)) {
                return value.clone();
            }
        }
        match self.backend.read(key) {
            Ok(value) => value,
            Err(e) => {
                debug!(
                    key,
                    backend = self.backend.name(),
                    error = %e,
                    "store read failed; treating as absent"
                );
                None
            }
        }
    }

    /// Store `value` under `key`. Never fails from the caller's point of view.
    pub fn set(&self, key: &str, value: &str) {
        self.mutate(key, Some(value))
    }

    /// Remove `key`. Never fails from the caller's point of view.
    pub fn remove(&self, key: &str) {
        self.mutate(key, None)
    }

    /// Every key currently holding a value, sorted.
    ///
    /// In memory-only mode overlay writes are included and tombstoned keys
    /// are left out. A backend that cannot list its keys contributes none.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: BTreeSet<String> = match self.backend.keys() {
            Ok(keys) => keys.into_iter().collect(),
            Err(e) => {
                debug!(backend = self.backend.name(), error = %e, "store key listing failed");
                BTreeSet::new()
            }
        };
        let overlay = self.overlay.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = overlay.as_ref() {
            for (key, value) in entries {
                if value.is_some() {
                    keys.insert(key.clone());
                } else {
                    keys.remove(key);
                }
            }
        }
        keys.into_iter().collect()
    }

    fn mutate(&self, key: &str, value: Option<&str>) {
        if let Err(e) = validate_key(key) {
            warn!(key, error = %e, "store rejected key; mutation dropped");
            return;
        }

        let mut overlay = self.overlay.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entries) = overlay.as_mut() {
            entries.insert(key.to_string(), value.map(str::to_string));
            return;
        }

        let result = match value {
            Some(v) => self.backend.write(key, v),
            None => self.backend.delete(key).map(|_| ()),
        };

        match result {
            Ok(()) => {}
            Err(e @ StoreError::InvalidKey { .. }) => {
                warn!(key, error = %e, "store rejected key; mutation dropped");
            }
            Err(e) => {
                warn!(
                    key,
                    backend = self.backend.name(),
                    error = %e,
                    "store write failed; falling back to memory-only mode"
                );
                let mut entries = HashMap::new();
                entries.insert(key.to_string(), value.map(str::to_string));
                *overlay = Some(entries);
            }
        }
    }
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore")
            .field("backend", &self.backend.name())
            .field("mode", &self.mode())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::error::StoreResult;
    use crate::memory::UnavailableKvBackend;

    /// Backend that reads fine but fails every write after `ok_writes`.
    struct FlakyBackend {
        inner: InMemoryKvBackend,
        ok_writes: usize,
        writes: Arc<AtomicUsize>,
    }

    impl KvBackend for FlakyBackend {
        fn read(&self, key: &str) -> StoreResult<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> StoreResult<()> {
            let n = self.writes.fetch_add(1, Ordering::SeqCst);
            if n >= self.ok_writes {
                return Err(StoreError::QuotaExceeded { key: key.into() });
            }
            self.inner.write(key, value)
        }

        fn delete(&self, key: &str) -> StoreResult<bool> {
            self.inner.delete(key)
        }

        fn keys(&self) -> StoreResult<Vec<String>> {
            self.inner.keys()
        }

        fn name(&self) -> &'static str {
            "flaky"
        }
    }

    #[test]
    fn persistent_round_trip() {
        let store = KvStore::in_memory();
        assert_eq!(store.get("rr_theme"), None);
        store.set("rr_theme", "dark");
        assert_eq!(store.get("rr_theme").as_deref(), Some("dark"));
        store.remove("rr_theme");
        assert_eq!(store.get("rr_theme"), None);
        assert_eq!(store.mode(), StoreMode::Persistent);
    }

    #[test]
    fn unavailable_backend_reads_absent() {
        let store = KvStore::new(UnavailableKvBackend);
        assert_eq!(store.get("rr_cart_v1"), None);
        assert_eq!(store.mode(), StoreMode::Persistent);
    }

    #[test]
    fn failed_write_switches_to_memory_only() {
        let store = KvStore::new(UnavailableKvBackend);
        store.set("rr_theme", "dark");
        assert!(store.is_memory_only());
        assert_eq!(store.get("rr_theme").as_deref(), Some("dark"));
    }

    #[test]
    fn memory_only_removal_shadows_backend_value() {
        let writes = Arc::new(AtomicUsize::new(0));
        let store = KvStore::new(FlakyBackend {
            inner: InMemoryKvBackend::new(),
            ok_writes: 1,
            writes: Arc::clone(&writes),
        });
        store.set("rr_theme", "dark");
        assert!(!store.is_memory_only());

        store.set("rr_subs_v1", "[]");
        assert!(store.is_memory_only());

        store.remove("rr_theme");
        assert_eq!(store.get("rr_theme"), None);
        assert_eq!(store.get("rr_subs_v1").as_deref(), Some("[]"));
    }

    #[test]
    fn memory_only_does_not_retry_backend() {
        let writes = Arc::new(AtomicUsize::new(0));
        let store = KvStore::new(FlakyBackend {
            inner: InMemoryKvBackend::new(),
            ok_writes: 0,
            writes: Arc::clone(&writes),
        });
        store.set("a", "1");
        store.set("b", "2");
        store.set("c", "3");
        assert_eq!(writes.load(Ordering::SeqCst), 1);
        assert_eq!(store.get("c").as_deref(), Some("3"));
    }

    #[test]
    fn invalid_key_does_not_change_mode() {
        let store = KvStore::in_memory();
        store.set("not a key", "x");
        assert_eq!(store.mode(), StoreMode::Persistent);
        assert_eq!(store.get("not a key"), None);
    }

    #[test]
    fn invalid_key_is_dropped_in_memory_only_mode() {
        let store = KvStore::new(UnavailableKvBackend);
        store.set("rr_theme", "dark");
        assert!(store.is_memory_only());

        store.set("not a key", "x");
        assert_eq!(store.get("not a key"), None);
        assert_eq!(store.keys(), vec!["rr_theme".to_string()]);
    }

    #[test]
    fn keys_merge_backend_and_overlay() {
        let writes = Arc::new(AtomicUsize::new(0));
        let store = KvStore::new(FlakyBackend {
            inner: InMemoryKvBackend::new(),
            ok_writes: 2,
            writes: Arc::clone(&writes),
        });
        store.set("rr_theme", "dark");
        store.set("rr_cart_v1", "{}");
        assert_eq!(store.keys(), ["rr_cart_v1", "rr_theme"]);

        store.set("rr_subs_v1", "[]");
        assert!(store.is_memory_only());
        store.remove("rr_theme");
        assert_eq!(store.keys(), ["rr_cart_v1", "rr_subs_v1"]);
    }

    #[test]
    fn unavailable_backend_lists_no_keys() {
        assert!(KvStore::new(UnavailableKvBackend).keys().is_empty());
    }

    #[test]
    fn debug_shows_mode() {
        let store = KvStore::in_memory();
        let debug = format!("{store:?}");
        assert!(debug.contains("Persistent"));
        assert!(debug.contains("memory"));
    }
}
