use std::sync::Arc;

use tracing::debug;

use rr_store::KvStore;
use rr_types::{keys, Theme};

/// Persisted colour scheme.
#[derive(Debug, Clone)]
pub struct ThemePreference {
    store: Arc<KvStore>,
}

impl ThemePreference {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Stored theme; `light` when nothing valid is stored.
    pub fn current(&self) -> Theme {
        self.store
            .get(keys::THEME)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn set(&self, theme: Theme) -> Theme {
        self.store.set(keys::THEME, theme.as_str());
        debug!(%theme, "theme set");
        theme
    }

    /// Switch to the other theme and persist it.
    pub fn toggle(&self) -> Theme {
        self.set(self.current().toggled())
    }
}
