use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use rr_store::{FileKvBackend, KvStore, UnavailableKvBackend};
use rr_types::{Product, RoastLevel, SortMode};

use crate::error::{AppError, AppResult};

/// Storefront configuration, usually read from `rr.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorefrontConfig {
    /// Directory for persisted keys. `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    /// JSON product list. `None` uses the built-in demo catalog.
    pub catalog_path: Option<PathBuf>,
    /// Roast level selected when the timer is created.
    pub default_roast: RoastLevel,
    /// Catalog ordering before the shopper picks one.
    pub default_sort: SortMode,
    /// Real time between countdown ticks. Each tick is one brew second.
    pub tick_interval_ms: u64,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            catalog_path: None,
            default_roast: RoastLevel::Medium,
            default_sort: SortMode::Featured,
            tick_interval_ms: 1000,
        }
    }
}

impl StorefrontConfig {
    pub fn from_toml_str(s: &str) -> AppResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AppError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Tick spacing; never shorter than one millisecond.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Open the configured store.
    ///
    /// A data directory that cannot be opened yields an adapter over an
    /// unavailable backend: reads come back empty and the first write moves
    /// the session to memory-only mode.
    pub fn open_store(&self) -> Arc<KvStore> {
        let store = match &self.data_dir {
            None => KvStore::in_memory(),
            Some(dir) => match FileKvBackend::open(dir) {
                Ok(backend) => {
                    info!(data_dir = %dir.display(), "using file store");
                    KvStore::new(backend)
                }
                Err(e) => {
                    warn!(
                        data_dir = %dir.display(),
                        error = %e,
                        "data directory unusable; storage unavailable"
                    );
                    KvStore::new(UnavailableKvBackend)
                }
            },
        };
        Arc::new(store)
    }

    /// Load the configured catalog.
    pub fn load_catalog(&self) -> AppResult<Vec<Product>> {
        match &self.catalog_path {
            None => Ok(rr_catalog::demo_catalog()),
            Some(path) => Ok(rr_catalog::load_catalog(path)?),
        }
    }
}
