use std::path::PathBuf;

use thiserror::Error;

/// Errors from building a storefront. Nothing after construction fails:
/// actions report problems through [`crate::Update::Rejected`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ParseConfig(#[from] toml::de::Error),

    #[error("catalog error: {0}")]
    Catalog(#[from] rr_catalog::CatalogError),
}

pub type AppResult<T> = Result<T, AppError>;
