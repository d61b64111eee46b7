use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading a catalog definition.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate product id: {0}")]
    DuplicateId(String),

    #[error("product id must not be empty")]
    EmptyId,
}

pub type CatalogResult<T> = Result<T, CatalogError>;
