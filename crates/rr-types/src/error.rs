use thiserror::Error;

/// Errors produced when constructing or parsing foundation types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("unknown roast level: {0:?}")]
    UnknownRoastLevel(String),

    #[error("unknown sort mode: {0:?}")]
    UnknownSortMode(String),

    #[error("unknown theme: {0:?}")]
    UnknownTheme(String),
}
