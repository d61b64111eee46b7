/// Errors produced by cart ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("cart serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type CartResult<T> = Result<T, CartError>;
