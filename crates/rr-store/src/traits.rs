use crate::error::{StoreError, StoreResult};

/// Host persistent storage over named string keys.
///
/// Implementations report every failure; the fail-soft policy lives in
/// [`crate::KvStore`], not in the backends.
pub trait KvBackend: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or replace the value under `key`.
    fn write(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`. Returns `true` if it existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// All stored keys, sorted.
    fn keys(&self) -> StoreResult<Vec<String>>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str;
}

/// Validate a storage key.
///
/// Keys must be non-empty, at most 128 bytes, use only ASCII letters,
/// digits, `_`, `-` and `.`, and must not start with `.`. This keeps keys
/// usable as file names on every backend.
///
/// # Examples
///
/// ```
/// use rr_store::validate_key;
///
/// assert!(validate_key("rr_cart_v1").is_ok());
/// assert!(validate_key("").is_err());
/// assert!(validate_key("../etc/passwd").is_err());
/// ```
pub fn validate_key(key: &str) -> StoreResult<()> {
    let reason = if key.is_empty() {
        Some("key must not be empty")
    } else if key.len() > 128 {
        Some("key must be at most 128 bytes")
    } else if key.starts_with('.') {
        Some("key must not start with '.'")
    } else if !key
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.'))
    {
        Some("key may only contain ASCII letters, digits, '_', '-' and '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: reason.into(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storefront_keys_are_valid() {
        for key in rr_types::keys::ALL {
            assert!(validate_key(key).is_ok(), "{key} should be valid");
        }
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
        assert!(validate_key(&"k".repeat(129)).is_err());
    }
}
