use std::sync::Arc;

use tracing::{debug, warn};

use rr_store::KvStore;
use rr_types::keys;

use crate::error::{PrefsError, PrefsResult};

/// Outcome of a valid subscribe request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed(String),
    AlreadySubscribed(String),
}

/// Trim `raw` and check it looks like an email (non-empty, contains `@`).
pub fn validate_email(raw: &str) -> PrefsResult<String> {
    let email = raw.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(PrefsError::InvalidEmail(email.to_string()));
    }
    Ok(email.to_string())
}

/// Newsletter subscriber list, in signup order, without duplicates.
#[derive(Debug, Clone)]
pub struct Subscribers {
    store: Arc<KvStore>,
}

impl Subscribers {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Stored emails. Unreadable data yields an empty list.
    pub fn list(&self) -> Vec<String> {
        let Some(raw) = self.store.get(keys::SUBSCRIBERS) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(mut emails) => {
                let mut seen = std::collections::HashSet::new();
                emails.retain(|e| seen.insert(e.clone()));
                emails
            }
            Err(e) => {
                warn!(
                    key = keys::SUBSCRIBERS,
                    error = %e,
                    "subscriber list unreadable; starting empty"
                );
                Vec::new()
            }
        }
    }

    /// Validate and record `raw`. Invalid input changes nothing.
    pub fn subscribe(&self, raw: &str) -> PrefsResult<SubscribeOutcome> {
        let email = validate_email(raw)?;
        let mut emails = self.list();
        if emails.contains(&email) {
            return Ok(SubscribeOutcome::AlreadySubscribed(email));
        }
        emails.push(email.clone());
        match serde_json::to_string(&emails) {
            Ok(json) => self.store.set(keys::SUBSCRIBERS, &json),
            Err(e) => warn!(error = %e, "subscriber list serialization failed"),
        }
        debug!(count = emails.len(), "subscriber added");
        Ok(SubscribeOutcome::Subscribed(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subs() -> (Arc<KvStore>, Subscribers) {
        let store = Arc::new(KvStore::in_memory());
        (Arc::clone(&store), Subscribers::new(store))
    }

    #[test]
    fn subscribe_trims_and_persists() {
        let (store, subs) = subs();
        assert_eq!(
            subs.subscribe("  ada@example.com ").unwrap(),
            SubscribeOutcome::Subscribed("ada@example.com".into())
        );
        assert_eq!(
            store.get(keys::SUBSCRIBERS).as_deref(),
            Some(r#"["ada@example.com"]"#)
        );
    }

    #[test]
    fn duplicates_are_not_stored_twice() {
        let (_, subs) = subs();
        subs.subscribe("ada@example.com").unwrap();
        assert_eq!(
            subs.subscribe("ada@example.com").unwrap(),
            SubscribeOutcome::AlreadySubscribed("ada@example.com".into())
        );
        assert_eq!(subs.list(), vec!["ada@example.com"]);
    }

    #[test]
    fn invalid_email_changes_nothing() {
        let (store, subs) = subs();
        assert_eq!(
            subs.subscribe("not-an-email"),
            Err(PrefsError::InvalidEmail("not-an-email".into()))
        );
        assert!(subs.subscribe("   ").is_err());
        assert_eq!(store.get(keys::SUBSCRIBERS), None);
    }

    #[test]
    fn corrupt_list_reads_empty_and_recovers() {
        let (store, subs) = subs();
        store.set(keys::SUBSCRIBERS, "{oops");
        assert!(subs.list().is_empty());
        subs.subscribe("bo@example.com").unwrap();
        assert_eq!(subs.list(), vec!["bo@example.com"]);
    }

    #[test]
    fn order_is_signup_order() {
        let (_, subs) = subs();
        subs.subscribe("b@example.com").unwrap();
        subs.subscribe("a@example.com").unwrap();
        assert_eq!(subs.list(), vec!["b@example.com", "a@example.com"]);
    }
}
