use std::sync::Arc;

use tracing::{debug, warn};

use rr_store::KvStore;
use rr_types::{keys, Price};

use crate::ledger::CartLedger;

/// Read the persisted ledger.
///
/// Missing or unparseable data yields an empty ledger; this never fails.
pub fn load(store: &KvStore) -> CartLedger {
    let Some(raw) = store.get(keys::CART) else {
        return CartLedger::new();
    };
    match CartLedger::from_json(&raw) {
        Ok(ledger) => ledger,
        Err(e) => {
            warn!(key = keys::CART, error = %e, "persisted cart is unreadable; starting empty");
            CartLedger::new()
        }
    }
}

/// Write the ledger through the store: one store operation per call.
///
/// An empty ledger removes the key, which loads back as an empty ledger.
pub fn persist(store: &KvStore, ledger: &CartLedger) {
    if ledger.is_empty() {
        store.remove(keys::CART);
        return;
    }
    match ledger.to_json() {
        Ok(json) => store.set(keys::CART, &json),
        Err(e) => warn!(error = %e, "cart serialization failed; not persisted"),
    }
}

/// Write-through cart service.
///
/// Every mutating call that changes the ledger persists it immediately,
/// before returning. Calls that change nothing (incrementing an id that is
/// not in the cart, clearing an empty cart) do not touch the store.
#[derive(Debug)]
pub struct Cart {
    store: Arc<KvStore>,
    ledger: CartLedger,
}

impl Cart {
    /// Load the persisted ledger from `store`.
    pub fn load(store: Arc<KvStore>) -> Self {
        let ledger = load(&store);
        debug!(lines = ledger.len(), count = ledger.count(), "cart loaded");
        Self { store, ledger }
    }

    /// Discard in-memory state and re-read the store.
    pub fn reload(&mut self) -> &CartLedger {
        self.ledger = load(&self.store);
        &self.ledger
    }

    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    pub fn add(&mut self, id: &str, name: &str, price: Price) -> &CartLedger {
        let qty = self.ledger.add(id, name, price);
        debug!(id, qty, "cart add");
        self.persist()
    }

    pub fn increment(&mut self, id: &str) -> &CartLedger {
        if self.ledger.increment(id) {
            debug!(id, qty = self.ledger.qty(id), "cart increment");
            self.persist();
        }
        &self.ledger
    }

    pub fn decrement(&mut self, id: &str) -> &CartLedger {
        if self.ledger.decrement(id) {
            debug!(id, qty = self.ledger.qty(id), "cart decrement");
            self.persist();
        }
        &self.ledger
    }

    pub fn clear(&mut self) -> &CartLedger {
        if self.ledger.clear() {
            debug!("cart cleared");
            self.persist();
        }
        &self.ledger
    }

    pub fn subtotal(&self) -> f64 {
        self.ledger.subtotal()
    }

    pub fn count(&self) -> u64 {
        self.ledger.count()
    }

    fn persist(&self) -> &CartLedger {
        persist(&self.store, &self.ledger);
        &self.ledger
    }
}
