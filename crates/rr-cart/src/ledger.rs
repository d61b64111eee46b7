use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use rr_types::{CartItem, Price};

use crate::error::CartResult;

/// Keyed collection of cart line items.
///
/// Keys are product ids. Iteration is in id order, which is stable across
/// reloads. Totals are computed on every call and never cached.
///
/// Pricing policy: the name and price recorded when an id is first added
/// are kept for the life of the line item. Adding the same id again only
/// bumps the quantity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartLedger {
    items: BTreeMap<String, CartItem>,
}

impl CartLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one unit of a product. Returns the new quantity for `id`.
    pub fn add(&mut self, id: &str, name: &str, price: Price) -> u32 {
        match self.items.get_mut(id) {
            Some(item) => {
                item.qty = item.qty.saturating_add(1);
                item.qty
            }
            None => {
                self.items
                    .insert(id.to_string(), CartItem::new(id, name, price));
                1
            }
        }
    }

    /// Bump the quantity of an existing line. Returns `false` if `id` is not
    /// in the ledger.
    pub fn increment(&mut self, id: &str) -> bool {
        match self.items.get_mut(id) {
            Some(item) => {
                item.qty = item.qty.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Drop one unit of an existing line, removing it when the quantity
    /// reaches zero. Returns `false` if `id` is not in the ledger.
    pub fn decrement(&mut self, id: &str) -> bool {
        let Some(item) = self.items.get_mut(id) else {
            return false;
        };
        item.qty = item.qty.saturating_sub(1);
        if item.qty == 0 {
            self.items.remove(id);
        }
        true
    }

    /// Remove every line. Returns `false` if the ledger was already empty.
    pub fn clear(&mut self) -> bool {
        let had_items = !self.items.is_empty();
        self.items.clear();
        had_items
    }

    /// `sum(price * qty)` over all lines.
    pub fn subtotal(&self) -> f64 {
        self.items.values().map(CartItem::line_total).sum()
    }

    /// `sum(qty)` over all lines.
    pub fn count(&self) -> u64 {
        self.items.values().map(|item| u64::from(item.qty)).sum()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.get(id)
    }

    /// Quantity held for `id`, zero when absent.
    pub fn qty(&self, id: &str) -> u32 {
        self.items.get(id).map_or(0, |item| item.qty)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Line items in id order.
    pub fn items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.values()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Serialize to the persisted `rr_cart_v1` shape.
    pub fn to_json(&self) -> CartResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the persisted `rr_cart_v1` shape.
    ///
    /// Lines stored with a zero quantity are dropped so the ledger invariant
    /// holds for data written by older or foreign clients.
    pub fn from_json(json: &str) -> CartResult<Self> {
        let mut ledger: CartLedger = serde_json::from_str(json)?;
        ledger.items.retain(|id, item| {
            if item.qty == 0 {
                warn!(id = %id, "dropping persisted cart line with zero quantity");
                return false;
            }
            true
        });
        Ok(ledger)
    }
}
