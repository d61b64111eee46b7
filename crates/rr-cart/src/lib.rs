//! Shopping cart ledger for the Roast & Ritual storefront engine.
//!
//! - [`CartLedger`] is the pure keyed collection of line items with quantity
//!   arithmetic and derived totals.
//! - [`Cart`] owns a ledger and a shared [`rr_store::KvStore`] handle and
//!   persists after every mutation (write-through, no batching).
//! - [`load`] / [`persist`] are the raw persistence operations both build on.
//!
//! Invariant: no line item with a zero quantity ever exists in a ledger.

pub mod cart;
pub mod error;
pub mod ledger;

pub use cart::{load, persist, Cart};
pub use error::{CartError, CartResult};
pub use ledger::CartLedger;
pub use rr_types::product::format_money;
