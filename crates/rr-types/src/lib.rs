//! Foundation types for the Roast & Ritual storefront engine.
//!
//! Every other `rr-*` crate depends on `rr-types`. The types here are plain
//! values: they carry no storage handles and no scheduling state.
//!
//! # Key Types
//!
//! - [`Price`] -- non-negative, finite decimal amount
//! - [`Product`] -- immutable catalog entry
//! - [`CartItem`] -- a line item in the cart ledger
//! - [`RoastLevel`] -- brew profile selecting a fixed countdown duration
//! - [`SortMode`] -- catalog ordering
//! - [`Theme`] -- persisted colour scheme preference
//! - [`keys`] -- persisted key schema

pub mod error;
pub mod keys;
pub mod product;
pub mod roast;
pub mod sort;
pub mod theme;

pub use error::TypeError;
pub use product::{CartItem, Price, Product};
pub use roast::RoastLevel;
pub use sort::SortMode;
pub use theme::Theme;
