//! Storefront host for the Roast & Ritual engine.
//!
//! Ties the engine components together behind one explicit object:
//!
//! - [`StorefrontConfig`] -- TOML configuration with defaults
//! - [`Storefront`] -- owns the store handle, cart, catalog, timer and
//!   preferences; constructed once and passed by reference
//! - [`Action`] / [`ActionKind`] -- everything a shopper (or the timer) can
//!   ask for, resolved through a dispatch table built at construction
//! - [`Update`] -- what the view re-renders after an action
//! - [`run`] -- the single-threaded event loop feeding actions from one
//!   channel into the storefront and updates into a [`View`]

pub mod action;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod runtime;
pub mod storefront;

pub use action::{Action, ActionKind, CartView, Update};
pub use config::StorefrontConfig;
pub use dispatch::{DispatchTable, Handler};
pub use error::{AppError, AppResult};
pub use runtime::{run, RunSummary, View};
pub use storefront::{LiveStorefront, Storefront};

pub use rr_store::StoreMode;
pub use rr_timer::{TimerPhase, TimerSnapshot};
pub use rr_types::{Product, RoastLevel, SortMode, Theme};
