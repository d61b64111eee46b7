//! Store-backed shopper preferences.
//!
//! - [`ThemePreference`] -- `rr_theme`, `light` unless stored otherwise
//! - [`Subscribers`] -- `rr_subs_v1`, unique newsletter emails
//!
//! Both share the engine's [`rr_store::KvStore`] and follow its fail-soft
//! rule: unreadable data is replaced by the default, never reported.

pub mod error;
pub mod subscribers;
pub mod theme;

pub use error::{PrefsError, PrefsResult};
pub use subscribers::{validate_email, SubscribeOutcome, Subscribers};
pub use theme::ThemePreference;
