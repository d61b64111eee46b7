//! Persisted key schema.
//!
//! Keys are versioned where the value shape may change. Values are always
//! JSON text except for [`THEME`], which is a bare `light`/`dark` string.

/// Cart ledger: JSON object mapping product id to `{id, name, price, qty}`.
pub const CART: &str = "rr_cart_v1";

/// Newsletter subscribers: JSON array of unique email strings.
pub const SUBSCRIBERS: &str = "rr_subs_v1";

/// Colour scheme preference: `"light"` or `"dark"`.
pub const THEME: &str = "rr_theme";

/// All keys owned by the storefront, in a stable order.
pub const ALL: [&str; 3] = [CART, SUBSCRIBERS, THEME];
