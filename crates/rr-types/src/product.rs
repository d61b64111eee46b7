use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A non-negative, finite monetary amount in store currency units.
///
/// Validation happens on construction and on deserialization, so a `Price`
/// held anywhere in the engine is always usable in arithmetic.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price(f64);

impl Price {
    pub const ZERO: Price = Price(0.0);

    /// Create a price, rejecting negative and non-finite amounts.
    pub fn new(amount: f64) -> Result<Self, TypeError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(TypeError::InvalidPrice(amount.to_string()));
        }
        // Normalise -0.0 so equality and display behave.
        Ok(Self(amount + 0.0))
    }

    pub const fn amount(self) -> f64 {
        self.0
    }

    /// Total order over prices. Always consistent because NaN is unrepresentable.
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl TryFrom<f64> for Price {
    type Error = TypeError;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_money(self.0))
    }
}

/// Render an amount the way the storefront shows totals: `$32.00`.
pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

/// An immutable catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Price,
    #[serde(alias = "desc")]
    pub description: String,
    #[serde(alias = "img", alias = "imageRef", default)]
    pub image_ref: String,
}

impl Product {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Price,
        description: impl Into<String>,
        image_ref: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            description: description.into(),
            image_ref: image_ref.into(),
        }
    }
}

/// A line item in the cart ledger.
///
/// `qty` is always at least 1 while the item is held by a ledger; the ledger
/// removes an item rather than store a zero quantity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    pub qty: u32,
}

impl CartItem {
    /// A fresh line item with quantity 1.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            qty: 1,
        }
    }

    /// `price * qty` for this line.
    pub fn line_total(&self) -> f64 {
        self.price.amount() * f64::from(self.qty)
    }
}
