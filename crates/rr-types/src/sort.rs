use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Catalog ordering selected by the shopper.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Catalog order, unchanged.
    #[default]
    Featured,
    /// Cheapest first; equal prices keep catalog order.
    PriceAsc,
    /// Most expensive first; equal prices keep catalog order.
    PriceDesc,
    /// Newest first, i.e. catalog order reversed.
    New,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [
        SortMode::Featured,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
        SortMode::New,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::New => "new",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| TypeError::UnknownSortMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
            let json = serde_json::to_string(&mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.as_str()));
        }
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert_eq!(
            "cheapest".parse::<SortMode>(),
            Err(TypeError::UnknownSortMode("cheapest".into()))
        );
    }

    #[test]
    fn default_is_featured() {
        assert_eq!(SortMode::default(), SortMode::Featured);
    }
}
