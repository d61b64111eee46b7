use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Roast profile selected for the brew timer.
///
/// Each level maps to a fixed brew duration; see [`RoastLevel::brew_secs`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoastLevel {
    Light,
    #[default]
    Medium,
    Dark,
}

impl RoastLevel {
    /// All roast levels, lightest first.
    pub const ALL: [RoastLevel; 3] = [RoastLevel::Light, RoastLevel::Medium, RoastLevel::Dark];

    /// Brew duration in seconds for this level.
    pub const fn brew_secs(self) -> u32 {
        match self {
            Self::Light => 150,
            Self::Medium => 210,
            Self::Dark => 240,
        }
    }

    /// Wire name (`light`, `medium`, `dark`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for RoastLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoastLevel {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "dark" => Ok(Self::Dark),
            other => Err(TypeError::UnknownRoastLevel(other.to_string())),
        }
    }
}
