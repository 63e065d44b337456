//! Manual include/exclude switch carried by every line item

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether the user has switched an item into the plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IncludeToggle {
    #[default]
    On,
    Off,
}

impl IncludeToggle {
    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    pub fn from_bool(on: bool) -> Self {
        if on {
            Self::On
        } else {
            Self::Off
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for IncludeToggle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for IncludeToggle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "on" | "true" | "yes" | "1" => Ok(Self::On),
            "off" | "false" | "no" | "0" => Ok(Self::Off),
            other => Err(format!("Invalid toggle '{}': expected on or off", other)),
        }
    }
}
