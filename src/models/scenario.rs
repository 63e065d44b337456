//! Scenario tags and the scenario filter rule
//!
//! Every line item is tagged either `ALL` (baseline, present in every
//! what-if variant) or with a named scenario such as `A`. The same type is
//! used as the selector when browsing or computing totals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scenario tag on an item, or scenario selector for a query
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Scenario {
    /// Baseline tag / browse-everything selector
    #[default]
    All,
    /// A named what-if variant (`^[A-Z0-9]+$`)
    Named(String),
}

/// Maximum length of a named scenario identifier
pub const MAX_SCENARIO_LEN: usize = 16;

impl Scenario {
    pub const ALL_TAG: &'static str = "ALL";

    /// Parse a scenario identifier, normalising to upper case
    pub fn parse(s: &str) -> Result<Self, ScenarioParseError> {
        let s = s.trim().to_uppercase();
        if s.is_empty() {
            return Err(ScenarioParseError::Empty);
        }
        if s == Self::ALL_TAG {
            return Ok(Self::All);
        }
        if s.len() > MAX_SCENARIO_LEN {
            return Err(ScenarioParseError::TooLong(s.len()));
        }
        if !s.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(ScenarioParseError::InvalidCharacters(s));
        }
        Ok(Self::Named(s))
    }

    /// Create a named scenario, validating the identifier
    pub fn named(s: &str) -> Result<Self, ScenarioParseError> {
        match Self::parse(s)? {
            Self::All => Err(ScenarioParseError::Reserved),
            named => Ok(named),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => Self::ALL_TAG,
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Scenario {
    type Err = ScenarioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Scenario {
    type Error = ScenarioParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Scenario> for String {
    fn from(value: Scenario) -> Self {
        value.as_str().to_string()
    }
}

/// Which scenario tags a read admits
///
/// Selector `ALL` admits every item (table/browse view). A named selector
/// admits items tagged with it plus the universal `ALL`-tagged baseline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScenarioFilter {
    selector: Scenario,
}

impl ScenarioFilter {
    pub fn new(selector: Scenario) -> Self {
        Self { selector }
    }

    /// A filter admitting every item regardless of tag
    pub fn everything() -> Self {
        Self::new(Scenario::All)
    }

    pub fn selector(&self) -> &Scenario {
        &self.selector
    }

    /// Whether an item carrying `tag` is visible under this filter
    pub fn admits(&self, tag: &Scenario) -> bool {
        match &self.selector {
            Scenario::All => true,
            named => tag.is_all() || tag == named,
        }
    }
}

impl From<Scenario> for ScenarioFilter {
    fn from(selector: Scenario) -> Self {
        Self::new(selector)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioParseError {
    Empty,
    TooLong(usize),
    InvalidCharacters(String),
    Reserved,
}

impl fmt::Display for ScenarioParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Scenario identifier cannot be empty"),
            Self::TooLong(len) => write!(
                f,
                "Scenario identifier too long ({} chars, max {})",
                len, MAX_SCENARIO_LEN
            ),
            Self::InvalidCharacters(s) => write!(
                f,
                "Scenario identifier '{}' may only contain letters A-Z and digits",
                s
            ),
            Self::Reserved => write!(f, "'ALL' is reserved and cannot name a scenario"),
        }
    }
}

impl std::error::Error for ScenarioParseError {}
