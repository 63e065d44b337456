//! Strongly-typed ID wrappers for all entity types
//!
//! Every planner entity is keyed by a UUID. Newtype wrappers keep an
//! `AssetId` from ever being passed where a `LiabilityId` is expected.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;
use uuid::Uuid;

/// Behaviour shared by every entity ID
pub trait EntityId:
    Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Serialize + DeserializeOwned + Send + Sync
{
    /// Whether `s` names this ID, either as the full UUID or the short form
    fn matches(&self, s: &str) -> bool;
}

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Create an ID from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parse an ID from a full UUID string
            pub fn parse(s: &str) -> Result<Self, uuid::Error> {
                Ok(Self(Uuid::parse_str(s)?))
            }

            /// Short display form, e.g. `ast-1a2b3c4d`
            pub fn short(&self) -> String {
                format!("{}{}", $display_prefix, &self.0.simple().to_string()[..8])
            }
        }

        impl EntityId for $name {
            fn matches(&self, s: &str) -> bool {
                let s = s.trim();
                if let Ok(uuid) = Uuid::parse_str(s) {
                    return uuid == self.0;
                }
                let bare = s.strip_prefix($display_prefix).unwrap_or(s);
                bare.len() >= 8 && self.0.simple().to_string().starts_with(&bare.to_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.short())
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(PlannerId, "pln-");
define_id!(AssetId, "ast-");
define_id!(LiabilityId, "lia-");
define_id!(IncomeId, "inc-");
define_id!(ExpenseId, "exp-");
define_id!(BillId, "bil-");
define_id!(CategoryId, "cat-");
