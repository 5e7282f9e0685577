//! Typed ids for people and expenses
//!
//! Both wrap a UUID. They display as a prefixed short form (`per-1a2b3c4d`)
//! and order by the underlying UUID, which is what settlement tie-breaking
//! relies on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Prefix used by the short display form
            pub const PREFIX: &'static str = $prefix;

            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let hex = self.0.simple().to_string();
                f.pad(&format!("{}{}", $prefix, &hex[..8]))
            }
        }

        /// Accepts a full UUID, optionally carrying the display prefix
        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                Uuid::parse_str(s.strip_prefix($prefix).unwrap_or(s)).map(Self)
            }
        }
    };
}

define_id!(
    /// Identifies a household member
    PersonId,
    "per-"
);
define_id!(
    /// Identifies a recorded expense
    ExpenseId,
    "exp-"
);
