//! Strongly-typed ID wrappers
//!
//! Tiers and accounts are identified by name; only records that live outside
//! the plan (history entries, recurring rules) carry generated IDs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Whether user input refers to this ID
            ///
            /// Accepts the full UUID, the short display form, or any
            /// unambiguous-looking UUID prefix of at least 4 characters.
            pub fn matches(&self, input: &str) -> bool {
                let input = input.trim();
                let input = input.strip_prefix($display_prefix).unwrap_or(input);
                input.len() >= 4 && self.0.to_string().starts_with(&input.to_ascii_lowercase())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }
    };
}

define_id!(RecurringId, "rec-");
define_id!(HistoryId, "hist-");
