//! Type-safe identifiers.
//!
//! Ledger-generated records (bank entries, pools) use UUID v7 wrappers so
//! they sort by creation time. Ships are identified by their registry
//! string (IMO number or fleet code) and get a string newtype instead.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a banked-surplus entry.
    BankEntryId
}

define_id! {
    /// Unique identifier for a formed pool.
    PoolId
}

/// Identifier of a ship as used by the compliance registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(transparent)]
pub struct ShipId(pub String);

impl ShipId {
    /// Create a ship identifier from anything string-like.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ShipId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ShipId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for ShipId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A reporting year under the compliance scheme.
pub type Year = i32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let entry = BankEntryId::new();
        let pool = PoolId::new();
        assert_ne!(entry.into_inner(), Uuid::nil());
        assert_ne!(pool.into_inner(), Uuid::nil());
    }

    #[test]
    fn ship_id_display_matches_registry_string() {
        let ship = ShipId::from("R001");
        assert_eq!(ship.to_string(), "R001");
        assert_eq!(ship.as_str(), "R001");
    }

    #[test]
    fn ship_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&ShipId::new("IMO9321483"));
        assert_eq!(json.ok().as_deref(), Some("\"IMO9321483\""));
    }
}
