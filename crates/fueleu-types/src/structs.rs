//! Core records for compliance balances, banking and pooling.
//!
//! All balances are in grams of CO2-equivalent and use [`Decimal`] so that
//! the conservation checks in the ledger compare exact values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ComplianceStatus, PoolStatus};
use crate::ids::{BankEntryId, PoolId, ShipId, Year};

// ---------------------------------------------------------------------------
// Compliance snapshot
// ---------------------------------------------------------------------------

/// The raw compliance balance of one ship for one reporting year.
///
/// There is at most one snapshot per (ship, year). A positive `cb` is a
/// surplus, a negative `cb` a deficit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ComplianceSnapshot {
    /// The ship this balance belongs to.
    pub ship_id: ShipId,
    /// The reporting year.
    pub year: Year,
    /// Compliance balance in gCO2e.
    #[ts(as = "String")]
    pub cb: Decimal,
}

// ---------------------------------------------------------------------------
// Bank entry
// ---------------------------------------------------------------------------

/// A banked surplus claim.
///
/// `amount_used` only ever grows and never exceeds `amount_banked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BankEntry {
    /// Unique entry identifier.
    pub id: BankEntryId,
    /// The ship that banked the surplus.
    pub ship_id: ShipId,
    /// The year the surplus was banked from.
    pub year: Year,
    /// Amount banked in gCO2e.
    #[ts(as = "String")]
    pub amount_banked: Decimal,
    /// Amount already applied against later years.
    #[ts(as = "String")]
    pub amount_used: Decimal,
    /// When the entry was created.
    pub created_at: DateTime<Utc>,
}

impl BankEntry {
    /// Create a fresh, unused entry.
    pub fn new(ship_id: ShipId, year: Year, amount_banked: Decimal) -> Self {
        Self {
            id: BankEntryId::new(),
            ship_id,
            year,
            amount_banked,
            amount_used: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Amount still available to apply (`amount_banked - amount_used`).
    pub fn available(&self) -> Decimal {
        self.amount_banked
            .saturating_sub(self.amount_used)
            .max(Decimal::ZERO)
    }
}

// ---------------------------------------------------------------------------
// Pooling
// ---------------------------------------------------------------------------

/// A ship entering a pool with its balance before redistribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PoolCandidate {
    /// The ship joining the pool.
    pub ship_id: ShipId,
    /// Balance before pooling.
    #[ts(as = "String")]
    pub cb_before: Decimal,
}

impl PoolCandidate {
    /// Create a candidate from a ship and its current balance.
    pub fn new(ship_id: impl Into<ShipId>, cb_before: Decimal) -> Self {
        Self {
            ship_id: ship_id.into(),
            cb_before,
        }
    }
}

/// A pool member with its balance before and after redistribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PoolMember {
    /// The pooled ship.
    pub ship_id: ShipId,
    /// Balance before pooling.
    #[ts(as = "String")]
    pub cb_before: Decimal,
    /// Balance after pooling.
    #[ts(as = "String")]
    pub cb_after: Decimal,
}

/// A persisted pool for one reporting year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Pool {
    /// Unique pool identifier.
    pub id: PoolId,
    /// The reporting year the pool covers.
    pub year: Year,
    /// Members in allocation order (descending `cb_before`).
    pub members: Vec<PoolMember>,
    /// When the pool was formed.
    pub created_at: DateTime<Utc>,
}

/// The result of forming a pool, returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PoolFormed {
    /// Identifier assigned by the pool repository.
    pub pool_id: PoolId,
    /// Always [`PoolStatus::Formed`] on success.
    pub status: PoolStatus,
    /// Members with their post-allocation balances.
    pub members: Vec<PoolMember>,
}

// ---------------------------------------------------------------------------
// Adjusted balance
// ---------------------------------------------------------------------------

/// A ship-year balance including available banked surplus.
///
/// Computed on every query; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AdjustedBalance {
    /// The ship queried.
    pub ship_id: ShipId,
    /// The year queried.
    pub year: Year,
    /// Snapshot balance, zero when the ship has no snapshot.
    #[ts(as = "String")]
    pub raw_cb: Decimal,
    /// Sum of available amounts over eligible bank entries.
    #[ts(as = "String")]
    pub banked_available: Decimal,
    /// `raw_cb + banked_available`.
    #[ts(as = "String")]
    pub adjusted_cb: Decimal,
    /// Compliant iff `adjusted_cb >= 0`.
    pub status: ComplianceStatus,
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

/// A route's measured greenhouse-gas intensity for a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Route {
    /// Route code, e.g. `"R001"`.
    pub route_id: String,
    /// The reporting year.
    pub year: Year,
    /// Well-to-wake intensity in gCO2e/MJ.
    #[ts(as = "String")]
    pub ghg_intensity: Decimal,
    /// Whether this route is the comparison baseline.
    pub is_baseline: bool,
}

/// A route's intensity relative to the baseline route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RouteComparison {
    /// Route code.
    pub route_id: String,
    /// Intensity in gCO2e/MJ.
    #[ts(as = "String")]
    pub ghg_intensity: Decimal,
    /// `((route / baseline) - 1) * 100`.
    #[ts(as = "String")]
    pub percent_diff: Decimal,
    /// True when the route is no more intense than the baseline.
    pub is_compliant: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bank_entry_is_fully_available() {
        let entry = BankEntry::new(ShipId::from("S1"), 2025, Decimal::new(50, 0));
        assert_eq!(entry.amount_used, Decimal::ZERO);
        assert_eq!(entry.available(), Decimal::new(50, 0));
    }

    #[test]
    fn available_subtracts_used_amount() {
        let mut entry = BankEntry::new(ShipId::from("S1"), 2025, Decimal::new(50, 0));
        entry.amount_used = Decimal::new(30, 0);
        assert_eq!(entry.available(), Decimal::new(20, 0));
    }

    #[test]
    fn adjusted_balance_serializes_status_string() {
        let balance = AdjustedBalance {
            ship_id: ShipId::from("S1"),
            year: 2026,
            raw_cb: Decimal::new(-10, 0),
            banked_available: Decimal::new(20, 0),
            adjusted_cb: Decimal::new(10, 0),
            status: ComplianceStatus::Compliant,
        };
        let json = serde_json::to_value(&balance).ok();
        let status = json
            .as_ref()
            .and_then(|v| v.get("status"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(status, Some("COMPLIANT"));
    }
}
