//! Shared record types for the FuelEU compliance workspace.
//!
//! Every crate in the workspace speaks in these types: compliance
//! snapshots, bank entries, pools and the derived adjusted balance. Types
//! flow downstream to `TypeScript` via `ts-rs` for reporting frontends.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier newtypes (ships, bank entries, pools)
//! - [`enums`] -- Status and policy enumerations
//! - [`structs`] -- Snapshot, bank, pool and route records

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BankEligibility, ComplianceStatus, PoolStatus};
pub use ids::{BankEntryId, PoolId, ShipId, Year};
pub use structs::{
    AdjustedBalance, BankEntry, ComplianceSnapshot, Pool, PoolCandidate, PoolFormed, PoolMember,
    Route, RouteComparison,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::ShipId::export_all();
        let _ = crate::ids::BankEntryId::export_all();
        let _ = crate::ids::PoolId::export_all();

        // Enums
        let _ = crate::enums::ComplianceStatus::export_all();
        let _ = crate::enums::PoolStatus::export_all();
        let _ = crate::enums::BankEligibility::export_all();

        // Structs
        let _ = crate::structs::ComplianceSnapshot::export_all();
        let _ = crate::structs::BankEntry::export_all();
        let _ = crate::structs::PoolCandidate::export_all();
        let _ = crate::structs::PoolMember::export_all();
        let _ = crate::structs::Pool::export_all();
        let _ = crate::structs::PoolFormed::export_all();
        let _ = crate::structs::AdjustedBalance::export_all();
        let _ = crate::structs::Route::export_all();
        let _ = crate::structs::RouteComparison::export_all();
    }
}
