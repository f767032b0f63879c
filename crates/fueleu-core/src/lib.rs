//! Banking, pooling and compliance recording for FuelEU ship balances.
//!
//! This crate wires the pure rules in `fueleu-ledger` to the storage
//! contracts in `fueleu-store`.
//!
//! # Modules
//!
//! - [`banking`] -- [`BankingService`]: bank surplus, adjusted balances,
//!   apply banked surplus to a later year.
//! - [`pooling`] -- [`PoolService`]: form and persist pools.
//! - [`compliance`] -- Compute and record yearly compliance snapshots.
//! - [`config`] -- Configuration loading from `fueleu-config.yaml` into
//!   strongly-typed structs.
//! - [`telemetry`] -- `tracing` subscriber initialisation.
//! - [`error`] -- [`ComplianceError`].
//!
//! [`BankingService`]: banking::BankingService
//! [`PoolService`]: pooling::PoolService
//! [`ComplianceError`]: error::ComplianceError

pub mod banking;
pub mod compliance;
pub mod config;
pub mod error;
pub mod pooling;
pub mod telemetry;

pub use banking::BankingService;
pub use compliance::{compute_snapshot, record_compliance, route_comparison};
pub use config::{BankingConfig, ComplianceConfig, ConfigError, LoggingConfig, PolicyConfig};
pub use error::ComplianceError;
pub use pooling::PoolService;
pub use telemetry::TelemetryError;
