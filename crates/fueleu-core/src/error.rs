//! Error type for the compliance services.
//!
//! [`ComplianceError`] is what callers of the banking and pooling services
//! see. Every variant carries the ship, year and amounts needed to
//! diagnose the rejection. Nothing is retried.

use rust_decimal::Decimal;

use fueleu_ledger::{AllocationError, BankingRuleError, CalculationError};
use fueleu_store::StoreError;
use fueleu_types::{ShipId, Year};

/// Errors returned by the compliance services.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComplianceError {
    /// No baseline route is configured for the comparison year.
    #[error("no baseline route configured for year {year}")]
    MissingBaseline {
        /// The year being compared.
        year: Year,
    },

    /// A bank request exceeds the ship's current surplus.
    #[error(
        "ship {ship_id} cannot bank {requested} from {year}: only {available} surplus available"
    )]
    InsufficientSurplus {
        /// The ship that tried to bank.
        ship_id: ShipId,
        /// The year banked from.
        year: Year,
        /// Amount requested.
        requested: Decimal,
        /// Bankable surplus (zero when the ship has no snapshot).
        available: Decimal,
    },

    /// The amount is zero or negative.
    #[error("amount must be positive, got {amount} for ship {ship_id}")]
    InvalidAmount {
        /// The ship the request was for.
        ship_id: ShipId,
        /// The rejected amount.
        amount: Decimal,
    },

    /// An application request exceeds the ship's available banked surplus.
    #[error(
        "ship {ship_id} cannot apply {requested} to {year}: only {available} banked surplus available"
    )]
    InsufficientBankedSurplus {
        /// The ship applying surplus.
        ship_id: ShipId,
        /// The target year.
        year: Year,
        /// Amount requested.
        requested: Decimal,
        /// Eligible banked surplus.
        available: Decimal,
    },

    /// A ship named for pooling has no snapshot for the pool year.
    #[error("ship {ship_id} missing compliance record for {year}")]
    MissingComplianceRecord {
        /// The ship without a record.
        ship_id: ShipId,
        /// The pool year.
        year: Year,
    },

    /// A pool was requested with no ships.
    #[error("pool for {year} has no members")]
    EmptyPool {
        /// The pool year.
        year: Year,
    },

    /// The pool's total balance is negative.
    #[error("pool validation failed: total balance {total} is negative")]
    PoolValidation {
        /// Sum of member balances.
        total: Decimal,
    },

    /// The allocator broke a pool invariant. This is a defect.
    #[error("pool invariant violated: {reason}")]
    PoolInvariant {
        /// The offending ship, if the violation is per-ship.
        ship_id: Option<ShipId>,
        /// Which invariant failed.
        reason: String,
    },

    /// Decimal arithmetic overflowed.
    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    /// A calculator input was invalid.
    #[error("calculation error: {0}")]
    Calculation(CalculationError),

    /// A banking rule rejected the request.
    #[error("banking rule error: {0}")]
    Rule(BankingRuleError),

    /// The storage collaborator failed.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },
}

impl From<AllocationError> for ComplianceError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::PoolValidation { total } => Self::PoolValidation { total },
            AllocationError::PoolInvariant { ship_id, reason } => {
                Self::PoolInvariant { ship_id, reason }
            }
            AllocationError::Overflow => Self::Overflow("pool allocation"),
        }
    }
}

impl From<BankingRuleError> for ComplianceError {
    fn from(err: BankingRuleError) -> Self {
        match err {
            BankingRuleError::Overflow => Self::Overflow("banked surplus"),
            overdrawn @ BankingRuleError::Overdrawn { .. } => Self::Rule(overdrawn),
        }
    }
}

impl From<CalculationError> for ComplianceError {
    fn from(err: CalculationError) -> Self {
        match err {
            CalculationError::MissingBaseline { year } => Self::MissingBaseline { year },
            other => Self::Calculation(other),
        }
    }
}
