//! Balance calculation, pool allocation and banking rules.
//!
//! This crate is the pure half of the compliance engine: it holds no
//! state and performs no I/O. Services in `fueleu-core` feed it snapshots
//! and bank entries read from storage and persist what it returns.
//!
//! # Architecture
//!
//! - [`calculator`] -- Compliance balance and intensity comparisons.
//! - [`allocation`] -- The greedy two-pointer pool redistribution.
//! - [`conservation`] -- Post-allocation invariant verification.
//! - [`banking`] -- Available surplus, eligibility and FIFO draw-down.
//!
//! # Pool invariants
//!
//! For every pool produced by [`allocate_pool`]:
//!
//! ```text
//! |sum(cb_after) - sum(cb_before)| <= BALANCE_TOLERANCE
//! cb_before >= 0  =>  cb_after >= 0
//! cb_before <  0  =>  cb_after >= cb_before
//! ```
//!
//! A violation is an [`AllocationError::PoolInvariant`] -- a defect in the
//! allocator, never a user error. The allocator never panics; it returns
//! errors.
//!
//! # Usage
//!
//! ```
//! use fueleu_ledger::allocate_pool;
//! use fueleu_types::PoolCandidate;
//! use rust_decimal::Decimal;
//!
//! let members = allocate_pool(&[
//!     PoolCandidate::new("A", Decimal::new(100, 0)),
//!     PoolCandidate::new("B", Decimal::new(-40, 0)),
//!     PoolCandidate::new("C", Decimal::new(-30, 0)),
//! ]);
//!
//! let after: Vec<Decimal> = members
//!     .map(|m| m.into_iter().map(|m| m.cb_after).collect())
//!     .unwrap_or_default();
//! assert_eq!(after, vec![Decimal::new(30, 0), Decimal::ZERO, Decimal::ZERO]);
//! ```

pub mod allocation;
pub mod banking;
pub mod calculator;
pub mod conservation;

// Re-export primary functions at crate root.
pub use allocation::allocate_pool;
pub use banking::{
    DrawDown, adjusted_balance, banked_available, banked_from_year, is_eligible, plan_draw_down,
};
pub use calculator::{
    REFERENCE_ENERGY_MJ, REGULATORY_TARGET_2025, compare_routes, compute_cb,
    compute_intensity_diff,
};
pub use conservation::verify_allocation;

use rust_decimal::Decimal;

use fueleu_types::{ShipId, Year};

/// Tolerance for every "close enough to zero" decision on balances
/// (0.001 gCO2e).
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 3);

/// The negated tolerance (-0.001), the floor for "close enough to zero"
/// on the deficit side.
pub const NEGATIVE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, true, 3);

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from the balance calculator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalculationError {
    /// No route in the set is flagged as the baseline.
    #[error("no baseline route configured for year {year}")]
    MissingBaseline {
        /// The year whose routes were compared.
        year: Year,
    },

    /// The baseline intensity is zero, so a percentage is undefined.
    #[error("baseline intensity is zero; percentage difference is undefined")]
    ZeroBaseline,

    /// Decimal arithmetic overflowed.
    #[error("arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

/// Errors from the pool allocator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// The pool as a whole is in deficit; there is not enough surplus to
    /// cover its members.
    #[error("pool validation failed: total balance {total} is negative")]
    PoolValidation {
        /// Sum of `cb_before` over all candidates.
        total: Decimal,
    },

    /// A post-allocation invariant does not hold. This is a defect.
    #[error("pool invariant violated: {reason}")]
    PoolInvariant {
        /// The offending ship, `None` for pool-wide violations.
        ship_id: Option<ShipId>,
        /// Which invariant failed, naming the ship where there is one.
        reason: String,
    },

    /// Decimal arithmetic overflowed while summing or transferring.
    #[error("arithmetic overflow during pool allocation")]
    Overflow,
}

/// Errors from the banking rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BankingRuleError {
    /// The draw-down request exceeds what the entries hold.
    #[error("cannot draw {requested} from bank entries holding {available}")]
    Overdrawn {
        /// Amount requested.
        requested: Decimal,
        /// Amount available across the entries.
        available: Decimal,
    },

    /// Decimal arithmetic overflowed while summing entries.
    #[error("arithmetic overflow while summing bank entries")]
    Overflow,
}
