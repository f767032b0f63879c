//! Storage contracts consumed by the compliance services.
//!
//! The services never see a concrete store. They are generic over these
//! traits, and each storage technology provides one adapter implementing
//! them. [`InMemoryStore`](crate::InMemoryStore) is the adapter shipped
//! with this crate.
//!
//! # Transactions
//!
//! Operations that write more than once (applying banked surplus, forming
//! a pool) run inside [`with_transaction`]. The adapter decides what a
//! transaction means; the services only rely on all-or-nothing commit.

use rust_decimal::Decimal;

use fueleu_types::{BankEntry, ComplianceSnapshot, Pool, PoolId, ShipId, Year};

use crate::error::StoreError;

/// Per-ship yearly compliance balances.
pub trait ComplianceRepository {
    /// Fetch the snapshot for a ship-year, if one exists.
    fn get_for_ship(
        &self,
        ship_id: &ShipId,
        year: Year,
    ) -> Result<Option<ComplianceSnapshot>, StoreError>;

    /// Add `delta` to a ship-year balance, creating the snapshot at
    /// `delta` when none exists.
    fn increment_cb(&mut self, ship_id: &ShipId, year: Year, delta: Decimal)
    -> Result<(), StoreError>;

    /// Store a computed snapshot, replacing any existing one for the same
    /// ship-year.
    fn save_snapshot(&mut self, snapshot: ComplianceSnapshot) -> Result<(), StoreError>;
}

/// Banked-surplus entries.
pub trait BankRepository {
    /// Entries of `ship_id` with a positive available amount, oldest first.
    fn get_available(&self, ship_id: &ShipId) -> Result<Vec<BankEntry>, StoreError>;

    /// Every entry `ship_id` banked from `year`, including spent ones.
    fn get_banked(&self, ship_id: &ShipId, year: Year) -> Result<Vec<BankEntry>, StoreError>;

    /// Append a new entry.
    fn bank_surplus(&mut self, entry: BankEntry) -> Result<(), StoreError>;

    /// Mark `amount` as used across the ship's entries, oldest banked year
    /// first.
    ///
    /// Must fail with [`StoreError::Overdrawn`] rather than push any
    /// entry's `amount_used` past its `amount_banked`.
    fn use_amount(&mut self, ship_id: &ShipId, amount: Decimal) -> Result<(), StoreError>;
}

/// Formed pools.
pub trait PoolRepository {
    /// Persist a pool and return its identifier.
    fn create(&mut self, pool: Pool) -> Result<PoolId, StoreError>;

    /// Fetch a pool by identifier.
    fn get(&self, pool_id: PoolId) -> Result<Option<Pool>, StoreError>;
}

/// A store that can group writes into an all-or-nothing unit.
pub trait Transactional {
    /// Open a transaction.
    fn begin(&mut self) -> Result<(), StoreError>;

    /// Make every write since [`begin`](Transactional::begin) durable.
    fn commit(&mut self) -> Result<(), StoreError>;

    /// Discard every write since [`begin`](Transactional::begin).
    fn rollback(&mut self) -> Result<(), StoreError>;
}

/// Run `f` inside a transaction on `store`.
///
/// Commits when `f` succeeds and rolls back when it fails. A rollback
/// failure is logged; the caller still sees the original error.
///
/// # Errors
///
/// Returns the error from `f`, or a [`StoreError`] from `begin`/`commit`
/// converted into `E`.
pub fn with_transaction<S, T, E, F>(store: &mut S, f: F) -> Result<T, E>
where
    S: Transactional + ?Sized,
    E: From<StoreError>,
    F: FnOnce(&mut S) -> Result<T, E>,
{
    store.begin()?;

    match f(store) {
        Ok(value) => {
            store.commit()?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = store.rollback() {
                tracing::error!(error = %rollback_err, "Transaction rollback failed");
            }
            Err(err)
        }
    }
}
