//! Error types for the storage layer.
//!
//! All repository operations return [`StoreError`]. Adapters for real
//! databases map their driver errors into [`StoreError::Unavailable`].

use rust_decimal::Decimal;

use fueleu_types::{BankEntryId, ShipId};

/// Errors that can occur in a storage adapter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// `begin` was called while a transaction was already open.
    #[error("a transaction is already active")]
    TransactionActive,

    /// `commit` or `rollback` was called with no open transaction.
    #[error("no active transaction")]
    NoTransaction,

    /// A draw-down asked for more than the ship's entries hold.
    #[error("ship {ship_id} bank entries hold {available}, cannot use {requested}")]
    Overdrawn {
        /// The ship whose entries were drawn.
        ship_id: ShipId,
        /// Amount requested.
        requested: Decimal,
        /// Amount available.
        available: Decimal,
    },

    /// A planned draw-down does not match the stored entry it targets.
    #[error("ship {ship_id} draw-down of {amount} from entry {entry_id} rejected: {reason}")]
    DrawDownMismatch {
        /// The ship whose entries were drawn.
        ship_id: ShipId,
        /// The targeted entry.
        entry_id: BankEntryId,
        /// Amount the plan wanted to draw.
        amount: Decimal,
        /// Why the draw cannot be applied.
        reason: &'static str,
    },

    /// Decimal arithmetic overflowed while updating a balance.
    #[error("arithmetic overflow updating {0}")]
    Overflow(&'static str),

    /// The backing store could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
