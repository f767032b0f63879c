//! Storage contracts and the in-memory adapter for compliance ledgers.
//!
//! The compliance services depend only on the repository traits defined
//! here. Real deployments supply an adapter per storage technology; this
//! crate ships [`InMemoryStore`] for tests and embedding.
//!
//! # Architecture
//!
//! ```text
//! BankingService / PoolService
//!     |
//!     +-- ComplianceRepository  (per-ship yearly balances)
//!     +-- BankRepository        (banked-surplus entries)
//!     +-- PoolRepository        (formed pools)
//!     +-- Transactional         (all-or-nothing multi-write operations)
//! ```
//!
//! # Modules
//!
//! - [`repository`] -- Repository traits and [`with_transaction`]
//! - [`memory`] -- [`InMemoryStore`] adapter
//! - [`error`] -- Shared error types

pub mod error;
pub mod memory;
pub mod repository;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use memory::InMemoryStore;
pub use repository::{
    BankRepository, ComplianceRepository, PoolRepository, Transactional, with_transaction,
};
