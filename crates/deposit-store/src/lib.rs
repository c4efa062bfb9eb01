//! Storage layer for hosted-checkout deposits.
//!
//! This crate persists [`Deposit`] records and exposes the small set of
//! operations the checkout flow needs: create a pending deposit, find it by
//! gateway session, and mark it completed.
//!
//! # Backends
//!
//! - [`RocksStore`] (feature `rocksdb-backend`, on by default): embedded
//!   `RocksDB` with a primary column family and a session index.
//! - [`PgStore`]: PostgreSQL via `sqlx`, with embedded migrations.
//! - [`MemoryStore`]: in-process, non-durable; for tests and local runs.
//!
//! # Example
//!
//! ```no_run
//! use deposit_core::NewDeposit;
//! use deposit_store::{DepositStore, MemoryStore};
//!
//! # async fn example() -> deposit_store::Result<()> {
//! let store = MemoryStore::new();
//!
//! let id = store.create(NewDeposit::for_session("cs_test_123", 5000)).await?;
//! let deposit = store.find_by_session_id("cs_test_123").await?;
//! assert_eq!(deposit.map(|d| d.id), Some(id));
//!
//! store.mark_completed(&id).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
#[cfg(feature = "rocksdb-backend")]
pub mod keys;
pub mod memory;
pub mod postgres;
#[cfg(feature = "rocksdb-backend")]
pub mod rocks;
#[cfg(feature = "rocksdb-backend")]
pub mod schema;

use async_trait::async_trait;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use postgres::PgStore;
#[cfg(feature = "rocksdb-backend")]
pub use rocks::RocksStore;

use deposit_core::{Deposit, DepositId, NewDeposit};

/// The storage trait defining all deposit operations.
///
/// Implementations must keep `session_id` unique across deposits and make
/// [`mark_completed`](DepositStore::mark_completed) safe to call any number
/// of times, concurrently, for the same deposit.
#[async_trait]
pub trait DepositStore: Send + Sync {
    /// Persist a new pending deposit and return its assigned ID.
    ///
    /// # Errors
    ///
    /// - `StoreError::DuplicateSession` if a deposit already exists for the
    ///   session.
    /// - Any backend error.
    async fn create(&self, deposit: NewDeposit) -> Result<DepositId>;

    /// Get a deposit by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get(&self, id: &DepositId) -> Result<Option<Deposit>>;

    /// Find the deposit correlated with a gateway session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn find_by_session_id(&self, session_id: &str) -> Result<Option<Deposit>>;

    /// Transition a deposit from `Pending` to `Completed`.
    ///
    /// Returns `true` if this call performed the transition and `false` if the
    /// deposit was already completed.
    ///
    /// # Errors
    ///
    /// - `StoreError::NotFound` if the deposit doesn't exist.
    /// - Any backend error.
    async fn mark_completed(&self, id: &DepositId) -> Result<bool>;

    /// Number of deposits stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn count(&self) -> Result<usize>;

    /// List deposits, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Deposit>>;
}
