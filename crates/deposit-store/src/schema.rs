//! Database schema definitions and column families.
//!
//! This module defines the column families used in `RocksDB` storage. The
//! PostgreSQL schema lives in `migrations/`.

/// Column family names for the `RocksDB` database.
pub mod cf {
    /// Primary deposit records, keyed by `deposit_id` (ULID bytes).
    pub const DEPOSITS: &str = "deposits";

    /// Index: deposits by gateway session, keyed by `session_id`.
    /// Value is the 16-byte deposit ID.
    pub const DEPOSITS_BY_SESSION: &str = "deposits_by_session";
}

/// Returns all column family names for database initialization.
#[must_use]
pub fn all_column_families() -> Vec<&'static str> {
    vec![cf::DEPOSITS, cf::DEPOSITS_BY_SESSION]
}
