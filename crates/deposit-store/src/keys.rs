//! Key encoding utilities for `RocksDB`.

use deposit_core::DepositId;

use crate::error::{Result, StoreError};

/// Create a deposit key from a deposit ID.
///
/// ULID bytes are big-endian in time, so keys sort by creation time.
#[must_use]
pub fn deposit_key(deposit_id: &DepositId) -> Vec<u8> {
    deposit_id.to_bytes().to_vec()
}

/// Create a session index key from a gateway session ID.
#[must_use]
pub fn session_key(session_id: &str) -> Vec<u8> {
    session_id.as_bytes().to_vec()
}

/// Decode a deposit ID stored as a 16-byte key or index value.
///
/// # Errors
///
/// Returns `StoreError::Serialization` if the slice is not 16 bytes long.
pub fn decode_deposit_id(bytes: &[u8]) -> Result<DepositId> {
    let bytes: [u8; 16] = bytes.try_into().map_err(|_| {
        StoreError::Serialization(format!("deposit id must be 16 bytes, got {}", bytes.len()))
    })?;
    Ok(DepositId::from_bytes(bytes))
}
