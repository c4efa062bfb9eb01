//! Core types for hosted-checkout deposits.
//!
//! This crate provides the domain types shared by the store, the HTTP service
//! and the client SDK:
//!
//! - **Identifiers**: `DepositId`
//! - **Deposits**: `Deposit`, `NewDeposit`, `DepositStatus`
//! - **Checkout**: `CheckoutRequest` (validated product name and amount)
//!
//! # Amounts
//!
//! Callers submit amounts in minor units (pence, cents) as integers. Deposits
//! record the amount in major units as a `Decimal` with two places, so a
//! checkout for `5000` is stored as `50.00`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checkout;
pub mod deposit;
pub mod error;
pub mod ids;

pub use checkout::{CheckoutRequest, MAX_AMOUNT_MINOR, MAX_PRODUCT_NAME_CHARS};
pub use deposit::{minor_to_major, Deposit, DepositStatus, NewDeposit, MINOR_UNIT_SCALE};
pub use error::{DepositError, Result};
pub use ids::{DepositId, IdError};
pub use rust_decimal::Decimal;
