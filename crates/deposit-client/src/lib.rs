//! Deposit Client SDK.
//!
//! This crate provides a client library for front ends and services that
//! start hosted checkouts and look up the resulting deposits.
//!
//! # Example
//!
//! ```no_run
//! use deposit_client::DepositClient;
//!
//! # async fn example() -> Result<(), deposit_client::ClientError> {
//! let client = DepositClient::new("http://deposits.internal:8000")?;
//!
//! // Start a checkout for 50.00
//! let session = client.create_checkout_session("Account top-up", 5000).await?;
//! println!("Redirect the customer to {}", session.url);
//!
//! // Later, on the success page
//! if let Some(deposit) = client.get_deposit(&session.session_id).await? {
//!     println!("Deposit {} is {}", deposit.amount, deposit.status);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{ClientOptions, DepositClient};
pub use error::ClientError;
pub use types::*;
