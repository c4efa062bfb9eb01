//! API handlers.

pub mod checkout;
pub mod deposits;
pub mod health;
pub mod webhooks;
