//! Deposit records and their lifecycle.
//!
//! A deposit correlates a gateway-issued checkout session with the amount the
//! customer was asked to pay. It is created `Pending` once the gateway has
//! confirmed the session, and moves to `Completed` when a verified completion
//! event arrives. The transition is one-way.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DepositError;
use crate::DepositId;

/// Number of decimal places between minor and major currency units.
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Convert an amount in minor units (pence, cents) to major units.
///
/// The conversion is exact: `5000` becomes `50.00`.
#[must_use]
pub fn minor_to_major(amount_minor: i64) -> Decimal {
    Decimal::new(amount_minor, MINOR_UNIT_SCALE)
}

/// Payment status of a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    /// Session created, payment not yet confirmed.
    Pending,
    /// Gateway reported the session as completed.
    Completed,
}

impl DepositStatus {
    /// Lowercase wire/storage form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepositStatus {
    type Err = DepositError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            other => Err(DepositError::InvalidStatus(other.to_string())),
        }
    }
}

/// A deposit that has not been persisted yet.
///
/// The store assigns the identifier and timestamps on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeposit {
    /// Amount in major units.
    pub amount: Decimal,
    /// Gateway session identifier.
    pub session_id: String,
}

impl NewDeposit {
    /// Build a pending deposit for a session charged `amount_minor` minor units.
    #[must_use]
    pub fn for_session(session_id: impl Into<String>, amount_minor: i64) -> Self {
        Self {
            amount: minor_to_major(amount_minor),
            session_id: session_id.into(),
        }
    }
}

/// A persisted deposit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    /// Store-assigned identifier.
    pub id: DepositId,

    /// Amount in major units (e.g. pounds).
    pub amount: Decimal,

    /// Gateway session identifier. Unique across deposits.
    pub session_id: String,

    /// Current payment status.
    pub status: DepositStatus,

    /// When the deposit was created.
    pub created_at: DateTime<Utc>,

    /// When the deposit was last written.
    pub updated_at: DateTime<Utc>,

    /// When the deposit transitioned to `Completed`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Deposit {
    /// Materialize a new deposit with the given identifier, in `Pending` state.
    #[must_use]
    pub fn create(id: DepositId, new: NewDeposit, now: DateTime<Utc>) -> Self {
        Self {
            id,
            amount: new.amount,
            session_id: new.session_id,
            status: DepositStatus::Pending,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Whether the deposit has been completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == DepositStatus::Completed
    }

    /// Move the deposit to `Completed`.
    ///
    /// Returns `true` if the status changed, `false` if the deposit was
    /// already completed (in which case nothing is modified).
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_completed() {
            return false;
        }

        self.status = DepositStatus::Completed;
        self.updated_at = now;
        self.completed_at = Some(now);
        true
    }
}
