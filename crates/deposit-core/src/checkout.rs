//! Validated checkout requests.

use crate::error::{DepositError, Result};

/// Longest product name the gateway accepts for a line item.
pub const MAX_PRODUCT_NAME_CHARS: usize = 250;

/// Largest single charge the gateway accepts, in minor units.
pub const MAX_AMOUNT_MINOR: i64 = 99_999_999;

/// A checkout request that passed validation.
///
/// Construct one with [`CheckoutRequest::new`]; the fields are guaranteed to
/// hold a non-empty product name and a positive amount in minor units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    product_name: String,
    amount_minor: i64,
}

impl CheckoutRequest {
    /// Validate and build a checkout request.
    ///
    /// The product name is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns `DepositError::Validation` if the product name is empty or too
    /// long, or the amount is not in `1..=MAX_AMOUNT_MINOR`.
    pub fn new(product_name: &str, amount_minor: i64) -> Result<Self> {
        let product_name = product_name.trim();

        if product_name.is_empty() {
            return Err(DepositError::Validation(
                "product_name must not be empty".into(),
            ));
        }
        if product_name.chars().count() > MAX_PRODUCT_NAME_CHARS {
            return Err(DepositError::Validation(format!(
                "product_name must be at most {MAX_PRODUCT_NAME_CHARS} characters"
            )));
        }
        if amount_minor <= 0 {
            return Err(DepositError::Validation(
                "amount must be a positive integer in minor currency units".into(),
            ));
        }
        if amount_minor > MAX_AMOUNT_MINOR {
            return Err(DepositError::Validation(format!(
                "amount must not exceed {MAX_AMOUNT_MINOR}"
            )));
        }

        Ok(Self {
            product_name: product_name.to_string(),
            amount_minor,
        })
    }

    /// Display name of the single line item.
    #[must_use]
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Amount in minor currency units.
    #[must_use]
    pub const fn amount_minor(&self) -> i64 {
        self.amount_minor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_request() {
        let req = CheckoutRequest::new("  Test Product ", 5000).unwrap();
        assert_eq!(req.product_name(), "Test Product");
        assert_eq!(req.amount_minor(), 5000);
    }

    #[test]
    fn rejects_empty_product_name() {
        assert!(matches!(
            CheckoutRequest::new("   ", 5000),
            Err(DepositError::Validation(_))
        ));
    }

    #[test]
    fn rejects_long_product_name() {
        let name = "x".repeat(MAX_PRODUCT_NAME_CHARS + 1);
        assert!(CheckoutRequest::new(&name, 5000).is_err());

        let name = "x".repeat(MAX_PRODUCT_NAME_CHARS);
        assert!(CheckoutRequest::new(&name, 5000).is_ok());
    }

    #[test]
    fn rejects_non_positive_amount() {
        assert!(CheckoutRequest::new("Widget", 0).is_err());
        assert!(CheckoutRequest::new("Widget", -100).is_err());
    }

    #[test]
    fn rejects_amount_over_ceiling() {
        assert!(CheckoutRequest::new("Widget", MAX_AMOUNT_MINOR).is_ok());
        assert!(CheckoutRequest::new("Widget", MAX_AMOUNT_MINOR + 1).is_err());
    }
}
