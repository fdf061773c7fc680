//! # Checkout Request
//!
//! The checkout request as it arrives from the sales surface: a customer
//! email, parallel lists of product codes and quantities, and the tendered
//! amount. The lists stay parallel here on purpose - pairing them up is part
//! of validation, and a length mismatch must come back as a reported issue,
//! not a panic or silent truncation.
//!
//! Header checks live on the request; per-line checks need the catalog and
//! run in the billing engine.

use serde::{Deserialize, Serialize};

use crate::error::{CheckoutIssue, ValidationErrors};

// =============================================================================
// Checkout Request
// =============================================================================

/// A submitted cart plus payment, exactly as the caller sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Customer email; the customer record is created lazily on first use.
    pub customer_email: String,
    /// Product codes, parallel to `quantities`.
    pub product_codes: Vec<String>,
    /// Quantities, parallel to `product_codes`.
    pub quantities: Vec<i64>,
    /// Tendered payment in cents.
    pub paid_cents: i64,
}

/// One paired (code, quantity) entry with its position in the submitted cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub index: usize,
    pub code: &'a str,
    pub quantity: i64,
}

impl CheckoutRequest {
    pub fn new(
        customer_email: impl Into<String>,
        product_codes: Vec<String>,
        quantities: Vec<i64>,
        paid_cents: i64,
    ) -> Self {
        Self {
            customer_email: customer_email.into(),
            product_codes,
            quantities,
            paid_cents,
        }
    }

    /// Builds a request from already-paired lines. Convenience for callers
    /// that never deal in parallel arrays (and for tests).
    pub fn with_lines(
        customer_email: impl Into<String>,
        lines: &[(&str, i64)],
        paid_cents: i64,
    ) -> Self {
        Self {
            customer_email: customer_email.into(),
            product_codes: lines.iter().map(|(code, _)| (*code).to_string()).collect(),
            quantities: lines.iter().map(|(_, qty)| *qty).collect(),
            paid_cents,
        }
    }

    /// Number of usable lines: the paired prefix of the two lists.
    pub fn line_count(&self) -> usize {
        self.product_codes.len().min(self.quantities.len())
    }

    /// Iterates the paired (code, quantity) lines with their cart positions.
    ///
    /// When the lists differ in length the extra tail entries are
    /// unreachable here; `validate_header` reports the mismatch so the
    /// caller still learns about them.
    pub fn lines(&self) -> impl Iterator<Item = CartLine<'_>> {
        self.product_codes
            .iter()
            .zip(self.quantities.iter())
            .enumerate()
            .map(|(index, (code, quantity))| CartLine {
                index,
                code: code.as_str(),
                quantity: *quantity,
            })
    }

    /// Runs every header-level check, recording each failure.
    ///
    /// Order is stable: email, cart emptiness, list mismatch, payment sign.
    /// Per-line checks are the billing engine's job since they need the
    /// catalog.
    pub fn validate_header(&self, errors: &mut ValidationErrors) {
        if self.customer_email.trim().is_empty() {
            errors.push(CheckoutIssue::MissingEmail);
        }

        if self.line_count() == 0 {
            errors.push(CheckoutIssue::EmptyCart);
        }

        if self.product_codes.len() != self.quantities.len() {
            errors.push(CheckoutIssue::LineCountMismatch {
                codes: self.product_codes.len(),
                quantities: self.quantities.len(),
            });
        }

        if self.paid_cents <= 0 {
            errors.push(CheckoutIssue::NonPositivePayment);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_lines_builds_parallel_arrays() {
        let request = CheckoutRequest::with_lines(
            "buyer@example.com",
            &[("P001", 2), ("P002", 1)],
            300_000,
        );
        assert_eq!(request.product_codes, vec!["P001", "P002"]);
        assert_eq!(request.quantities, vec![2, 1]);
        assert_eq!(request.line_count(), 2);
    }

    #[test]
    fn test_valid_header_records_nothing() {
        let request = CheckoutRequest::with_lines("buyer@example.com", &[("P001", 2)], 1000);
        let mut errors = ValidationErrors::new();
        request.validate_header(&mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_header_issues_accumulate() {
        // Empty email, empty cart, zero payment: all three reported at once.
        let request = CheckoutRequest::new("  ", vec![], vec![], 0);
        let mut errors = ValidationErrors::new();
        request.validate_header(&mut errors);

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.issues()[0], CheckoutIssue::MissingEmail);
        assert_eq!(errors.issues()[1], CheckoutIssue::EmptyCart);
        assert_eq!(errors.issues()[2], CheckoutIssue::NonPositivePayment);
    }

    #[test]
    fn test_length_mismatch_is_reported_and_prefix_paired() {
        let request = CheckoutRequest::new(
            "buyer@example.com",
            vec!["P001".to_string(), "P002".to_string()],
            vec![2],
            1000,
        );
        let mut errors = ValidationErrors::new();
        request.validate_header(&mut errors);

        assert_eq!(
            errors.issues(),
            &[CheckoutIssue::LineCountMismatch {
                codes: 2,
                quantities: 1
            }]
        );

        let lines: Vec<_> = request.lines().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].code, "P001");
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn test_quantities_without_codes_is_an_empty_cart() {
        let request = CheckoutRequest::new("buyer@example.com", vec![], vec![3], 1000);
        let mut errors = ValidationErrors::new();
        request.validate_header(&mut errors);

        assert_eq!(errors.issues()[0], CheckoutIssue::EmptyCart);
        assert_eq!(
            errors.issues()[1],
            CheckoutIssue::LineCountMismatch {
                codes: 0,
                quantities: 1
            }
        );
    }
}
