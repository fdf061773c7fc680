//! # Error Types
//!
//! Domain-specific error types for cashew-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cashew-core errors (this file)                                        │
//! │  ├── ValidationError  - Single-field input failures (catalog admin)    │
//! │  ├── CheckoutIssue    - One problem found in a checkout request        │
//! │  └── ValidationErrors - Every CheckoutIssue for one request, together  │
//! │                                                                         │
//! │  cashew-db errors (separate crate)                                     │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  cashew-billing errors (separate crate)                                │
//! │  └── BillingError     - What checkout callers see                      │
//! │                                                                         │
//! │  Flow: CheckoutIssue* → ValidationErrors → BillingError::Rejected      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, line index, amounts)
//! 3. Errors are enum variants, never String
//! 4. Checkout problems accumulate; they are reported all at once

use std::fmt;

use thiserror::Error;

// =============================================================================
// Validation Error (single field)
// =============================================================================

/// Input validation errors for a single field.
///
/// Used by the catalog admin surface (product create/update) where requests
/// carry one value per field and the first failure is enough.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (bad characters, unparseable amount).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Checkout Issues
// =============================================================================

/// One problem found while validating a checkout request.
///
/// Unlike [`ValidationError`], these are collected rather than returned on
/// first failure: a cashier fixing a rejected cart should see every problem
/// in one round trip. Line indices are zero-based positions in the submitted
/// cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutIssue {
    /// The customer email field was empty.
    #[error("customer email is required")]
    MissingEmail,

    /// The cart contained no lines at all.
    #[error("at least one product line is required")]
    EmptyCart,

    /// Product codes and quantities were submitted as parallel lists of
    /// different lengths. Per-line checks still run over the paired prefix.
    #[error("got {codes} product codes but {quantities} quantities")]
    LineCountMismatch { codes: usize, quantities: usize },

    /// Tendered payment was zero or negative.
    #[error("paid amount must be positive")]
    NonPositivePayment,

    /// No catalog product matches the submitted code.
    #[error("line {line}: no product with code '{code}'")]
    UnknownProduct { line: usize, code: String },

    /// Quantity was zero or negative.
    #[error("line {line}: quantity {quantity} for {name} must be positive")]
    NonPositiveQuantity {
        line: usize,
        name: String,
        quantity: i64,
    },

    /// Requested more units than the catalog has on hand.
    #[error("line {line}: insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        line: usize,
        name: String,
        available: i64,
        requested: i64,
    },
}

// =============================================================================
// Validation Errors (accumulated set)
// =============================================================================

/// Every [`CheckoutIssue`] found in one checkout request.
///
/// The billing engine runs all header and per-line checks before looking at
/// this set; if it is non-empty the request is rejected as a whole and
/// nothing is committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    issues: Vec<CheckoutIssue>,
}

impl ValidationErrors {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more issue.
    pub fn push(&mut self, issue: CheckoutIssue) {
        self.issues.push(issue);
    }

    /// True when no issue has been recorded.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of issues recorded.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// All issues, in the order they were found.
    pub fn issues(&self) -> &[CheckoutIssue] {
        &self.issues
    }

    /// Consumes the set, yielding the issues.
    pub fn into_issues(self) -> Vec<CheckoutIssue> {
        self.issues
    }

    /// Returns an iterator over the issues.
    pub fn iter(&self) -> impl Iterator<Item = &CheckoutIssue> {
        self.issues.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for issue in &self.issues {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{issue}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = CheckoutIssue;
    type IntoIter = std::vec::IntoIter<CheckoutIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_messages() {
        let issue = CheckoutIssue::InsufficientStock {
            line: 2,
            name: "Laptop".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            issue.to_string(),
            "line 2: insufficient stock for Laptop: available 3, requested 5"
        );

        let issue = CheckoutIssue::UnknownProduct {
            line: 0,
            code: "P999".to_string(),
        };
        assert_eq!(issue.to_string(), "line 0: no product with code 'P999'");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "code".to_string(),
        };
        assert_eq!(err.to_string(), "code is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "name must be at most 200 characters");
    }

    #[test]
    fn test_errors_accumulate_in_order() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.push(CheckoutIssue::MissingEmail);
        errors.push(CheckoutIssue::NonPositivePayment);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.issues()[0], CheckoutIssue::MissingEmail);
        assert_eq!(
            errors.to_string(),
            "customer email is required; paid amount must be positive"
        );
    }
}
