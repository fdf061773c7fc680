//! # Billing Error Types
//!
//! Errors surfaced by [`BillingEngine`](crate::engine::BillingEngine)
//! operations. A checkout fails in exactly one of three ways: the cart
//! itself is bad ([`Rejected`](BillingError::Rejected)), the money offered
//! does not cover the bill ([`InsufficientPayment`](BillingError::InsufficientPayment)),
//! or the storage layer refused the commit ([`Storage`](BillingError::Storage)).
//! Lookup operations add their own not-found variants so callers can tell a
//! missing purchase from a missing customer.

use cashew_core::ValidationErrors;
use cashew_db::DbError;
use thiserror::Error;

/// Errors that can occur during billing operations.
#[derive(Error, Debug)]
pub enum BillingError {
    /// The cart failed validation. Carries every issue found, not just
    /// the first, so the operator can fix the whole cart in one pass.
    #[error("Checkout rejected: {0}")]
    Rejected(ValidationErrors),

    /// The customer's payment does not cover the bill total.
    #[error("payment is {shortfall_cents} cents short of the bill total")]
    InsufficientPayment {
        /// How much more money is needed, in cents.
        shortfall_cents: i64,
    },

    /// No purchase exists with the given id.
    #[error("purchase {0} not found")]
    PurchaseNotFound(i64),

    /// No customer exists with the given email.
    #[error("customer '{0}' not found")]
    CustomerNotFound(String),

    /// The storage layer failed. Wraps everything from connection loss to
    /// the stock-conflict race detected inside the commit transaction.
    #[error("storage error: {0}")]
    Storage(#[from] DbError),
}

/// Convenience result type for billing operations.
pub type BillingResult<T> = Result<T, BillingError>;
