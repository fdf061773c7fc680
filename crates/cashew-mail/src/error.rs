//! # Mail Error Types
//!
//! Error types for invoice delivery.
//!
//! Callers on the checkout path never see these: the dispatcher logs and
//! drops them. They surface only from [`crate::InvoiceMailer::send`], the
//! blocking variant used by diagnostics and tests.

use std::time::Duration;

use thiserror::Error;

/// Invoice delivery errors.
#[derive(Debug, Error)]
pub enum MailError {
    /// Configuration rejected before a transport was built.
    #[error("Invalid mail configuration: {0}")]
    InvalidConfig(String),

    /// An address failed to parse as an RFC 5322 mailbox.
    ///
    /// ## When This Occurs
    /// - Sender or CC misconfigured
    /// - Customer email passed checkout's non-empty rule but is not
    ///   an address ("walk-in", a phone number, ...)
    #[error("Invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },

    /// Message assembly failed (headers or body).
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    /// SMTP conversation failed (connect, auth, or relay rejection).
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The relay did not answer within the configured window.
    #[error("Timed out after {0:?} waiting for SMTP relay")]
    Timeout(Duration),
}

/// Result type for mail operations.
pub type MailResult<T> = Result<T, MailError>;
