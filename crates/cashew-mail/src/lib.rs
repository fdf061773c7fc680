//! # cashew-mail: Invoice Email Delivery for Cashew POS
//!
//! This crate turns a rendered [`cashew_core::Invoice`] into an SMTP message
//! and delivers it in the background, off the checkout path.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cashew POS Mail Flow                              │
//! │                                                                         │
//! │  BillingEngine::checkout (cashew-billing)                               │
//! │       │  invoice (already committed to cashew-db)                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     cashew-mail (THIS CRATE)                    │    │
//! │  │                                                                 │    │
//! │  │   ┌────────────────┐        ┌───────────────────────────────┐   │    │
//! │  │   │  MailerConfig  │───────►│  InvoiceMailer                │   │    │
//! │  │   │  (config.rs)   │        │  (mailer.rs)                  │   │    │
//! │  │   │                │        │                               │   │    │
//! │  │   │ CASHEW_SMTP_*  │        │ compose() - pure MIME build   │   │    │
//! │  │   │ env overrides  │        │ send()    - await the relay   │   │    │
//! │  │   └────────────────┘        │ dispatch()- spawn and forget  │   │    │
//! │  │                             └───────────────────────────────┘   │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SMTP relay (TLS via rustls)                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Relay settings with `CASHEW_SMTP_*` environment overrides
//! - [`mailer`] - Message composition and background delivery
//! - [`error`] - Mail error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod mailer;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{MailerConfig, TlsMode};
pub use error::{MailError, MailResult};
pub use mailer::InvoiceMailer;
