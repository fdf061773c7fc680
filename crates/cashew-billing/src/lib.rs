//! # cashew-billing
//!
//! Checkout orchestration for Cashew POS: the layer that turns a submitted
//! cart into a committed purchase and an invoice.
//!
//! ## Where this sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          cashew-billing                                 │
//! │                                                                         │
//! │   CheckoutRequest ──► BillingEngine::checkout ──► Invoice               │
//! │                            │                                            │
//! │          ┌─────────────────┼──────────────────┐                         │
//! │          ▼                 ▼                  ▼                         │
//! │     cashew-core       cashew-db          cashew-mail                    │
//! │     pricing, change   atomic commit      invoice email                  │
//! │     validation        snapshots, stock   (fire-and-forget)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust,no_run
//! use cashew_billing::BillingEngine;
//! use cashew_core::CheckoutRequest;
//! use cashew_db::{Database, DbConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DbConfig::new("./cashew.db")).await?;
//! let engine = BillingEngine::new(db);
//!
//! let request = CheckoutRequest::with_lines(
//!     "buyer@example.com",
//!     &[("P001", 2)],
//!     300_000,
//! );
//! let invoice = engine.checkout(request).await?;
//! println!("{}", invoice.to_html());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;

// ===== Public API Re-exports =====

pub use config::BillingConfig;
pub use engine::BillingEngine;
pub use error::{BillingError, BillingResult};
