//! # cashew-core: Pure Billing Logic for Cashew POS
//!
//! This crate is the **heart** of Cashew POS. It contains all billing logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cashew POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  cashew-billing (Engine)                        │   │
//! │  │    checkout ──► purchase_invoice ──► purchase_history           │   │
//! │  └───────┬─────────────────────┬───────────────────┬───────────────┘   │
//! │          │                     │                   │                    │
//! │  ┌───────▼───────┐   ┌─────────▼────────┐   ┌──────▼─────────┐         │
//! │  │  cashew-db    │   │ ★ cashew-core ★  │   │  cashew-mail   │         │
//! │  │  (SQLite)     │   │  (THIS CRATE)    │   │  (SMTP)        │         │
//! │  └───────────────┘   │                  │   └────────────────┘         │
//! │                      │  ┌────────────┐  │                              │
//! │                      │  │types money │  │                              │
//! │                      │  │checkout    │  │                              │
//! │                      │  │change      │  │                              │
//! │                      │  │invoice     │  │                              │
//! │                      │  │validation  │  │                              │
//! │                      │  └────────────┘  │                              │
//! │                      │                  │                              │
//! │                      │  NO I/O • PURE   │                              │
//! │                      └──────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Customer, Purchase, PurchaseItem)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`checkout`] - The checkout request and its header validation
//! - [`change`] - Greedy change breakdown over configured denominations
//! - [`invoice`] - Invoice assembly and HTML rendering
//! - [`error`] - Domain error types, including accumulated checkout issues
//! - [`validation`] - Catalog field validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic - same input = same output
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are in cents (i64) to avoid float errors
//! 4. **Accumulated Validation**: checkout reports every problem in one pass
//!
//! ## Example Usage
//!
//! ```rust
//! use cashew_core::change::{breakdown, Denominations};
//! use cashew_core::money::Money;
//! use cashew_core::types::TaxRate;
//!
//! // Create money from cents (never from floats!)
//! let subtotal = Money::from_cents(240_000); // $2400.00
//!
//! // Tax at 18%, rounded half-up at the cent
//! let tax = subtotal.tax_at(TaxRate::from_bps(1800));
//! assert_eq!(tax.cents(), 43_200);
//!
//! // Change for a $168.00 balance
//! let change = breakdown(Money::from_cents(16_800), &Denominations::default());
//! assert_eq!(change.count_of(100), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod change;
pub mod checkout;
pub mod error;
pub mod invoice;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use cashew_core::Money` instead of
// `use cashew_core::money::Money`

pub use change::{breakdown, ChangeBreakdown, Denominations, DEFAULT_DENOMINATIONS};
pub use checkout::CheckoutRequest;
pub use error::{CheckoutIssue, ValidationError, ValidationErrors};
pub use invoice::{Invoice, InvoiceLine};
pub use money::Money;
pub use types::*;
