//! # Domain Types
//!
//! Core domain types used throughout Cashew POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │    Purchase     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  code (unique)  │   │  email (unique) │   │  customer_id    │       │
//! │  │  name (unique)  │   └─────────────────┘   │  total_cents    │       │
//! │  │  stock          │                         │  paid_cents     │       │
//! │  │  price_cents    │   ┌─────────────────┐   │  purchased_at   │       │
//! │  │  tax_rate_bps   │   │  PurchaseItem   │   └─────────────────┘       │
//! │  └─────────────────┘   │  ─────────────  │                             │
//! │                        │  *_snapshot     │   ┌─────────────────┐       │
//! │                        │  quantity       │   │    TaxRate      │       │
//! │                        │  unit_price     │   │  bps (u32)      │       │
//! │                        │  tax_rate_bps   │   │  1800 = 18%     │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Entities carry surrogate integer ids assigned by the store. Products also
//! carry a unique human-facing `code` (what the cashier types) and a unique
//! display `name`; purchases reference customers by id, never by email.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1800 bps = 18% (the common demo-catalog rate)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Surrogate identifier assigned by the store.
    pub id: i64,

    /// Human-facing product code - what gets typed at checkout ("P001").
    pub code: String,

    /// Display name shown on invoices.
    pub name: String,

    /// Units currently on hand. Never negative after a committed purchase.
    pub stock: i64,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Tax rate in basis points (1800 = 18%).
    pub tax_rate_bps: u32,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }

    /// Checks whether the requested quantity can be served from stock.
    #[inline]
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

/// Fields for creating or replacing a catalog product.
///
/// The store assigns `id` and timestamps; everything else comes from the
/// admin surface and must pass [`crate::validation::validate_new_product`]
/// before it reaches the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub code: String,
    pub name: String,
    pub stock: i64,
    pub price_cents: i64,
    pub tax_rate_bps: u32,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer identity, keyed by email.
///
/// Created lazily the first time a purchase is made under the email;
/// never deleted in normal flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Purchase
// =============================================================================

/// A committed purchase header.
///
/// Created only together with at least one [`PurchaseItem`] in the same
/// transaction; immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Purchase {
    pub id: i64,
    pub customer_id: i64,
    /// Sum of line totals including tax, in cents.
    pub total_cents: i64,
    /// Amount tendered, in cents. Always >= total_cents for committed rows.
    pub paid_cents: i64,
    /// Server-assigned commit timestamp.
    pub purchased_at: DateTime<Utc>,
}

impl Purchase {
    /// Returns the bill total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Returns the tendered amount as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Returns the balance owed back to the customer.
    #[inline]
    pub fn balance(&self) -> Money {
        self.paid() - self.total()
    }
}

// =============================================================================
// Purchase Item
// =============================================================================

/// A line item in a committed purchase.
/// Uses snapshot pattern to freeze product data at time of purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PurchaseItem {
    pub id: i64,
    pub purchase_id: i64,
    pub product_id: i64,
    /// Product code at time of purchase (frozen).
    pub code_snapshot: String,
    /// Product name at time of purchase (frozen).
    pub name_snapshot: String,
    /// Units purchased. Always positive.
    pub quantity: i64,
    /// Unit price in cents at time of purchase (frozen).
    pub unit_price_cents: i64,
    /// Tax rate in basis points at time of purchase (frozen).
    pub tax_rate_bps: u32,
}

impl PurchaseItem {
    /// Returns the snapshotted unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the snapshotted tax rate.
    #[inline]
    pub fn tax_rate(&self) -> TaxRate {
        TaxRate::from_bps(self.tax_rate_bps)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
