//! # Validation Module
//!
//! Field-level validation for the catalog admin surface.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Checkout (cashew-billing)                                    │
//! │  ├── Accumulates CheckoutIssue per request                             │
//! │  └── Rejects the whole cart with every problem at once                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (catalog field rules)                            │
//! │  ├── Runs before product insert/update                                 │
//! │  └── First failure wins (single-field requests)                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (code, name, email)                            │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: each layer catches what the one above lets through  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use cashew_core::validation::{validate_product_code, validate_quantity};
//!
//! // Validate a code before database insert
//! validate_product_code("P001").unwrap();
//!
//! // Validate a quantity before pricing a line
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::types::NewProduct;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product code.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 50 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use cashew_core::validation::validate_product_code;
///
/// assert!(validate_product_code("P001").is_ok());
/// assert!(validate_product_code("").is_err());
/// assert!(validate_product_code("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_product_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    // Check for valid characters (alphanumeric, hyphen, underscore)
    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer email.
///
/// ## Rules
/// - Must not be empty
///
/// Deliberately loose: format policing is left to the mail relay, which is
/// the only thing that actually knows whether an address is deliverable.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0); there is no upper cap, stock is the real limit
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use cashew_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(120_000).is_ok()); // $1200.00
/// assert!(validate_price_cents(0).is_ok());       // Free item
/// assert!(validate_price_cents(-100).is_err());   // Invalid
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock level.
///
/// ## Rules
/// - Must be non-negative (>= 0); the store enforces the same floor
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates every field of a product create/update request.
///
/// First failure wins; the admin surface submits one field per input so
/// there is no need to accumulate here the way checkout does.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_code(&product.code)?;
    validate_product_name(&product.name)?;
    validate_stock(product.stock)?;
    validate_price_cents(product.price_cents)?;
    validate_tax_rate_bps(product.tax_rate_bps)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_code() {
        // Valid codes
        assert!(validate_product_code("P001").is_ok());
        assert!(validate_product_code("ABC123").is_ok());
        assert!(validate_product_code("item_1").is_ok());

        // Invalid codes
        assert!(validate_product_code("").is_err());
        assert!(validate_product_code("   ").is_err());
        assert!(validate_product_code("has space").is_err());
        assert!(validate_product_code(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Wireless Mouse").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("buyer@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(100_000).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(120_000).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1800).is_ok());
        assert!(validate_tax_rate_bps(10000).is_ok());
        assert!(validate_tax_rate_bps(10001).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        let good = NewProduct {
            code: "P007".to_string(),
            name: "Headset".to_string(),
            stock: 40,
            price_cents: 9900,
            tax_rate_bps: 1800,
        };
        assert!(validate_new_product(&good).is_ok());

        let bad_code = NewProduct {
            code: "".to_string(),
            ..good.clone()
        };
        assert!(validate_new_product(&bad_code).is_err());

        let bad_stock = NewProduct {
            stock: -1,
            ..good.clone()
        };
        assert!(validate_new_product(&bad_stock).is_err());

        let bad_tax = NewProduct {
            tax_rate_bps: 20_000,
            ..good
        };
        assert!(validate_new_product(&bad_tax).is_err());
    }
}
