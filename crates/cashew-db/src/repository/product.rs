//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD keyed by numeric id or by human-facing product code
//! - Catalog listing for terminal display
//!
//! ## Code vs Id
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Two Ways to Address a Product                        │
//! │                                                                         │
//! │  Cashier types: "P001"              Engine joins on: product_id = 3     │
//! │       │                                      │                          │
//! │       ▼                                      ▼                          │
//! │  get_by_code("P001")                 get(3)                             │
//! │                                                                         │
//! │  The code is what appears on shelf labels and checkout lines.           │
//! │  The id is what purchase_items reference, so a code can be              │
//! │  reassigned without touching sales history.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use cashew_core::{validation, NewProduct, Product};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Look up by code
/// let product = repo.get_by_code("P001").await?;
///
/// // List the catalog
/// let page = repo.list(50, 0).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product into the catalog.
    ///
    /// Input is validated before any SQL runs: blank or oversized fields,
    /// negative prices and tax rates above 100% are rejected as
    /// [`DbError::Validation`].
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(DbError::UniqueViolation)` - Code or name already exists
    pub async fn create(&self, new_product: &NewProduct) -> DbResult<Product> {
        validation::validate_new_product(new_product)?;

        debug!(code = %new_product.code, "Inserting product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                code, name, stock, price_cents, tax_rate_bps,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&new_product.code)
        .bind(&new_product.name)
        .bind(new_product.stock)
        .bind(new_product.price_cents)
        .bind(new_product.tax_rate_bps)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| match DbError::from(err) {
            // The generic mapping knows the column but not the value;
            // fill it in from the rejected input.
            DbError::UniqueViolation { field, .. } if field.ends_with(".name") => {
                DbError::duplicate(field, &new_product.name)
            }
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &new_product.code),
            other => other,
        })?;

        Ok(Product {
            id: result.last_insert_rowid(),
            code: new_product.code.clone(),
            name: new_product.name.clone(),
            stock: new_product.stock,
            price_cents: new_product.price_cents,
            tax_rate_bps: new_product.tax_rate_bps,
            created_at: now,
            updated_at: now,
        })
    }

    /// Gets a product by its id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, stock, price_cents, tax_rate_bps,
                   created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its code (e.g., "P001").
    ///
    /// This is the lookup checkout uses for every cart line.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product carries this code
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, stock, price_cents, tax_rate_bps,
                   created_at, updated_at
            FROM products
            WHERE code = ?1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists catalog products ordered by code.
    ///
    /// ## Arguments
    /// * `limit` - Maximum rows to return
    /// * `offset` - Rows to skip (for paging)
    pub async fn list(&self, limit: u32, offset: u32) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, code, name, stock, price_cents, tax_rate_bps,
                   created_at, updated_at
            FROM products
            ORDER BY code
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Updates an existing product.
    ///
    /// All columns are overwritten from `changes`, including stock.
    /// Recorded purchases are unaffected: line items carry their own
    /// snapshots of code, name, price and tax rate.
    ///
    /// ## Returns
    /// * `Ok(())` - Update successful
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, changes: &NewProduct) -> DbResult<()> {
        validation::validate_new_product(changes)?;

        debug!(id = %id, code = %changes.code, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                code = ?2,
                name = ?3,
                stock = ?4,
                price_cents = ?5,
                tax_rate_bps = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&changes.code)
        .bind(&changes.name)
        .bind(changes.stock)
        .bind(changes.price_cents)
        .bind(changes.tax_rate_bps)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|err| match DbError::from(err) {
            DbError::UniqueViolation { field, .. } if field.ends_with(".name") => {
                DbError::duplicate(field, &changes.name)
            }
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &changes.code),
            other => other,
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id.to_string()));
        }

        Ok(())
    }

    /// Conditionally decrements stock for one product.
    ///
    /// Runs on the caller's connection so it can join the purchase commit
    /// transaction; this is the only stock mutation checkout performs. The
    /// `stock >= ?` guard keeps the decrement atomic under concurrent
    /// checkouts: a shelf drained below `quantity` affects zero rows
    /// instead of going negative.
    ///
    /// ## Returns
    /// * `Ok(true)` - Stock reduced by `quantity`
    /// * `Ok(false)` - Guard failed: fewer than `quantity` units remain
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        id: i64,
        quantity: i64,
        updated_at: DateTime<Utc>,
    ) -> DbResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - ?2, updated_at = ?3
            WHERE id = ?1 AND stock >= ?2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a product from the catalog.
    ///
    /// Products that appear on any recorded purchase are protected by the
    /// RESTRICT foreign key on purchase_items and cannot be deleted; the
    /// attempt surfaces as [`DbError::ForeignKeyViolation`].
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id.to_string()));
        }

        Ok(())
    }

    /// Counts catalog products (for diagnostics and seed guards).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
