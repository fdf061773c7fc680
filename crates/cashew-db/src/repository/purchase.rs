//! # Purchase Repository
//!
//! Database operations for purchases and their line items.
//!
//! ## Commit Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  One Purchase = One Transaction                         │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── INSERT purchases (header: customer, totals, timestamp)           │
//! │    │                                                                    │
//! │    ├── For each line:                                                   │
//! │    │     ├── INSERT purchase_items (snapshot of code/name/price/tax)    │
//! │    │     └── UPDATE products SET stock = stock - qty                    │
//! │    │             WHERE id = ? AND stock >= qty                          │
//! │    │                   │                                                │
//! │    │                   └── 0 rows? → StockConflict, ROLLBACK            │
//! │    │                                                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The stock guard re-checks availability at write time. Validation       │
//! │  happened earlier without a lock, so a concurrent checkout may have     │
//! │  drained the shelf in between. Losers roll back with nothing written.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use cashew_core::{Purchase, PurchaseItem};

/// Line item data captured at commit time.
///
/// Code, name, unit price and tax rate are snapshots of the product row as
/// it looked when the sale went through. Later catalog edits change none of
/// these on recorded purchases.
#[derive(Debug, Clone)]
pub struct NewPurchaseItem {
    pub product_id: i64,
    pub code_snapshot: String,
    pub name_snapshot: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
}

/// Repository for purchase database operations.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Writes a purchase, its line items and the stock decrements atomically.
    ///
    /// ## Arguments
    /// * `customer_id` - Existing customer row (see `CustomerRepository::get_or_create`)
    /// * `total_cents` - Tax-inclusive grand total
    /// * `paid_cents` - Amount tendered by the customer
    /// * `purchased_at` - Sale timestamp recorded on the header
    /// * `items` - Snapshot lines, one per distinct cart line
    ///
    /// ## Returns
    /// * `Ok(Purchase)` - The recorded header with its assigned id
    /// * `Err(DbError::StockConflict)` - A line lost the stock race; nothing
    ///   was written
    pub async fn commit_purchase(
        &self,
        customer_id: i64,
        total_cents: i64,
        paid_cents: i64,
        purchased_at: DateTime<Utc>,
        items: &[NewPurchaseItem],
    ) -> DbResult<Purchase> {
        debug!(
            customer_id = %customer_id,
            lines = items.len(),
            total_cents = %total_cents,
            "Committing purchase"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let header = sqlx::query(
            r#"
            INSERT INTO purchases (customer_id, total_cents, paid_cents, purchased_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(customer_id)
        .bind(total_cents)
        .bind(paid_cents)
        .bind(purchased_at)
        .execute(&mut *tx)
        .await?;

        let purchase_id = header.last_insert_rowid();

        for item in items {
            sqlx::query(
                r#"
                INSERT INTO purchase_items (
                    purchase_id, product_id, code_snapshot, name_snapshot,
                    quantity, unit_price_cents, tax_rate_bps
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(purchase_id)
            .bind(item.product_id)
            .bind(&item.code_snapshot)
            .bind(&item.name_snapshot)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.tax_rate_bps)
            .execute(&mut *tx)
            .await?;

            let decremented = ProductRepository::decrement_stock(
                &mut *tx,
                item.product_id,
                item.quantity,
                now,
            )
            .await?;

            if !decremented {
                // Dropping `tx` rolls back the header and earlier lines.
                return Err(DbError::StockConflict {
                    product_id: item.product_id,
                    requested: item.quantity,
                });
            }
        }

        tx.commit().await?;

        debug!(purchase_id = %purchase_id, "Purchase committed");

        Ok(Purchase {
            id: purchase_id,
            customer_id,
            total_cents,
            paid_cents,
            purchased_at,
        })
    }

    /// Gets a purchase header by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Purchase>> {
        let purchase = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, customer_id, total_cents, paid_cents, purchased_at
            FROM purchases
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(purchase)
    }

    /// Gets all line items for a purchase, in the order they were rung up.
    pub async fn items_for(&self, purchase_id: i64) -> DbResult<Vec<PurchaseItem>> {
        let items = sqlx::query_as::<_, PurchaseItem>(
            r#"
            SELECT id, purchase_id, product_id, code_snapshot, name_snapshot,
                   quantity, unit_price_cents, tax_rate_bps
            FROM purchase_items
            WHERE purchase_id = ?1
            ORDER BY id
            "#,
        )
        .bind(purchase_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists a customer's purchases, newest first.
    pub async fn list_for_customer(&self, customer_id: i64) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, customer_id, total_cents, paid_cents, purchased_at
            FROM purchases
            WHERE customer_id = ?1
            ORDER BY purchased_at DESC, id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }

    /// Lists the most recent purchases store-wide, newest first.
    pub async fn recent(&self, limit: u32) -> DbResult<Vec<Purchase>> {
        let purchases = sqlx::query_as::<_, Purchase>(
            r#"
            SELECT id, customer_id, total_cents, paid_cents, purchased_at
            FROM purchases
            ORDER BY purchased_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(purchases)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use cashew_core::NewProduct;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn demo_product(code: &str, stock: i64) -> NewProduct {
        NewProduct {
            code: code.to_string(),
            name: format!("Demo {code}"),
            stock,
            price_cents: 2500,
            tax_rate_bps: 1800,
        }
    }

    fn snapshot_line(product: &cashew_core::Product, quantity: i64) -> NewPurchaseItem {
        NewPurchaseItem {
            product_id: product.id,
            code_snapshot: product.code.clone(),
            name_snapshot: product.name.clone(),
            quantity,
            unit_price_cents: product.price_cents,
            tax_rate_bps: product.tax_rate_bps,
        }
    }

    #[tokio::test]
    async fn test_commit_decrements_stock_and_records_items() {
        let db = test_db().await;
        let product = db.products().create(&demo_product("T001", 10)).await.unwrap();
        let customer = db.customers().create("t@example.com").await.unwrap();

        let purchase = db
            .purchases()
            .commit_purchase(
                customer.id,
                5900,
                6000,
                Utc::now(),
                &[snapshot_line(&product, 2)],
            )
            .await
            .unwrap();

        assert_eq!(purchase.customer_id, customer.id);
        assert_eq!(purchase.total_cents, 5900);

        let reread = db.products().get(product.id).await.unwrap().unwrap();
        assert_eq!(reread.stock, 8);

        let items = db.purchases().items_for(purchase.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].code_snapshot, "T001");
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_stock_conflict_rolls_back_everything() {
        let db = test_db().await;
        let plenty = db.products().create(&demo_product("T001", 10)).await.unwrap();
        let scarce = db.products().create(&demo_product("T002", 1)).await.unwrap();
        let customer = db.customers().create("t@example.com").await.unwrap();

        let err = db
            .purchases()
            .commit_purchase(
                customer.id,
                12500,
                12500,
                Utc::now(),
                &[snapshot_line(&plenty, 2), snapshot_line(&scarce, 3)],
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DbError::StockConflict { product_id, requested: 3 } if product_id == scarce.id
        ));

        // First line's decrement and the header must both be gone.
        let reread = db.products().get(plenty.id).await.unwrap().unwrap();
        assert_eq!(reread.stock, 10);
        assert!(db.purchases().get(1).await.unwrap().is_none());
        assert!(db.purchases().items_for(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_newest_first() {
        let db = test_db().await;
        let product = db.products().create(&demo_product("T001", 50)).await.unwrap();
        let customer = db.customers().create("t@example.com").await.unwrap();

        for day in 1..=3 {
            let at = DateTime::parse_from_rfc3339(&format!("2026-08-0{day}T10:00:00Z"))
                .unwrap()
                .with_timezone(&Utc);
            db.purchases()
                .commit_purchase(customer.id, 2950, 3000, at, &[snapshot_line(&product, 1)])
                .await
                .unwrap();
        }

        let history = db.purchases().list_for_customer(customer.id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].purchased_at > history[1].purchased_at);
        assert!(history[1].purchased_at > history[2].purchased_at);

        let recent = db.purchases().recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, history[0].id);
    }
}
