//! # Customer Repository
//!
//! Database operations for the customer directory.
//!
//! Checkout never asks the cashier whether a customer is new: it hands the
//! email to [`CustomerRepository::get_or_create`] and gets a row either way.
//! The UNIQUE index on email is the only arbiter of identity.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use cashew_core::{validation, Customer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, email, created_at FROM customers WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Finds a customer by email.
    pub async fn find_by_email(&self, email: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, email, created_at FROM customers WHERE email = ?1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Inserted customer with its assigned id
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn create(&self, email: &str) -> DbResult<Customer> {
        validation::validate_email(email)?;

        debug!(email = %email, "Inserting customer");

        let now = Utc::now();

        let result = sqlx::query("INSERT INTO customers (email, created_at) VALUES (?1, ?2)")
            .bind(email)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|err| match DbError::from(err) {
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, email),
                other => other,
            })?;

        Ok(Customer {
            id: result.last_insert_rowid(),
            email: email.to_string(),
            created_at: now,
        })
    }

    /// Returns the customer for this email, creating the row if absent.
    ///
    /// Two checkouts can race on a first-time email. Both will miss the
    /// lookup; one insert wins, the other hits the UNIQUE index and
    /// re-reads the winner's row. Either way the caller gets the same
    /// customer id.
    pub async fn get_or_create(&self, email: &str) -> DbResult<Customer> {
        if let Some(existing) = self.find_by_email(email).await? {
            return Ok(existing);
        }

        match self.create(email).await {
            Ok(customer) => Ok(customer),
            Err(DbError::UniqueViolation { .. }) => self
                .find_by_email(email)
                .await?
                .ok_or_else(|| DbError::not_found("Customer", email)),
            Err(other) => Err(other),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use crate::DbError;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_or_create_is_stable() {
        let db = test_db().await;

        let first = db.customers().get_or_create("amy@example.com").await.unwrap();
        let second = db.customers().get_or_create("amy@example.com").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.email, "amy@example.com");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let db = test_db().await;

        db.customers().create("bob@example.com").await.unwrap();
        let err = db.customers().create("bob@example.com").await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_blank_email_rejected() {
        let db = test_db().await;

        let err = db.customers().create("   ").await.unwrap_err();
        assert!(matches!(err, DbError::Validation(_)));
    }
}
