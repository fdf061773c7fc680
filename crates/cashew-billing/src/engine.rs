//! # Billing Engine
//!
//! The checkout orchestrator. Everything a sale needs happens here, in a
//! fixed order, and nothing is written until the whole cart has cleared
//! validation and payment.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Two-Phase Checkout                               │
//! │                                                                         │
//! │  PHASE 1: VALIDATE (read-only, accumulate every issue)                  │
//! │                                                                         │
//! │  header checks          per-line checks (against catalog)              │
//! │  ├─ email present       ├─ product code exists                          │
//! │  ├─ cart non-empty      ├─ quantity positive                            │
//! │  ├─ lists same length   └─ stock sufficient                             │
//! │  └─ payment positive                                                    │
//! │    │                                                                    │
//! │    ├── any issue ──────► Rejected(all issues)        nothing written    │
//! │    │                                                                    │
//! │  price lines ── paid < total ──► InsufficientPayment  nothing written   │
//! │    │                                                                    │
//! │  PHASE 2: COMMIT (one transaction in cashew-db)                         │
//! │                                                                         │
//! │  get_or_create customer ─► purchase + items + stock ─► change ─► invoice│
//! │                                                 │                       │
//! │                                                 └─ stock race lost:     │
//! │                                                    StockConflict,       │
//! │                                                    transaction rolled   │
//! │                                                    back                 │
//! │                                                                         │
//! │  AFTER COMMIT: invoice email dispatched fire-and-forget (optional)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why validation reads without locking
//! Phase 1 checks stock from plain reads, so two concurrent checkouts can
//! both pass validation for the last unit. The conditional decrement inside
//! the commit transaction is the arbiter: the loser surfaces
//! `DbError::StockConflict` through [`BillingError::Storage`] with nothing
//! written.

use chrono::Utc;
use tracing::{info, warn};

use cashew_core::invoice::{totals, InvoiceTotals};
use cashew_core::{
    breakdown, CheckoutIssue, CheckoutRequest, Invoice, InvoiceLine, Money, Product, Purchase,
    ValidationErrors,
};
use cashew_db::{Database, DbError, NewPurchaseItem};
use cashew_mail::InvoiceMailer;

use crate::config::BillingConfig;
use crate::error::{BillingError, BillingResult};

// =============================================================================
// Billing Engine
// =============================================================================

/// Orchestrates checkout, invoice retrieval and purchase history.
///
/// Holds a database handle, the change-counting configuration and an
/// optional invoice mailer. Cloning is cheap; each repository call pulls a
/// pooled connection.
#[derive(Debug, Clone)]
pub struct BillingEngine {
    db: Database,
    config: BillingConfig,
    mailer: Option<InvoiceMailer>,
}

impl BillingEngine {
    /// Creates an engine with the default configuration and no mailer.
    pub fn new(db: Database) -> Self {
        Self::with_config(db, BillingConfig::default())
    }

    /// Creates an engine with an explicit configuration.
    pub fn with_config(db: Database, config: BillingConfig) -> Self {
        BillingEngine {
            db,
            config,
            mailer: None,
        }
    }

    /// Attaches an invoice mailer. Without one, checkout still commits and
    /// simply skips the email.
    pub fn mailer(mut self, mailer: InvoiceMailer) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.db
    }

    // ===== Checkout =====

    /// Runs a full checkout: validate, price, commit, count change, invoice.
    ///
    /// ## Returns
    /// * `Ok(Invoice)` - The sale is committed; the invoice reflects it
    /// * `Err(BillingError::Rejected)` - One or more cart problems, all listed
    /// * `Err(BillingError::InsufficientPayment)` - Cart is fine, money short
    /// * `Err(BillingError::Storage)` - The commit itself failed (including
    ///   a lost stock race); nothing was written
    pub async fn checkout(&self, request: CheckoutRequest) -> BillingResult<Invoice> {
        // ----- Phase 1: validate everything, commit nothing -----

        let mut issues = ValidationErrors::new();
        request.validate_header(&mut issues);

        // Resolve each line against the catalog. A line that fails any check
        // records its issue and drops out; the remaining lines still get
        // checked so the caller sees every problem at once.
        let mut resolved: Vec<(Product, i64)> = Vec::with_capacity(request.line_count());
        for line in request.lines() {
            let product = match self.db.products().get_by_code(line.code).await? {
                Some(product) => product,
                None => {
                    issues.push(CheckoutIssue::UnknownProduct {
                        line: line.index,
                        code: line.code.to_string(),
                    });
                    continue;
                }
            };

            if line.quantity <= 0 {
                issues.push(CheckoutIssue::NonPositiveQuantity {
                    line: line.index,
                    name: product.name,
                    quantity: line.quantity,
                });
                continue;
            }

            if !product.has_stock(line.quantity) {
                issues.push(CheckoutIssue::InsufficientStock {
                    line: line.index,
                    name: product.name,
                    available: product.stock,
                    requested: line.quantity,
                });
                continue;
            }

            resolved.push((product, line.quantity));
        }

        if !issues.is_empty() {
            warn!(issues = issues.len(), "Checkout rejected");
            return Err(BillingError::Rejected(issues));
        }

        // Price the cart from the resolved products. From here on the sale
        // uses these figures even if the catalog changes underneath.
        let lines: Vec<InvoiceLine> = resolved
            .iter()
            .map(|(product, quantity)| InvoiceLine::price(product, *quantity))
            .collect();
        let InvoiceTotals { total, tax } = totals(&lines);

        let paid = Money::from_cents(request.paid_cents);
        if paid < total {
            return Err(BillingError::InsufficientPayment {
                shortfall_cents: (total - paid).cents(),
            });
        }

        // ----- Phase 2: commit -----

        // The customer row is created outside the purchase transaction. If
        // the commit below fails, a fresh customer row survives with no
        // purchases, which is harmless and right on retry.
        let customer = self
            .db
            .customers()
            .get_or_create(&request.customer_email)
            .await?;

        let purchased_at = Utc::now();
        let items: Vec<NewPurchaseItem> = resolved
            .iter()
            .map(|(product, quantity)| NewPurchaseItem {
                product_id: product.id,
                code_snapshot: product.code.clone(),
                name_snapshot: product.name.clone(),
                quantity: *quantity,
                unit_price_cents: product.price_cents,
                tax_rate_bps: product.tax_rate_bps,
            })
            .collect();

        let purchase = self
            .db
            .purchases()
            .commit_purchase(customer.id, total.cents(), paid.cents(), purchased_at, &items)
            .await?;

        let change = breakdown(paid - total, &self.config.denominations);
        let invoice = Invoice::assemble(
            customer.email,
            purchase.id,
            lines,
            paid,
            change,
            purchased_at,
        );

        // Strictly after commit: a dead relay must never lose the sale.
        if let Some(mailer) = &self.mailer {
            mailer.dispatch(&invoice);
        }

        info!(
            purchase_id = purchase.id,
            customer_id = customer.id,
            total_cents = total.cents(),
            tax_cents = tax.cents(),
            lines = invoice.items.len(),
            "Checkout committed"
        );

        Ok(invoice)
    }

    // ===== Retrieval =====

    /// Rebuilds the invoice for a committed purchase from stored snapshots.
    ///
    /// Line pricing uses only the frozen code, name, unit price and tax
    /// rate, so the result matches the invoice issued at sale time even
    /// after catalog edits.
    pub async fn purchase_invoice(&self, purchase_id: i64) -> BillingResult<Invoice> {
        let purchase = self
            .db
            .purchases()
            .get(purchase_id)
            .await?
            .ok_or(BillingError::PurchaseNotFound(purchase_id))?;

        let items = self.db.purchases().items_for(purchase_id).await?;
        let lines: Vec<InvoiceLine> = items.iter().map(InvoiceLine::from_snapshot).collect();

        // A purchase row always references an existing customer (FK), so a
        // miss here means the database is inconsistent, not the caller.
        let customer = self
            .db
            .customers()
            .get(purchase.customer_id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", purchase.customer_id.to_string()))?;

        let change = breakdown(
            purchase.paid() - totals(&lines).total,
            &self.config.denominations,
        );

        Ok(Invoice::assemble(
            customer.email,
            purchase.id,
            lines,
            purchase.paid(),
            change,
            purchase.purchased_at,
        ))
    }

    /// All purchases for a customer email, newest first.
    pub async fn purchase_history(&self, email: &str) -> BillingResult<Vec<Purchase>> {
        let customer = self
            .db
            .customers()
            .find_by_email(email)
            .await?
            .ok_or_else(|| BillingError::CustomerNotFound(email.to_string()))?;

        Ok(self.db.purchases().list_for_customer(customer.id).await?)
    }

    /// The most recent purchases across all customers, newest first.
    pub async fn recent_purchases(&self, limit: u32) -> BillingResult<Vec<Purchase>> {
        Ok(self.db.purchases().recent(limit).await?)
    }
}
