//! End-to-end checkout tests against an in-memory database.
//!
//! Each test builds a fresh engine over a two-product catalog (a laptop at
//! 18% tax and a speaker at 12%) and drives it through the public API only.

use std::time::Duration;

use cashew_billing::{BillingEngine, BillingError};
use cashew_core::{CheckoutIssue, CheckoutRequest, NewProduct};
use cashew_db::{Database, DbConfig};
use cashew_mail::{InvoiceMailer, MailerConfig, TlsMode};

// ===== Helpers =====

async fn test_engine() -> BillingEngine {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let products = db.products();
    products
        .create(&NewProduct {
            code: "P001".to_string(),
            name: "Laptop".to_string(),
            stock: 50,
            price_cents: 120_000,
            tax_rate_bps: 1800,
        })
        .await
        .unwrap();
    products
        .create(&NewProduct {
            code: "P006".to_string(),
            name: "Speaker".to_string(),
            stock: 80,
            price_cents: 8_000,
            tax_rate_bps: 1200,
        })
        .await
        .unwrap();
    BillingEngine::new(db)
}

fn laptop_pair(paid_cents: i64) -> CheckoutRequest {
    CheckoutRequest::with_lines("buyer@example.com", &[("P001", 2)], paid_cents)
}

// ===== Committed checkouts =====

#[tokio::test]
async fn test_checkout_commits_and_counts_change() {
    let engine = test_engine().await;

    // 2 × 1200.00 at 18%: total 2832.00 on 3000.00 tendered.
    let invoice = engine.checkout(laptop_pair(300_000)).await.unwrap();

    assert_eq!(invoice.customer_email, "buyer@example.com");
    assert_eq!(invoice.total_cents, 283_200);
    assert_eq!(invoice.tax_cents, 43_200);
    assert_eq!(invoice.paid_cents, 300_000);
    assert_eq!(invoice.balance_cents, 16_800);

    // 168 = 100 + 50 + 10 + 5 + 2 + 1
    assert_eq!(invoice.change.count_of(100), 1);
    assert_eq!(invoice.change.count_of(50), 1);
    assert_eq!(invoice.change.count_of(10), 1);
    assert_eq!(invoice.change.count_of(5), 1);
    assert_eq!(invoice.change.count_of(2), 1);
    assert_eq!(invoice.change.count_of(1), 1);
    assert_eq!(invoice.change.counts().len(), 6);

    // The sale is on disk: stock decremented, purchase row present.
    let db = engine.database();
    let laptop = db.products().get_by_code("P001").await.unwrap().unwrap();
    assert_eq!(laptop.stock, 48);
    let purchase = db.purchases().get(invoice.purchase_id).await.unwrap().unwrap();
    assert_eq!(purchase.total_cents, 283_200);
    assert_eq!(purchase.paid_cents, 300_000);
}

#[tokio::test]
async fn test_multi_line_cart_sums_per_line_tax() {
    let engine = test_engine().await;

    let request = CheckoutRequest::with_lines(
        "buyer@example.com",
        &[("P001", 1), ("P006", 2)],
        160_000,
    );
    let invoice = engine.checkout(request).await.unwrap();

    // Laptop: 1200.00 + 216.00 tax. Speakers: 160.00 + 19.20 tax.
    assert_eq!(invoice.items.len(), 2);
    assert_eq!(invoice.items[0].total_cents, 141_600);
    assert_eq!(invoice.items[1].total_cents, 17_920);
    assert_eq!(invoice.total_cents, 159_520);
    assert_eq!(invoice.tax_cents, 23_520);

    // Balance 4.80 → 4 whole units → two 2s.
    assert_eq!(invoice.balance_cents, 480);
    assert_eq!(invoice.change.count_of(2), 2);
    assert_eq!(invoice.change.counts().len(), 1);
}

#[tokio::test]
async fn test_change_drops_fractional_cents() {
    let engine = test_engine().await;

    // Balance 37.80: the .80 is dropped, 37 = 20 + 10 + 5 + 2.
    let invoice = engine.checkout(laptop_pair(286_980)).await.unwrap();

    assert_eq!(invoice.balance_cents, 3_780);
    assert_eq!(invoice.change.count_of(20), 1);
    assert_eq!(invoice.change.count_of(10), 1);
    assert_eq!(invoice.change.count_of(5), 1);
    assert_eq!(invoice.change.count_of(2), 1);
    assert_eq!(invoice.change.counts().len(), 4);
    assert_eq!(invoice.change.total_units(), 37);
}

// ===== Rejections =====

#[tokio::test]
async fn test_overstock_rejected_without_commit() {
    let engine = test_engine().await;

    let request = CheckoutRequest::with_lines("buyer@example.com", &[("P001", 999)], 1_000_000_000);
    let err = engine.checkout(request).await.unwrap_err();

    match err {
        BillingError::Rejected(issues) => {
            assert_eq!(
                issues.issues(),
                &[CheckoutIssue::InsufficientStock {
                    line: 0,
                    name: "Laptop".to_string(),
                    available: 50,
                    requested: 999,
                }]
            );
        }
        other => panic!("expected Rejected, got {other:?}"),
    }

    // Nothing was written.
    let db = engine.database();
    let laptop = db.products().get_by_code("P001").await.unwrap().unwrap();
    assert_eq!(laptop.stock, 50);
    assert!(db.purchases().recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_every_issue_reported_in_one_pass() {
    let engine = test_engine().await;

    // Blank email, zero payment, unknown code on line 0, zero quantity on
    // line 1. One submission, four issues.
    let request = CheckoutRequest::new(
        "",
        vec!["P999".to_string(), "P001".to_string()],
        vec![1, 0],
        0,
    );
    let err = engine.checkout(request).await.unwrap_err();

    match err {
        BillingError::Rejected(issues) => {
            assert_eq!(
                issues.issues(),
                &[
                    CheckoutIssue::MissingEmail,
                    CheckoutIssue::NonPositivePayment,
                    CheckoutIssue::UnknownProduct {
                        line: 0,
                        code: "P999".to_string(),
                    },
                    CheckoutIssue::NonPositiveQuantity {
                        line: 1,
                        name: "Laptop".to_string(),
                        quantity: 0,
                    },
                ]
            );
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_underpayment_reports_shortfall() {
    let engine = test_engine().await;

    let err = engine.checkout(laptop_pair(100_000)).await.unwrap_err();
    match err {
        BillingError::InsufficientPayment { shortfall_cents } => {
            assert_eq!(shortfall_cents, 183_200);
        }
        other => panic!("expected InsufficientPayment, got {other:?}"),
    }

    // A valid cart short on money still commits nothing.
    let db = engine.database();
    let laptop = db.products().get_by_code("P001").await.unwrap().unwrap();
    assert_eq!(laptop.stock, 50);
    assert!(db.purchases().recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_exact_payment_accepted() {
    let engine = test_engine().await;

    let invoice = engine.checkout(laptop_pair(283_200)).await.unwrap();
    assert_eq!(invoice.balance_cents, 0);
    assert!(invoice.change.is_empty());
}

// ===== Customers and history =====

#[tokio::test]
async fn test_same_email_reuses_customer() {
    let engine = test_engine().await;

    let first = engine
        .checkout(CheckoutRequest::with_lines(
            "repeat@example.com",
            &[("P001", 1)],
            150_000,
        ))
        .await
        .unwrap();
    let second = engine
        .checkout(CheckoutRequest::with_lines(
            "repeat@example.com",
            &[("P006", 1)],
            10_000,
        ))
        .await
        .unwrap();
    assert_ne!(first.purchase_id, second.purchase_id);

    let history = engine.purchase_history("repeat@example.com").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].customer_id, history[1].customer_id);

    // Newest first: the speaker sale on top.
    assert_eq!(history[0].id, second.purchase_id);
    assert_eq!(history[0].total_cents, 8_960);
    assert_eq!(history[1].total_cents, 141_600);
}

#[tokio::test]
async fn test_duplicate_submission_is_two_sales() {
    let engine = test_engine().await;

    // The engine has no idempotency key: an identical resubmission is a
    // second sale and decrements stock again.
    let first = engine.checkout(laptop_pair(300_000)).await.unwrap();
    let second = engine.checkout(laptop_pair(300_000)).await.unwrap();

    assert_ne!(first.purchase_id, second.purchase_id);
    let db = engine.database();
    let laptop = db.products().get_by_code("P001").await.unwrap().unwrap();
    assert_eq!(laptop.stock, 46);
    assert_eq!(db.purchases().recent(10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_history_for_unknown_email() {
    let engine = test_engine().await;

    let err = engine.purchase_history("ghost@example.com").await.unwrap_err();
    assert!(matches!(err, BillingError::CustomerNotFound(email) if email == "ghost@example.com"));
}

#[tokio::test]
async fn test_recent_purchases_spans_customers() {
    let engine = test_engine().await;

    engine
        .checkout(CheckoutRequest::with_lines("a@example.com", &[("P001", 1)], 150_000))
        .await
        .unwrap();
    engine
        .checkout(CheckoutRequest::with_lines("b@example.com", &[("P006", 1)], 10_000))
        .await
        .unwrap();
    engine
        .checkout(CheckoutRequest::with_lines("a@example.com", &[("P006", 2)], 20_000))
        .await
        .unwrap();

    let recent = engine.recent_purchases(2).await.unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].total_cents, 17_920);
    assert_eq!(recent[1].total_cents, 8_960);
}

// ===== Invoice rebuild =====

#[tokio::test]
async fn test_invoice_rebuild_survives_catalog_edits() {
    let engine = test_engine().await;
    let original = engine.checkout(laptop_pair(300_000)).await.unwrap();

    // Double the laptop's price after the sale.
    let db = engine.database();
    let laptop = db.products().get_by_code("P001").await.unwrap().unwrap();
    db.products()
        .update(
            laptop.id,
            &NewProduct {
                code: "P001".to_string(),
                name: "Laptop".to_string(),
                stock: laptop.stock,
                price_cents: 240_000,
                tax_rate_bps: 1800,
            },
        )
        .await
        .unwrap();

    // The rebuilt invoice prices from snapshots: identical figures.
    let rebuilt = engine.purchase_invoice(original.purchase_id).await.unwrap();
    assert_eq!(rebuilt.customer_email, "buyer@example.com");
    assert_eq!(rebuilt.items[0].unit_price_cents, 120_000);
    assert_eq!(rebuilt.total_cents, 283_200);
    assert_eq!(rebuilt.tax_cents, 43_200);
    assert_eq!(rebuilt.paid_cents, 300_000);
    assert_eq!(rebuilt.balance_cents, 16_800);
    assert_eq!(rebuilt.change, original.change);

    // A fresh sale sees the new price.
    let fresh = engine
        .checkout(CheckoutRequest::with_lines("buyer@example.com", &[("P001", 1)], 300_000))
        .await
        .unwrap();
    assert_eq!(fresh.items[0].unit_price_cents, 240_000);
    assert_eq!(fresh.total_cents, 283_200);
}

#[tokio::test]
async fn test_invoice_for_unknown_purchase() {
    let engine = test_engine().await;

    let err = engine.purchase_invoice(9_999).await.unwrap_err();
    assert!(matches!(err, BillingError::PurchaseNotFound(9_999)));
}

// ===== Mail dispatch =====

#[tokio::test]
async fn test_dead_relay_never_loses_the_sale() {
    // Point the mailer at a port nothing listens on. The send fails in the
    // background; checkout must still commit and return the invoice.
    let mailer = InvoiceMailer::new(
        MailerConfig::new("127.0.0.1", "register@example.com")
            .tls(TlsMode::None)
            .port(1)
            .send_timeout(Duration::from_secs(2)),
    )
    .unwrap();
    let engine = test_engine().await.mailer(mailer);

    let invoice = engine.checkout(laptop_pair(300_000)).await.unwrap();
    assert_eq!(invoice.total_cents, 283_200);

    let rebuilt = engine.purchase_invoice(invoice.purchase_id).await.unwrap();
    assert_eq!(rebuilt.total_cents, 283_200);
}
