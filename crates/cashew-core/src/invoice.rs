//! # Invoice Assembly & Rendering
//!
//! The invoice is the value a successful checkout returns: per-line detail
//! with snapshot pricing, the aggregate figures, and the change breakdown.
//! The same structure is rebuilt later from stored purchase items, so line
//! math here must depend only on snapshot data, never on the live catalog.
//!
//! Rendering is pure string building. The mail crate decides *when* to send;
//! this module only decides what the message says.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::change::ChangeBreakdown;
use crate::money::Money;
use crate::types::{Product, PurchaseItem, TaxRate};

// =============================================================================
// Invoice Line
// =============================================================================

/// One priced cart line as it appears on the invoice.
///
/// All monetary fields are cents; `subtotal`, `tax` and `total` are derived
/// once at construction so every reader sees identical arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLine {
    pub product_name: String,
    pub product_code: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub tax_rate_bps: u32,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
}

impl InvoiceLine {
    /// Prices a line against a live catalog product.
    ///
    /// `subtotal = unit_price × quantity`, `tax = subtotal × rate` rounded
    /// half-up to the cent, `total = subtotal + tax`.
    pub fn price(product: &Product, quantity: i64) -> Self {
        Self::compute(
            product.name.clone(),
            product.code.clone(),
            quantity,
            product.price(),
            product.tax_rate(),
        )
    }

    /// Re-prices a line from a stored purchase item.
    ///
    /// Uses only the snapshotted name, code, unit price and tax rate, so
    /// later catalog edits never alter a historical invoice.
    pub fn from_snapshot(item: &PurchaseItem) -> Self {
        Self::compute(
            item.name_snapshot.clone(),
            item.code_snapshot.clone(),
            item.quantity,
            item.unit_price(),
            item.tax_rate(),
        )
    }

    fn compute(name: String, code: String, quantity: i64, unit_price: Money, rate: TaxRate) -> Self {
        let subtotal = unit_price.multiply_quantity(quantity);
        let tax = subtotal.tax_at(rate);
        let total = subtotal + tax;
        InvoiceLine {
            product_name: name,
            product_code: code,
            quantity,
            unit_price_cents: unit_price.cents(),
            tax_rate_bps: rate.bps(),
            subtotal_cents: subtotal.cents(),
            tax_cents: tax.cents(),
            total_cents: total.cents(),
        }
    }

    /// Line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Line tax as Money.
    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    /// Line total (subtotal + tax) as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregate bill figures over a set of priced lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceTotals {
    /// Σ line total, tax included.
    pub total: Money,
    /// Σ line tax.
    pub tax: Money,
}

/// Sums line totals and line taxes.
///
/// The bill total is defined as the sum of already-rounded line figures, so
/// the numbers a customer can re-add from the invoice always match.
pub fn totals(lines: &[InvoiceLine]) -> InvoiceTotals {
    let mut total = Money::zero();
    let mut tax = Money::zero();
    for line in lines {
        total += line.total();
        tax += line.tax();
    }
    InvoiceTotals { total, tax }
}

// =============================================================================
// Invoice
// =============================================================================

/// A complete invoice for one committed purchase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub customer_email: String,
    pub purchase_id: i64,
    pub items: Vec<InvoiceLine>,
    pub total_cents: i64,
    pub tax_cents: i64,
    pub paid_cents: i64,
    pub balance_cents: i64,
    pub change: ChangeBreakdown,
    pub purchased_at: DateTime<Utc>,
}

impl Invoice {
    /// Assembles an invoice from priced lines and the committed purchase
    /// facts. Totals are recomputed from the lines; balance is paid - total.
    pub fn assemble(
        customer_email: impl Into<String>,
        purchase_id: i64,
        items: Vec<InvoiceLine>,
        paid: Money,
        change: ChangeBreakdown,
        purchased_at: DateTime<Utc>,
    ) -> Self {
        let InvoiceTotals { total, tax } = totals(&items);
        Invoice {
            customer_email: customer_email.into(),
            purchase_id,
            items,
            total_cents: total.cents(),
            tax_cents: tax.cents(),
            paid_cents: paid.cents(),
            balance_cents: (paid - total).cents(),
            change,
            purchased_at,
        }
    }

    /// Bill total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total tax as Money.
    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    /// Tendered amount as Money.
    #[inline]
    pub fn paid(&self) -> Money {
        Money::from_cents(self.paid_cents)
    }

    /// Balance returned to the customer as Money.
    #[inline]
    pub fn balance(&self) -> Money {
        Money::from_cents(self.balance_cents)
    }

    /// Email subject line.
    pub fn subject(&self) -> String {
        "Your Purchase Invoice".to_string()
    }

    /// Renders the invoice as a self-contained HTML email body.
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(2048);
        html.push_str("<html><body>");
        html.push_str("<h2>Purchase Invoice</h2>");
        html.push_str(&format!(
            "<p>Invoice #{} for {}</p>",
            self.purchase_id,
            escape(&self.customer_email)
        ));
        html.push_str(&format!(
            "<p>Date: {}</p>",
            self.purchased_at.format("%Y-%m-%d %H:%M:%S")
        ));

        html.push_str("<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">");
        html.push_str(
            "<tr><th>Product</th><th>Code</th><th>Qty</th><th>Unit Price</th>\
             <th>Tax %</th><th>Subtotal</th><th>Tax</th><th>Total</th></tr>",
        );
        for line in &self.items {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                 <td>{}</td><td>{}</td><td>{}</td></tr>",
                escape(&line.product_name),
                escape(&line.product_code),
                line.quantity,
                Money::from_cents(line.unit_price_cents),
                format_percentage(line.tax_rate_bps),
                line.subtotal(),
                line.tax(),
                line.total(),
            ));
        }
        html.push_str("</table>");

        html.push_str(&format!("<p>Total Tax: {}</p>", self.tax()));
        html.push_str(&format!("<p><strong>Total: {}</strong></p>", self.total()));
        html.push_str(&format!("<p>Paid: {}</p>", self.paid()));
        html.push_str(&format!("<p>Balance Returned: {}</p>", self.balance()));

        if !self.change.is_empty() {
            html.push_str("<p>Change Breakdown:</p><ul>");
            for (denomination, count) in self.change.iter_desc() {
                html.push_str(&format!("<li>{denomination} × {count}</li>"));
            }
            html.push_str("</ul>");
        }

        html.push_str("<p>Thank you for your purchase!</p>");
        html.push_str("</body></html>");
        html
    }
}

/// Formats basis points as a display percentage ("18%", "8.25%").
fn format_percentage(bps: u32) -> String {
    if bps % 100 == 0 {
        format!("{}%", bps / 100)
    } else {
        format!("{}%", bps as f64 / 100.0)
    }
}

/// Minimal HTML escaping for admin-entered names and customer emails.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::{breakdown, Denominations};

    fn laptop() -> Product {
        Product {
            id: 1,
            code: "P001".to_string(),
            name: "Laptop".to_string(),
            stock: 50,
            price_cents: 120_000,
            tax_rate_bps: 1800,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_line_pricing_vector() {
        // 2 × $1200.00 at 18%: subtotal 2400.00, tax 432.00, total 2832.00
        let line = InvoiceLine::price(&laptop(), 2);
        assert_eq!(line.subtotal_cents, 240_000);
        assert_eq!(line.tax_cents, 43_200);
        assert_eq!(line.total_cents, 283_200);
    }

    #[test]
    fn test_snapshot_pricing_matches_live_pricing() {
        let item = PurchaseItem {
            id: 10,
            purchase_id: 7,
            product_id: 1,
            code_snapshot: "P001".to_string(),
            name_snapshot: "Laptop".to_string(),
            quantity: 2,
            unit_price_cents: 120_000,
            tax_rate_bps: 1800,
        };
        assert_eq!(InvoiceLine::from_snapshot(&item), InvoiceLine::price(&laptop(), 2));
    }

    #[test]
    fn test_totals_sum_lines() {
        let lines = vec![
            InvoiceLine::price(&laptop(), 2),
            InvoiceLine::compute(
                "Speaker".to_string(),
                "P006".to_string(),
                1,
                Money::from_cents(8000),
                TaxRate::from_bps(1200),
            ),
        ];
        let sums = totals(&lines);
        // 283200 + (8000 + 960)
        assert_eq!(sums.total.cents(), 283_200 + 8960);
        assert_eq!(sums.tax.cents(), 43_200 + 960);
    }

    #[test]
    fn test_assemble_computes_balance_and_totals() {
        let items = vec![InvoiceLine::price(&laptop(), 2)];
        let paid = Money::from_cents(300_000);
        let change = breakdown(paid - totals(&items).total, &Denominations::default());
        let invoice = Invoice::assemble(
            "buyer@example.com",
            7,
            items,
            paid,
            change,
            Utc::now(),
        );

        assert_eq!(invoice.total_cents, 283_200);
        assert_eq!(invoice.tax_cents, 43_200);
        assert_eq!(invoice.balance_cents, 16_800);
        // 168 = 100 + 50 + 10 + 5 + 2 + 1
        assert_eq!(invoice.change.count_of(100), 1);
        assert_eq!(invoice.change.count_of(1), 1);
    }

    #[test]
    fn test_serializes_camel_case() {
        let invoice = Invoice::assemble(
            "buyer@example.com",
            7,
            vec![InvoiceLine::price(&laptop(), 1)],
            Money::from_cents(150_000),
            ChangeBreakdown::default(),
            Utc::now(),
        );
        let json = serde_json::to_value(&invoice).unwrap();

        assert!(json.get("customerEmail").is_some());
        assert!(json.get("purchaseId").is_some());
        assert!(json.get("balanceCents").is_some());
        let item = &json["items"][0];
        assert!(item.get("productName").is_some());
        assert!(item.get("unitPriceCents").is_some());
        assert!(item.get("taxRateBps").is_some());
    }

    #[test]
    fn test_html_rendering() {
        let items = vec![InvoiceLine::price(&laptop(), 2)];
        let change = breakdown(Money::from_cents(16_800), &Denominations::default());
        let invoice = Invoice::assemble(
            "buyer@example.com",
            7,
            items,
            Money::from_cents(300_000),
            change,
            Utc::now(),
        );

        let html = invoice.to_html();
        assert!(html.contains("Invoice #7"));
        assert!(html.contains("Laptop"));
        assert!(html.contains("$2832.00"));
        assert!(html.contains("18%"));
        assert!(html.contains("<li>100 × 1</li>"));
        assert_eq!(invoice.subject(), "Your Purchase Invoice");
    }

    #[test]
    fn test_html_escapes_markup() {
        let line = InvoiceLine::compute(
            "Cable <HDMI> & Co".to_string(),
            "P010".to_string(),
            1,
            Money::from_cents(500),
            TaxRate::zero(),
        );
        let invoice = Invoice::assemble(
            "buyer@example.com",
            1,
            vec![line],
            Money::from_cents(500),
            ChangeBreakdown::default(),
            Utc::now(),
        );
        let html = invoice.to_html();
        assert!(html.contains("Cable &lt;HDMI&gt; &amp; Co"));
        assert!(!html.contains("<HDMI>"));
    }
}
