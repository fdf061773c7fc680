//! # Invoice Mailer
//!
//! Composes and delivers invoice emails over SMTP.
//!
//! ## Fire and Forget
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Delivery Never Blocks a Sale                        │
//! │                                                                         │
//! │  BillingEngine::checkout                                                │
//! │       │                                                                 │
//! │       ├── purchase committed, stock decremented   ← the point of        │
//! │       │                                             no return           │
//! │       ├── mailer.dispatch(&invoice)                                     │
//! │       │        │                                                        │
//! │       │        └── tokio::spawn ──► compose ──► send with timeout       │
//! │       │                                  │             │                │
//! │       │                                  └─ Err ───────┴─► warn! only   │
//! │       ▼                                                                 │
//! │  return Ok(invoice)            ← immediately, sender already detached   │
//! │                                                                         │
//! │  The customer walks away with their goods either way. A dead relay      │
//! │  costs them an email, never a sale.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info, warn};

use cashew_core::Invoice;

use crate::config::{MailerConfig, TlsMode};
use crate::error::{MailError, MailResult};

/// Async SMTP mailer for rendered invoices.
///
/// Cloning is cheap: the transport holds a pooled connection set internally,
/// so one mailer can be shared across checkout tasks.
///
/// ## Usage
/// ```rust,ignore
/// let config = MailerConfig::new("smtp.example.com", "Store <store@example.com>")
///     .credentials("store@example.com", "app-password");
/// let mailer = InvoiceMailer::new(config)?;
///
/// // Background send - checkout path
/// mailer.dispatch(&invoice);
///
/// // Blocking send - diagnostics and tests
/// mailer.send(&invoice).await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: Mailbox,
    cc: Option<Mailbox>,
    send_timeout: Duration,
}

impl InvoiceMailer {
    /// Builds a mailer from a validated configuration.
    ///
    /// The relay is not contacted here; connections open lazily on first
    /// send. A wrong password therefore surfaces as a send failure, not a
    /// construction failure.
    pub fn new(config: MailerConfig) -> MailResult<Self> {
        config.validate()?;

        let mut builder = match config.tls {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?,
            TlsMode::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            }
            TlsMode::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
            }
        };

        builder = builder.port(config.smtp_port);

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        let sender = parse_mailbox(&config.sender)?;
        let cc = config.cc.as_deref().map(parse_mailbox).transpose()?;

        info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            tls = %config.tls,
            "Invoice mailer configured"
        );

        Ok(InvoiceMailer {
            transport: builder.build(),
            sender,
            cc,
            send_timeout: config.send_timeout,
        })
    }

    /// Composes the MIME message for an invoice.
    ///
    /// Pure assembly, no I/O: subject and HTML body come from the invoice,
    /// sender and CC from the configuration.
    pub fn compose(&self, invoice: &Invoice) -> MailResult<Message> {
        let to = parse_mailbox(&invoice.customer_email)?;

        let mut builder = Message::builder()
            .from(self.sender.clone())
            .to(to)
            .subject(invoice.subject());

        if let Some(cc) = &self.cc {
            builder = builder.cc(cc.clone());
        }

        let message = builder
            .header(ContentType::TEXT_HTML)
            .body(invoice.to_html())?;

        Ok(message)
    }

    /// Sends an invoice and waits for the relay's verdict.
    ///
    /// Bounded by the configured send timeout so a hung relay cannot pin
    /// the calling task forever.
    pub async fn send(&self, invoice: &Invoice) -> MailResult<()> {
        let message = self.compose(invoice)?;

        debug!(
            purchase_id = invoice.purchase_id,
            to = %invoice.customer_email,
            "Sending invoice email"
        );

        match tokio::time::timeout(self.send_timeout, self.transport.send(message)).await {
            Ok(Ok(response)) => {
                debug!(code = %response.code(), "SMTP relay accepted invoice");
                Ok(())
            }
            Ok(Err(err)) => Err(MailError::Smtp(err)),
            Err(_) => Err(MailError::Timeout(self.send_timeout)),
        }
    }

    /// Queues an invoice for background delivery and returns immediately.
    ///
    /// Failures (bad address, relay down, timeout) are logged at warn and
    /// otherwise dropped. By the time this runs the sale is committed, so
    /// there is nothing useful to do with the error on the checkout path.
    pub fn dispatch(&self, invoice: &Invoice) {
        let mailer = self.clone();
        let invoice = invoice.clone();

        tokio::spawn(async move {
            if let Err(err) = mailer.send(&invoice).await {
                warn!(
                    purchase_id = invoice.purchase_id,
                    to = %invoice.customer_email,
                    error = %err,
                    "Invoice email failed; sale is already committed"
                );
            }
        });
    }
}

/// Parses a mailbox, keeping the offending input in the error.
fn parse_mailbox(address: &str) -> MailResult<Mailbox> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|source| MailError::InvalidAddress {
            address: address.to_string(),
            source,
        })
}

// =============================================================================
// Unit Tests
// =============================================================================
