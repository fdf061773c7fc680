//! # Mailer Configuration
//!
//! Configuration for the SMTP relay connection.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     CASHEW_SMTP_HOST=smtp.example.com                                   │
//! │     CASHEW_SMTP_USERNAME=invoices@example.com                           │
//! │                                                                         │
//! │  2. Explicit builder values                                             │
//! │     MailerConfig::new("smtp.example.com", "store@example.com")          │
//! │         .credentials("user", "app-password")                            │
//! │                                                                         │
//! │  3. Defaults (lowest priority)                                          │
//! │     Port 465, implicit TLS, 10 second send timeout                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment Variables
//!
//! | Variable                   | Meaning                                    |
//! |----------------------------|--------------------------------------------|
//! | `CASHEW_SMTP_HOST`         | Relay hostname                             |
//! | `CASHEW_SMTP_PORT`         | Relay port (default 465)                   |
//! | `CASHEW_SMTP_TLS`          | `implicit`, `starttls` or `none`           |
//! | `CASHEW_SMTP_USERNAME`     | Relay login (empty = unauthenticated)      |
//! | `CASHEW_SMTP_PASSWORD`     | Relay password or app password             |
//! | `CASHEW_SMTP_SENDER`       | From mailbox, e.g. `Store <s@example.com>` |
//! | `CASHEW_SMTP_CC`           | Optional CC mailbox for every invoice      |
//! | `CASHEW_SMTP_TIMEOUT_SECS` | Send timeout in seconds (default 10)       |
//!
//! Credentials never live in source. Production deployments inject them via
//! the environment; development setups pass placeholders to the builder.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{MailError, MailResult};

// =============================================================================
// TLS Mode
// =============================================================================

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// TLS from the first byte (SMTPS, usually port 465).
    #[default]
    Implicit,

    /// Plaintext upgraded via STARTTLS (usually port 587).
    StartTls,

    /// No TLS at all. Only sensible against a relay on localhost or a
    /// capture server in tests.
    None,
}

impl TlsMode {
    /// Returns the conventional port for this mode.
    pub fn default_port(&self) -> u16 {
        match self {
            TlsMode::Implicit => 465,
            TlsMode::StartTls => 587,
            TlsMode::None => 25,
        }
    }
}

impl std::fmt::Display for TlsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TlsMode::Implicit => write!(f, "implicit"),
            TlsMode::StartTls => write!(f, "starttls"),
            TlsMode::None => write!(f, "none"),
        }
    }
}

impl std::str::FromStr for TlsMode {
    type Err = MailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "implicit" | "wrapper" | "smtps" => Ok(TlsMode::Implicit),
            "starttls" | "required" => Ok(TlsMode::StartTls),
            "none" | "plain" => Ok(TlsMode::None),
            other => Err(MailError::InvalidConfig(format!(
                "Unknown TLS mode: '{}'. Valid options: implicit, starttls, none",
                other
            ))),
        }
    }
}

// =============================================================================
// Mailer Configuration
// =============================================================================

/// SMTP relay configuration.
///
/// ## Example
/// ```rust
/// use cashew_mail::MailerConfig;
///
/// let config = MailerConfig::new("smtp.example.com", "Store <store@example.com>")
///     .credentials("store@example.com", "app-password")
///     .cc("bookkeeping@example.com");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// SMTP relay hostname.
    pub smtp_host: String,

    /// SMTP relay port.
    /// Default: 465 (implicit TLS)
    pub smtp_port: u16,

    /// Connection security.
    /// Default: implicit TLS
    pub tls: TlsMode,

    /// Relay login. Empty means the relay accepts unauthenticated mail
    /// (common for localhost smarthosts).
    pub username: String,

    /// Relay password. Ignored when `username` is empty.
    pub password: String,

    /// From mailbox on every invoice, e.g. `"Store <store@example.com>"`.
    pub sender: String,

    /// Optional CC mailbox copied on every invoice (bookkeeping inbox).
    pub cc: Option<String>,

    /// How long a single send may take before it is abandoned.
    /// Default: 10 seconds
    pub send_timeout: Duration,
}

impl MailerConfig {
    /// Creates a configuration for the given relay host and sender mailbox.
    pub fn new(smtp_host: impl Into<String>, sender: impl Into<String>) -> Self {
        let tls = TlsMode::default();
        MailerConfig {
            smtp_host: smtp_host.into(),
            smtp_port: tls.default_port(),
            tls,
            username: String::new(),
            password: String::new(),
            sender: sender.into(),
            cc: None,
            send_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the relay port.
    pub fn port(mut self, port: u16) -> Self {
        self.smtp_port = port;
        self
    }

    /// Sets the TLS mode and, when the port was untouched, the matching
    /// conventional port.
    pub fn tls(mut self, tls: TlsMode) -> Self {
        if self.smtp_port == self.tls.default_port() {
            self.smtp_port = tls.default_port();
        }
        self.tls = tls;
        self
    }

    /// Sets the relay login credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets a CC mailbox copied on every invoice.
    pub fn cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = Some(cc.into());
        self
    }

    /// Sets the send timeout.
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Builds a configuration entirely from `CASHEW_SMTP_*` variables.
    ///
    /// `CASHEW_SMTP_HOST` and `CASHEW_SMTP_SENDER` are required; everything
    /// else falls back to the builder defaults.
    pub fn from_env() -> MailResult<Self> {
        let host = std::env::var("CASHEW_SMTP_HOST")
            .map_err(|_| MailError::InvalidConfig("CASHEW_SMTP_HOST is not set".into()))?;
        let sender = std::env::var("CASHEW_SMTP_SENDER")
            .map_err(|_| MailError::InvalidConfig("CASHEW_SMTP_SENDER is not set".into()))?;

        let mut config = MailerConfig::new(host, sender);
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `CASHEW_SMTP_*` environment overrides onto this config.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("CASHEW_SMTP_HOST") {
            debug!(host = %host, "Overriding SMTP host from environment");
            self.smtp_host = host;
        }

        if let Ok(port) = std::env::var("CASHEW_SMTP_PORT") {
            match port.parse::<u16>() {
                Ok(p) => self.smtp_port = p,
                Err(_) => warn!(port = %port, "Ignoring unparseable CASHEW_SMTP_PORT"),
            }
        }

        if let Ok(tls) = std::env::var("CASHEW_SMTP_TLS") {
            match tls.parse::<TlsMode>() {
                Ok(mode) => self.tls = mode,
                Err(_) => warn!(tls = %tls, "Ignoring unknown CASHEW_SMTP_TLS"),
            }
        }

        if let Ok(username) = std::env::var("CASHEW_SMTP_USERNAME") {
            self.username = username;
        }

        if let Ok(password) = std::env::var("CASHEW_SMTP_PASSWORD") {
            self.password = password;
        }

        if let Ok(sender) = std::env::var("CASHEW_SMTP_SENDER") {
            self.sender = sender;
        }

        if let Ok(cc) = std::env::var("CASHEW_SMTP_CC") {
            self.cc = if cc.trim().is_empty() { None } else { Some(cc) };
        }

        if let Ok(secs) = std::env::var("CASHEW_SMTP_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) if s > 0 => self.send_timeout = Duration::from_secs(s),
                _ => warn!(secs = %secs, "Ignoring unparseable CASHEW_SMTP_TIMEOUT_SECS"),
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> MailResult<()> {
        if self.smtp_host.trim().is_empty() {
            return Err(MailError::InvalidConfig("SMTP host must not be empty".into()));
        }

        if self.smtp_port == 0 {
            return Err(MailError::InvalidConfig("SMTP port must not be 0".into()));
        }

        if self.sender.trim().is_empty() {
            return Err(MailError::InvalidConfig("Sender mailbox must not be empty".into()));
        }

        if self.send_timeout.is_zero() {
            return Err(MailError::InvalidConfig("Send timeout must not be zero".into()));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MailerConfig::new("smtp.example.com", "store@example.com");

        assert_eq!(config.smtp_port, 465);
        assert_eq!(config.tls, TlsMode::Implicit);
        assert_eq!(config.send_timeout, Duration::from_secs(10));
        assert!(config.cc.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tls_mode_tracks_conventional_port() {
        let config = MailerConfig::new("smtp.example.com", "store@example.com")
            .tls(TlsMode::StartTls);
        assert_eq!(config.smtp_port, 587);

        // An explicit port survives a later TLS change.
        let pinned = MailerConfig::new("smtp.example.com", "store@example.com")
            .port(2525)
            .tls(TlsMode::StartTls);
        assert_eq!(pinned.smtp_port, 2525);
    }

    #[test]
    fn test_tls_mode_parsing() {
        assert_eq!("implicit".parse::<TlsMode>().unwrap(), TlsMode::Implicit);
        assert_eq!("STARTTLS".parse::<TlsMode>().unwrap(), TlsMode::StartTls);
        assert_eq!("none".parse::<TlsMode>().unwrap(), TlsMode::None);
        assert!("carrier-pigeon".parse::<TlsMode>().is_err());

        assert_eq!(TlsMode::StartTls.to_string(), "starttls");
    }

    #[test]
    fn test_validation_failures() {
        let no_host = MailerConfig::new("", "store@example.com");
        assert!(no_host.validate().is_err());

        let no_sender = MailerConfig::new("smtp.example.com", "  ");
        assert!(no_sender.validate().is_err());

        let zero_port = MailerConfig::new("smtp.example.com", "store@example.com").port(0);
        assert!(zero_port.validate().is_err());
    }
}
