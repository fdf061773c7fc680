//! # Billing Engine Configuration
//!
//! Currently the only tunable is the denomination set used to count out
//! change. The default is the standard register tray (2000 down to 1); a
//! deployment that never stocks certain notes can narrow the set.

use cashew_core::Denominations;

/// Configuration for [`BillingEngine`](crate::engine::BillingEngine).
#[derive(Debug, Clone, Default)]
pub struct BillingConfig {
    /// Denominations available for making change, largest first.
    pub denominations: Denominations,
}

impl BillingConfig {
    /// Create a configuration with the default denomination set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the denomination set used for change counting.
    pub fn denominations(mut self, denominations: Denominations) -> Self {
        self.denominations = denominations;
        self
    }
}

// ===== Tests =====
