//! Payment configuration.

use serde::{Deserialize, Serialize};

/// Payment gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentsConfig {
    /// ISO 4217 currency code for every charge.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Make the mock gateway decline every charge.
    #[serde(default)]
    pub mock_decline: bool,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            mock_decline: false,
        }
    }
}

fn default_currency() -> String {
    "EUR".to_string()
}
