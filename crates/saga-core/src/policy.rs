//! # Intent Policy
//!
//! Server-side limits applied before a provider is asked to create an
//! intent. Loaded from `config/intents.toml`:
//!
//! ```toml
//! allowed_currencies = ["usd", "eur"]
//! min_amount = 50
//! max_amount = 1000000
//! ```

use crate::error::{SagaError, SagaResult};
use crate::intent::{Currency, PaymentIntentOptions};
use serde::{Deserialize, Serialize};

/// Limits for payment intent requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentPolicy {
    /// Accepted currencies; empty accepts all
    #[serde(default)]
    pub allowed_currencies: Vec<Currency>,

    /// Smallest accepted amount, in smallest currency unit
    #[serde(default = "default_min_amount")]
    pub min_amount: i64,

    /// Largest accepted amount, in smallest currency unit
    #[serde(default)]
    pub max_amount: Option<i64>,
}

fn default_min_amount() -> i64 {
    1
}

impl Default for IntentPolicy {
    fn default() -> Self {
        Self {
            allowed_currencies: Vec::new(),
            min_amount: default_min_amount(),
            max_amount: None,
        }
    }
}

impl IntentPolicy {
    /// Parse a policy from TOML
    pub fn from_toml_str(content: &str) -> SagaResult<Self> {
        toml::from_str(content).map_err(|e| {
            SagaError::Configuration(format!("Failed to parse intent policy: {}", e))
        })
    }

    /// Builder: restrict currencies
    pub fn with_currencies(mut self, currencies: impl IntoIterator<Item = Currency>) -> Self {
        self.allowed_currencies = currencies.into_iter().collect();
        self
    }

    /// Builder: set the amount range
    pub fn with_amount_range(mut self, min: i64, max: Option<i64>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn accepts_currency(&self, currency: Currency) -> bool {
        self.allowed_currencies.is_empty() || self.allowed_currencies.contains(&currency)
    }

    /// Check a payment request against this policy
    pub fn check_payment(&self, options: &PaymentIntentOptions) -> SagaResult<()> {
        if !self.accepts_currency(options.currency) {
            return Err(SagaError::UnsupportedCurrency {
                currency: options.currency.as_str().to_string(),
            });
        }

        if options.amount < self.min_amount {
            return Err(SagaError::InvalidAmount {
                message: format!(
                    "amount {} is below the minimum of {}",
                    options.amount, self.min_amount
                ),
            });
        }

        if let Some(max) = self.max_amount {
            if options.amount > max {
                return Err(SagaError::InvalidAmount {
                    message: format!("amount {} exceeds the maximum of {}", options.amount, max),
                });
            }
        }

        Ok(())
    }
}
