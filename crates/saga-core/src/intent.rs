//! # Intent Types
//!
//! Option payloads sent to the intent endpoints and the intent records
//! returned by a provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    MXN,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
            Currency::EUR => "eur",
            Currency::GBP => "gbp",
            Currency::JPY => "jpy",
            Currency::CAD => "cad",
            Currency::AUD => "aud",
            Currency::CHF => "chf",
            Currency::MXN => "mxn",
        }
    }

    /// Parse a currency code, ignoring case
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_lowercase().as_str() {
            "usd" => Some(Currency::USD),
            "eur" => Some(Currency::EUR),
            "gbp" => Some(Currency::GBP),
            "jpy" => Some(Currency::JPY),
            "cad" => Some(Currency::CAD),
            "aud" => Some(Currency::AUD),
            "chf" => Some(Currency::CHF),
            "mxn" => Some(Currency::MXN),
            _ => None,
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Format an amount in the smallest unit for display (e.g. "$10.00")
    pub fn format_amount(&self, amount: i64) -> String {
        let symbol = match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::JPY => "¥",
            Currency::CAD => "C$",
            Currency::AUD => "A$",
            Currency::CHF => "CHF ",
            Currency::MXN => "MX$",
        };
        if self.decimal_places() == 0 {
            format!("{}{}", symbol, amount)
        } else {
            format!("{}{:.2}", symbol, amount as f64 / 100.0)
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Which kind of intent an endpoint creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    /// Collect a payment now
    Payment,
    /// Save a payment method for later
    Setup,
}

impl IntentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentKind::Payment => "payment",
            IntentKind::Setup => "setup",
        }
    }

    /// Conventional route of the backend endpoint creating this kind
    pub fn route(&self) -> &'static str {
        match self {
            IntentKind::Payment => "/create-payment-intent",
            IntentKind::Setup => "/create-setup-intent",
        }
    }
}

/// Options for creating a payment intent
///
/// Sent as the request body to `POST /create-payment-intent`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntentOptions {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: i64,

    /// Currency
    pub currency: Currency,

    /// Description shown in the provider dashboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Custom metadata passed through to the provider
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

impl PaymentIntentOptions {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self {
            amount,
            currency,
            description: None,
            metadata: HashMap::new(),
        }
    }

    /// Builder: set description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder: add metadata
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Amount formatted for display
    pub fn display_amount(&self) -> String {
        self.currency.format_amount(self.amount)
    }
}

/// How a saved payment method will be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetupUsage {
    OnSession,
    OffSession,
}

impl SetupUsage {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetupUsage::OnSession => "on_session",
            SetupUsage::OffSession => "off_session",
        }
    }
}

/// Options for creating a setup intent
///
/// Every field is optional; `{}` is a valid request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupIntentOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<SetupUsage>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// An intent created by a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentSecret {
    /// Provider intent ID (pi_... / seti_...)
    pub id: String,

    pub kind: IntentKind,

    /// Secret handed to the browser to confirm the intent
    pub client_secret: String,

    /// Provider status (e.g. "requires_payment_method")
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    pub created_at: DateTime<Utc>,
}

/// Response body of the intent endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecretResponse {
    pub secret: String,
}

impl From<IntentSecret> for ClientSecretResponse {
    fn from(intent: IntentSecret) -> Self {
        Self {
            secret: intent.client_secret,
        }
    }
}
