//! # saga-stripe
//!
//! Stripe intent provider for saga-pay-rs.
//!
//! Creates the two intents a Stripe Elements checkout needs:
//!
//! 1. **PaymentIntent** - collect a payment now (`POST /v1/payment_intents`)
//! 2. **SetupIntent** - save a payment method for later (`POST /v1/setup_intents`)
//!
//! Both are created with automatic payment methods enabled, so the payment
//! methods offered in the widget follow the Stripe Dashboard settings.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use saga_stripe::StripeIntentProvider;
//! use saga_core::{Currency, IntentProvider, PaymentIntentOptions};
//!
//! // Create provider from environment
//! let provider = StripeIntentProvider::from_env()?;
//!
//! // Create a payment intent
//! let intent = provider
//!     .create_payment_intent(&PaymentIntentOptions::new(2000, Currency::USD), None)
//!     .await?;
//!
//! // Hand intent.client_secret to the browser
//! ```

pub mod config;
pub mod intents;

// Re-exports
pub use config::StripeConfig;
pub use intents::StripeIntentProvider;
