//! # saga-core
//!
//! Core types and traits for saga-pay-rs.
//!
//! This crate provides:
//! - `IntentEnvelope` and the per-call-site option types sent to intent endpoints
//! - `NotificationEvent` and the `Notifier` trait for out-of-band failure reports
//! - `IntentProvider` trait for implementing payment providers
//! - `IntentPolicy` for server-side request checks
//! - `SagaError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use saga_core::{Currency, IntentEnvelope, PaymentIntentOptions};
//!
//! // Only `options` is forwarded to the endpoint
//! let envelope = IntentEnvelope::new(PaymentIntentOptions::new(2000, Currency::USD));
//!
//! // Server side: hand the options to a provider
//! let intent = provider.create_payment_intent(envelope.options(), None).await?;
//!
//! // Return intent.client_secret to the browser
//! ```

pub mod envelope;
pub mod error;
pub mod intent;
pub mod notify;
pub mod policy;
pub mod provider;

// Re-exports for convenience
pub use envelope::IntentEnvelope;
pub use error::{SagaError, SagaResult};
pub use intent::{
    ClientSecretResponse, Currency, IntentKind, IntentSecret, PaymentIntentOptions,
    SetupIntentOptions, SetupUsage,
};
pub use notify::{
    LoggingNotifier, NotificationEvent, Notifier, RecordingNotifier, SERVER_INTENT_CHAIN,
    VERIFY_EVENT,
};
pub use policy::IntentPolicy;
pub use provider::{BoxedIntentProvider, IntentProvider};
