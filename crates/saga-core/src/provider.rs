//! # Intent Provider Trait
//!
//! Payment providers implement `IntentProvider` so the intent endpoints can
//! create payment and setup intents without knowing which provider sits
//! behind them.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   IntentProvider (trait)                    │
//! │  ├── create_payment_intent()                                │
//! │  ├── create_setup_intent()                                  │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!                    ┌───────┴───────┐
//!                    │StripeIntent   │
//!                    │   Provider    │
//!                    └───────────────┘
//! ```

use crate::error::SagaResult;
use crate::intent::{IntentSecret, PaymentIntentOptions, SetupIntentOptions};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait IntentProvider: Send + Sync {
    /// Create a payment intent.
    ///
    /// # Arguments
    /// * `options` - Amount, currency and pass-through details
    /// * `idempotency_key` - Key that makes retried requests safe
    async fn create_payment_intent(
        &self,
        options: &PaymentIntentOptions,
        idempotency_key: Option<&str>,
    ) -> SagaResult<IntentSecret>;

    /// Create a setup intent for saving a payment method.
    async fn create_setup_intent(
        &self,
        options: &SetupIntentOptions,
        idempotency_key: Option<&str>,
    ) -> SagaResult<IntentSecret>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;

    /// Publishable key the browser widget is initialised with, if any.
    fn publishable_key(&self) -> Option<&str> {
        None
    }
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedIntentProvider = Arc<dyn IntentProvider>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{Currency, IntentKind};
    use chrono::Utc;

    struct FixedProvider;

    #[async_trait]
    impl IntentProvider for FixedProvider {
        async fn create_payment_intent(
            &self,
            options: &PaymentIntentOptions,
            _idempotency_key: Option<&str>,
        ) -> SagaResult<IntentSecret> {
            Ok(IntentSecret {
                id: "pi_fixed".to_string(),
                kind: IntentKind::Payment,
                client_secret: "pi_fixed_secret".to_string(),
                status: "requires_payment_method".to_string(),
                amount: Some(options.amount),
                currency: Some(options.currency),
                created_at: Utc::now(),
            })
        }

        async fn create_setup_intent(
            &self,
            _options: &SetupIntentOptions,
            _idempotency_key: Option<&str>,
        ) -> SagaResult<IntentSecret> {
            Ok(IntentSecret {
                id: "seti_fixed".to_string(),
                kind: IntentKind::Setup,
                client_secret: "seti_fixed_secret".to_string(),
                status: "requires_payment_method".to_string(),
                amount: None,
                currency: None,
                created_at: Utc::now(),
            })
        }

        fn provider_name(&self) -> &'static str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_boxed_provider() {
        let provider: BoxedIntentProvider = Arc::new(FixedProvider);

        let intent = provider
            .create_payment_intent(&PaymentIntentOptions::new(700, Currency::CAD), None)
            .await
            .unwrap();

        assert_eq!(intent.amount, Some(700));
        assert_eq!(provider.provider_name(), "fixed");
        assert!(provider.publishable_key().is_none());
    }
}
