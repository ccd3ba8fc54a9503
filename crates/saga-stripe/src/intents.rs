//! # Stripe Intents
//!
//! Implementation of the Stripe PaymentIntents and SetupIntents APIs.
//! The client secret of the created intent is what the browser widget
//! needs to confirm the payment or save the card.

use crate::config::StripeConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use saga_core::{
    Currency, IntentKind, IntentProvider, IntentSecret, PaymentIntentOptions, SagaError,
    SagaResult, SetupIntentOptions,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, error, info, instrument};

/// Stripe intent provider
///
/// Creates PaymentIntents and SetupIntents with automatic payment methods
/// enabled.
pub struct StripeIntentProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeIntentProvider {
    /// Create a new Stripe intent provider
    pub fn new(config: StripeConfig) -> SagaResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                SagaError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> SagaResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Form parameters for `POST /v1/payment_intents`
    fn payment_form(options: &PaymentIntentOptions) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), options.amount.to_string()),
            ("currency".to_string(), options.currency.as_str().to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];

        if let Some(ref description) = options.description {
            form_params.push(("description".to_string(), description.clone()));
        }

        push_metadata(&mut form_params, &options.metadata);
        form_params
    }

    /// Form parameters for `POST /v1/setup_intents`
    fn setup_form(options: &SetupIntentOptions) -> Vec<(String, String)> {
        let mut form_params: Vec<(String, String)> = vec![(
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        )];

        if let Some(usage) = options.usage {
            form_params.push(("usage".to_string(), usage.as_str().to_string()));
        }

        push_metadata(&mut form_params, &options.metadata);
        form_params
    }

    /// POST form data to a Stripe endpoint and parse the intent it returns
    async fn post_intent(
        &self,
        path: &str,
        kind: IntentKind,
        form_params: &[(String, String)],
        idempotency_key: Option<&str>,
    ) -> SagaResult<IntentSecret> {
        let url = format!("{}{}", self.config.api_base_url, path);

        let mut request = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(form_params);

        if let Some(key) = idempotency_key {
            request = request.header("Idempotency-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SagaError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SagaError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            // Parse Stripe error
            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(SagaError::ProviderError {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(SagaError::ProviderError {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let intent: StripeIntentResponse = serde_json::from_str(&body).map_err(|e| {
            SagaError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let client_secret = intent.client_secret.ok_or_else(|| SagaError::ProviderError {
            provider: "stripe".to_string(),
            message: format!("{} has no client_secret", intent.id),
        })?;

        info!(
            "Created Stripe {} intent: id={}, status={}",
            kind.as_str(),
            intent.id,
            intent.status
        );

        Ok(IntentSecret {
            id: intent.id,
            kind,
            client_secret,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency.as_deref().and_then(Currency::from_code),
            created_at: DateTime::from_timestamp(intent.created, 0).unwrap_or_else(Utc::now),
        })
    }
}

#[async_trait]
impl IntentProvider for StripeIntentProvider {
    #[instrument(skip(self, options), fields(amount = options.amount, currency = %options.currency))]
    async fn create_payment_intent(
        &self,
        options: &PaymentIntentOptions,
        idempotency_key: Option<&str>,
    ) -> SagaResult<IntentSecret> {
        if options.amount <= 0 {
            return Err(SagaError::InvalidAmount {
                message: "amount must be positive".to_string(),
            });
        }

        debug!(
            "Creating Stripe payment intent: {}",
            options.display_amount()
        );

        let form_params = Self::payment_form(options);
        self.post_intent(
            "/v1/payment_intents",
            IntentKind::Payment,
            &form_params,
            idempotency_key,
        )
        .await
    }

    #[instrument(skip(self, options))]
    async fn create_setup_intent(
        &self,
        options: &SetupIntentOptions,
        idempotency_key: Option<&str>,
    ) -> SagaResult<IntentSecret> {
        debug!("Creating Stripe setup intent: usage={:?}", options.usage);

        let form_params = Self::setup_form(options);
        self.post_intent(
            "/v1/setup_intents",
            IntentKind::Setup,
            &form_params,
            idempotency_key,
        )
        .await
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }

    fn publishable_key(&self) -> Option<&str> {
        Some(&self.config.publishable_key)
    }
}

fn push_metadata(form_params: &mut Vec<(String, String)>, metadata: &HashMap<String, String>) {
    let sorted: BTreeMap<_, _> = metadata.iter().collect();
    for (key, value) in sorted {
        form_params.push((format!("metadata[{}]", key), value.clone()));
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeIntentResponse {
    id: String,
    #[serde(default)]
    client_secret: Option<String>,
    status: String,
    #[serde(default)]
    amount: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
    created: i64,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
    #[serde(default)]
    #[allow(dead_code)]
    code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use saga_core::SetupUsage;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> StripeIntentProvider {
        let config =
            StripeConfig::new("sk_test_abc", "pk_test_xyz").with_api_base_url(server.uri());
        StripeIntentProvider::new(config).unwrap()
    }

    #[test]
    fn test_payment_form() {
        let options = PaymentIntentOptions::new(2000, Currency::EUR)
            .with_description("Order 42")
            .with_metadata("order_id", "42")
            .with_metadata("cart", "a1");

        let form = StripeIntentProvider::payment_form(&options);

        assert_eq!(form[0], ("amount".to_string(), "2000".to_string()));
        assert_eq!(form[1], ("currency".to_string(), "eur".to_string()));
        assert!(form.contains(&(
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string()
        )));
        assert!(form.contains(&("description".to_string(), "Order 42".to_string())));
        // Metadata is emitted in key order
        let metadata: Vec<_> = form
            .iter()
            .filter(|(k, _)| k.starts_with("metadata["))
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(metadata, vec!["metadata[cart]", "metadata[order_id]"]);
    }

    #[test]
    fn test_setup_form() {
        let form = StripeIntentProvider::setup_form(&SetupIntentOptions::default());
        assert_eq!(form.len(), 1);

        let options = SetupIntentOptions {
            usage: Some(SetupUsage::OffSession),
            ..Default::default()
        };
        let form = StripeIntentProvider::setup_form(&options);
        assert!(form.contains(&("usage".to_string(), "off_session".to_string())));
    }

    #[tokio::test]
    async fn test_create_payment_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("Authorization", "Bearer sk_test_abc"))
            .and(header("Stripe-Version", "2024-12-18.acacia"))
            .and(header("Idempotency-Key", "key-1"))
            .and(body_string_contains("amount=2000"))
            .and(body_string_contains("currency=usd"))
            .and(body_string_contains("automatic_payment_methods%5Benabled%5D=true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "pi_123",
                "object": "payment_intent",
                "client_secret": "pi_123_secret_456",
                "status": "requires_payment_method",
                "amount": 2000,
                "currency": "usd",
                "created": 1_700_000_000
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = provider_for(&server)
            .create_payment_intent(&PaymentIntentOptions::new(2000, Currency::USD), Some("key-1"))
            .await
            .unwrap();

        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.kind, IntentKind::Payment);
        assert_eq!(intent.client_secret, "pi_123_secret_456");
        assert_eq!(intent.amount, Some(2000));
        assert_eq!(intent.currency, Some(Currency::USD));
        assert_eq!(intent.created_at.timestamp(), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_create_setup_intent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/setup_intents"))
            .and(body_string_contains("automatic_payment_methods%5Benabled%5D=true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "seti_123",
                "object": "setup_intent",
                "client_secret": "seti_123_secret_456",
                "status": "requires_payment_method",
                "created": 1_700_000_000
            })))
            .mount(&server)
            .await;

        let intent = provider_for(&server)
            .create_setup_intent(&SetupIntentOptions::default(), None)
            .await
            .unwrap();

        assert_eq!(intent.kind, IntentKind::Setup);
        assert_eq!(intent.client_secret, "seti_123_secret_456");
        assert_eq!(intent.amount, None);
    }

    #[tokio::test]
    async fn test_stripe_error_message_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {
                    "type": "invalid_request_error",
                    "code": "amount_too_small",
                    "message": "Amount must be at least $0.50 usd"
                }
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .create_payment_intent(&PaymentIntentOptions::new(10, Currency::USD), None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SagaError::ProviderError {
                provider: "stripe".to_string(),
                message: "Amount must be at least $0.50 usd".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("gateway down"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .create_setup_intent(&SetupIntentOptions::default(), None)
            .await
            .unwrap_err();

        match err {
            SagaError::ProviderError { message, .. } => assert!(message.contains("gateway down")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_is_rejected_locally() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .create_payment_intent(&PaymentIntentOptions::new(0, Currency::USD), None)
            .await
            .unwrap_err();

        assert!(matches!(err, SagaError::InvalidAmount { .. }));
    }

    #[test]
    fn test_publishable_key() {
        let provider =
            StripeIntentProvider::new(StripeConfig::new("sk_test_abc", "pk_test_xyz")).unwrap();
        assert_eq!(provider.publishable_key(), Some("pk_test_xyz"));
        assert_eq!(provider.provider_name(), "stripe");
    }
}
