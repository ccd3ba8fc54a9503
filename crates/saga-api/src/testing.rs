//! In-memory provider for router tests.

use crate::state::{AppConfig, AppState};
use async_trait::async_trait;
use chrono::Utc;
use saga_core::{
    IntentKind, IntentPolicy, IntentProvider, IntentSecret, PaymentIntentOptions, SagaError,
    SagaResult, SetupIntentOptions,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub struct MockProvider {
    fail: bool,
    payment_calls: AtomicUsize,
    setup_calls: AtomicUsize,
    keys: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            payment_calls: AtomicUsize::new(0),
            setup_calls: AtomicUsize::new(0),
            keys: Mutex::new(Vec::new()),
        }
    }

    /// Provider whose every call fails with a provider error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn payment_calls(&self) -> usize {
        self.payment_calls.load(Ordering::SeqCst)
    }

    pub fn setup_calls(&self) -> usize {
        self.setup_calls.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }

    fn record(&self, idempotency_key: Option<&str>) -> SagaResult<()> {
        if let Some(key) = idempotency_key {
            self.keys.lock().unwrap().push(key.to_string());
        }
        if self.fail {
            return Err(SagaError::ProviderError {
                provider: "mock".to_string(),
                message: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IntentProvider for MockProvider {
    async fn create_payment_intent(
        &self,
        options: &PaymentIntentOptions,
        idempotency_key: Option<&str>,
    ) -> SagaResult<IntentSecret> {
        self.payment_calls.fetch_add(1, Ordering::SeqCst);
        self.record(idempotency_key)?;

        Ok(IntentSecret {
            id: format!("pi_mock_{}", options.amount),
            kind: IntentKind::Payment,
            client_secret: format!("pi_mock_{}_secret", options.amount),
            status: "requires_payment_method".to_string(),
            amount: Some(options.amount),
            currency: Some(options.currency),
            created_at: Utc::now(),
        })
    }

    async fn create_setup_intent(
        &self,
        _options: &SetupIntentOptions,
        idempotency_key: Option<&str>,
    ) -> SagaResult<IntentSecret> {
        self.setup_calls.fetch_add(1, Ordering::SeqCst);
        self.record(idempotency_key)?;

        Ok(IntentSecret {
            id: "seti_mock".to_string(),
            kind: IntentKind::Setup,
            client_secret: "seti_mock_secret".to_string(),
            status: "requires_payment_method".to_string(),
            amount: None,
            currency: None,
            created_at: Utc::now(),
        })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn publishable_key(&self) -> Option<&str> {
        Some("pk_test_mock")
    }
}

pub fn test_state(provider: Arc<MockProvider>, policy: IntentPolicy) -> AppState {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        policy_path: None,
    };
    AppState::with_provider(provider, policy, config)
}
