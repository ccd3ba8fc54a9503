//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the intent provider, the intent policy and configuration.

use anyhow::Context;
use saga_core::{BoxedIntentProvider, IntentPolicy};
use saga_stripe::StripeIntentProvider;
use std::net::SocketAddr;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit intent policy file (`INTENT_POLICY_PATH`)
    pub policy_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4242),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            policy_path: std::env::var("INTENT_POLICY_PATH").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Provider that creates the intents
    pub provider: BoxedIntentProvider,
    /// Limits checked before the provider is called
    pub policy: IntentPolicy,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by Stripe
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let policy = load_intent_policy(config.policy_path.as_deref())?;

        let provider = StripeIntentProvider::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(Arc::new(provider), policy, config))
    }

    /// Create state around an existing provider
    pub fn with_provider(
        provider: BoxedIntentProvider,
        policy: IntentPolicy,
        config: AppConfig,
    ) -> Self {
        Self {
            provider,
            policy,
            config,
        }
    }
}

/// Load the intent policy.
///
/// An explicit path must exist. Without one, the usual config locations are
/// tried and the default policy is used when none is found.
pub fn load_intent_policy(explicit_path: Option<&str>) -> anyhow::Result<IntentPolicy> {
    if let Some(path) = explicit_path {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read intent policy {}", path))?;
        return IntentPolicy::from_toml_str(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path, e));
    }

    let config_paths = [
        "config/intents.toml",
        "../config/intents.toml",
        "../../config/intents.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let policy = IntentPolicy::from_toml_str(&content)
                .map_err(|e| anyhow::anyhow!("{}: {}", path, e))?;
            tracing::info!("Loaded intent policy from {}", path);
            return Ok(policy);
        }
    }

    tracing::warn!("No intent policy found, using defaults");
    Ok(IntentPolicy::default())
}
