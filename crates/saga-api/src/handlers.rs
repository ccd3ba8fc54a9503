//! # Request Handlers
//!
//! Axum request handlers for the intent endpoints.
//! Each endpoint creates an intent through the configured provider and
//! returns only its client secret.

use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use saga_core::{
    ClientSecretResponse, Currency, PaymentIntentOptions, SagaError, SetupIntentOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{error, info, instrument};
use uuid::Uuid;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Payment intent request body.
///
/// The currency stays a plain code here so an unknown one is reported as
/// `unsupported_currency` rather than as a body decoding error.
#[derive(Debug, Deserialize)]
pub struct PaymentIntentRequest {
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl TryFrom<PaymentIntentRequest> for PaymentIntentOptions {
    type Error = SagaError;

    fn try_from(request: PaymentIntentRequest) -> Result<Self, Self::Error> {
        let currency =
            Currency::from_code(&request.currency).ok_or(SagaError::UnsupportedCurrency {
                currency: request.currency.to_lowercase(),
            })?;

        Ok(Self {
            amount: request.amount,
            currency,
            description: request.description,
            metadata: request.metadata,
        })
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type HandlerError = (StatusCode, Json<ErrorResponse>);

fn saga_error_to_response(err: SagaError) -> HandlerError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code).with_details(err.kind());
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn json_rejection_to_response(rejection: JsonRejection) -> HandlerError {
    saga_error_to_response(SagaError::InvalidRequest(rejection.body_text()))
}

/// Idempotency key from the request, or a fresh one
fn idempotency_key(headers: &HeaderMap) -> String {
    headers
        .get("idempotency-key")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "saga-pay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Publishable key and provider for initialising the widget
pub async fn client_config(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "provider": state.provider.provider_name(),
        "publishable_key": state.provider.publishable_key(),
    }))
}

/// Create a payment intent
///
/// Every rejection, including a body that does not decode, is answered with
/// an [`ErrorResponse`].
#[instrument(skip(state, headers, body))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<PaymentIntentRequest>, JsonRejection>,
) -> Result<Json<ClientSecretResponse>, HandlerError> {
    let Json(request) = body.map_err(json_rejection_to_response)?;
    let options = PaymentIntentOptions::try_from(request).map_err(saga_error_to_response)?;

    state
        .policy
        .check_payment(&options)
        .map_err(saga_error_to_response)?;

    let key = idempotency_key(&headers);

    info!(
        "Creating payment intent: {} via {}",
        options.display_amount(),
        state.provider.provider_name()
    );

    let intent = state
        .provider
        .create_payment_intent(&options, Some(&key))
        .await
        .map_err(|e| {
            error!("Failed to create payment intent: {}", e);
            saga_error_to_response(e)
        })?;

    info!("Created payment intent: {}", intent.id);

    Ok(Json(intent.into()))
}

/// Create a setup intent
///
/// The body is optional; an empty body is treated as `{}`.
#[instrument(skip(state, headers, body))]
pub async fn create_setup_intent(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ClientSecretResponse>, HandlerError> {
    let options: SetupIntentOptions = if body.iter().all(u8::is_ascii_whitespace) {
        SetupIntentOptions::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            saga_error_to_response(SagaError::InvalidRequest(format!(
                "Invalid setup intent options: {}",
                e
            )))
        })?
    };

    let key = idempotency_key(&headers);

    let intent = state
        .provider
        .create_setup_intent(&options, Some(&key))
        .await
        .map_err(|e| {
            error!("Failed to create setup intent: {}", e);
            saga_error_to_response(e)
        })?;

    info!("Created setup intent: {}", intent.id);

    Ok(Json(intent.into()))
}
