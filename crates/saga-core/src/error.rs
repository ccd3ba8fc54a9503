//! # Error Types
//!
//! Typed error handling for saga-pay-rs.
//! All intent operations return `Result<T, SagaError>`.

use thiserror::Error;

/// Core error type for intent requests and intent creation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SagaError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Amount rejected by the intent policy
    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    /// Currency not supported
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error talking to an endpoint
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl SagaError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            SagaError::Configuration(_) => 500,
            SagaError::InvalidRequest(_) => 400,
            SagaError::InvalidAmount { .. } => 400,
            SagaError::UnsupportedCurrency { .. } => 400,
            SagaError::ProviderError { .. } => 502,
            SagaError::NetworkError(_) => 503,
            SagaError::Serialization(_) => 500,
            SagaError::Internal(_) => 500,
        }
    }

    /// Stable machine-readable tag, used in notification payloads
    pub fn kind(&self) -> &'static str {
        match self {
            SagaError::Configuration(_) => "configuration",
            SagaError::InvalidRequest(_) => "invalid_request",
            SagaError::InvalidAmount { .. } => "invalid_amount",
            SagaError::UnsupportedCurrency { .. } => "unsupported_currency",
            SagaError::ProviderError { .. } => "provider_error",
            SagaError::NetworkError(_) => "network_error",
            SagaError::Serialization(_) => "serialization",
            SagaError::Internal(_) => "internal",
        }
    }
}

impl From<serde_json::Error> for SagaError {
    fn from(err: serde_json::Error) -> Self {
        SagaError::Serialization(err.to_string())
    }
}

/// Result type alias for intent operations
pub type SagaResult<T> = Result<T, SagaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SagaError::InvalidRequest("test".into()).status_code(), 400);
        assert_eq!(
            SagaError::UnsupportedCurrency {
                currency: "xyz".into()
            }
            .status_code(),
            400
        );
        assert_eq!(
            SagaError::ProviderError {
                provider: "stripe".into(),
                message: "card_declined".into()
            }
            .status_code(),
            502
        );
        assert_eq!(SagaError::NetworkError("refused".into()).status_code(), 503);
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(SagaError::NetworkError("x".into()).kind(), "network_error");
        assert_eq!(SagaError::Serialization("x".into()).kind(), "serialization");
    }

    #[test]
    fn test_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let saga: SagaError = err.into();
        assert!(matches!(saga, SagaError::Serialization(_)));
    }
}
