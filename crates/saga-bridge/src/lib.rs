//! # saga-bridge
//!
//! Client-side bridge between a checkout component and a backend intent
//! endpoint.
//!
//! The bridge POSTs the `options` of an [`IntentEnvelope`] as JSON and
//! decodes whatever JSON comes back. It makes exactly one attempt: no
//! retries, no timeout, no cancellation. Wrap calls externally (for example
//! with `tokio::time::timeout`) when a deadline is needed.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use saga_bridge::IntentBridge;
//! use saga_core::{ClientSecretResponse, Currency, IntentEnvelope, LoggingNotifier, PaymentIntentOptions};
//!
//! let bridge = IntentBridge::new();
//! let envelope = IntentEnvelope::new(PaymentIntentOptions::new(2000, Currency::USD));
//!
//! // Explicit result
//! let secret: ClientSecretResponse = bridge.send("/create-payment-intent", &envelope).await?;
//!
//! // Or report failures to a notifier and get `None` back
//! let secret: Option<ClientSecretResponse> = bridge
//!     .send_notifying("/create-payment-intent", &envelope, &LoggingNotifier)
//!     .await;
//! ```

use reqwest::Client;
use saga_core::{IntentEnvelope, NotificationEvent, Notifier, SagaError, SagaResult};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// Posts intent options to a backend endpoint
#[derive(Debug, Clone, Default)]
pub struct IntentBridge {
    client: Client,
    /// Relative URLs are joined onto this (the page URL in a browser)
    base_url: Option<Url>,
}

impl IntentBridge {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    /// Use an existing HTTP client (shares its connection pool)
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            base_url: None,
        }
    }

    /// Builder: resolve relative URLs such as `/create-payment-intent`
    /// against `base_url`
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Absolute URLs pass through; relative ones need a base URL
    pub fn resolve(&self, url: &str) -> SagaResult<Url> {
        match Url::parse(url) {
            Ok(absolute) => Ok(absolute),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base
                    .join(url)
                    .map_err(|e| SagaError::InvalidRequest(format!("Invalid URL {}: {}", url, e))),
                None => Err(SagaError::InvalidRequest(format!(
                    "Relative URL {} needs a base URL",
                    url
                ))),
            },
            Err(e) => Err(SagaError::InvalidRequest(format!("Invalid URL {}: {}", url, e))),
        }
    }

    /// Send `envelope.options` to `url` and decode the JSON response.
    ///
    /// The body is always a JSON object; options that are not one are sent
    /// as `{}`. The response is decoded whatever its HTTP status; a non-2xx
    /// reply with a JSON body is returned as `Ok`.
    ///
    /// # Errors
    /// * `SagaError::InvalidRequest` - `url` is malformed, or relative with no base URL
    /// * `SagaError::NetworkError` - the request could not be sent or the body read
    /// * `SagaError::Serialization` - the options could not be encoded or the body is not JSON
    #[instrument(skip(self, envelope))]
    pub async fn send<O, R>(&self, url: &str, envelope: &IntentEnvelope<O>) -> SagaResult<R>
    where
        O: Serialize,
        R: DeserializeOwned,
    {
        let target = self.resolve(url)?;
        let body = serde_json::to_vec(&envelope.body()?)?;

        let response = self
            .client
            .post(target)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| SagaError::NetworkError(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SagaError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            debug!("Intent endpoint replied with status {}", status);
        }

        serde_json::from_str(&text).map_err(|e| {
            SagaError::Serialization(format!("Failed to parse intent response: {}", e))
        })
    }

    /// Like [`send`](Self::send), but a failure is reported once to
    /// `notifier` as a `"server intent"` event and `None` is returned.
    /// Nothing is reported on success.
    pub async fn send_notifying<O, R, N>(
        &self,
        url: &str,
        envelope: &IntentEnvelope<O>,
        notifier: &N,
    ) -> Option<R>
    where
        O: Serialize,
        R: DeserializeOwned,
        N: Notifier + ?Sized,
    {
        match self.send(url, envelope).await {
            Ok(payload) => Some(payload),
            Err(err) => {
                notifier.notify(NotificationEvent::server_intent(&err));
                None
            }
        }
    }
}
