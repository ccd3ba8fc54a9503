//! # saga-wasm
//!
//! WebAssembly bindings for the saga-pay-rs intent bridge.
//!
//! Checkout components call `apiRequest` to get a client secret from the
//! backend before mounting the payment widget:
//! - only `body.options` is sent to the endpoint
//! - on failure `emit("verify", {chain: "server intent", error: true, data})`
//!   is called once and the promise resolves to `undefined`
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { apiRequest } from 'saga-wasm';
//!
//! await init();
//!
//! const data = await apiRequest('/create-payment-intent',
//!   { options: { amount: 2000, currency: 'usd' } },
//!   (event, payload) => console.warn(event, payload));
//!
//! if (data) mountWidget(data.secret);
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use saga_bridge::IntentBridge;
use saga_core::{Currency, IntentEnvelope, NotificationEvent, Notifier, VERIFY_EVENT};
use serde::Serialize;
use wasm_bindgen::prelude::*;

type JsonMap = serde_json::Map<String, serde_json::Value>;

/// Forwards notifications to a component's `emit(event, payload)` callback
struct EmitNotifier<'a> {
    emit: &'a js_sys::Function,
}

impl Notifier for EmitNotifier<'_> {
    fn notify(&self, event: NotificationEvent) {
        let payload = match to_js(&event) {
            Ok(payload) => payload,
            Err(err) => {
                web_sys::console::error_1(&err);
                return;
            }
        };

        if let Err(err) = self
            .emit
            .call2(&JsValue::NULL, &JsValue::from_str(VERIFY_EVENT), &payload)
        {
            web_sys::console::error_1(&err);
        }
    }
}

/// Convert to a plain JS object (not a JS `Map`)
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn envelope_from_js(body: JsValue) -> IntentEnvelope<JsonMap> {
    let value = match serde_wasm_bindgen::from_value::<serde_json::Value>(body) {
        Ok(value) => value,
        Err(err) => {
            web_sys::console::warn_2(
                &JsValue::from_str("apiRequest: body is not JSON-compatible, sending {}:"),
                &JsValue::from(err),
            );
            serde_json::Value::Null
        }
    };
    IntentEnvelope::from_json(value)
}

/// Bridge that resolves relative URLs against the current page, as `fetch` does
fn page_bridge() -> IntentBridge {
    let page = web_sys::window()
        .and_then(|window| window.location().href().ok())
        .and_then(|href| url::Url::parse(&href).ok());

    match page {
        Some(base) => IntentBridge::new().with_base_url(base),
        None => IntentBridge::new(),
    }
}

/// POST `body.options` to `url` and resolve to the decoded JSON.
///
/// Failures are reported through `emit` and resolve to `undefined`.
#[wasm_bindgen(js_name = apiRequest)]
pub async fn api_request(url: String, body: JsValue, emit: js_sys::Function) -> JsValue {
    let envelope = envelope_from_js(body);
    let notifier = EmitNotifier { emit: &emit };

    let payload: Option<serde_json::Value> = page_bridge()
        .send_notifying(&url, &envelope, &notifier)
        .await;

    match payload {
        Some(payload) => to_js(&payload).unwrap_or(JsValue::UNDEFINED),
        None => JsValue::UNDEFINED,
    }
}

/// POST `body.options` to `url`; the promise rejects on failure.
#[wasm_bindgen(js_name = sendIntentRequest)]
pub async fn send_intent_request(url: String, body: JsValue) -> Result<JsValue, JsValue> {
    let envelope = envelope_from_js(body);

    let payload: serde_json::Value = page_bridge()
        .send(&url, &envelope)
        .await
        .map_err(|err| JsValue::from(js_sys::Error::new(&err.to_string())))?;

    to_js(&payload)
}

/// Check that a key is a Stripe publishable key
#[wasm_bindgen(js_name = isPublishableKey)]
pub fn is_publishable_key(key: &str) -> bool {
    let rest = key
        .strip_prefix("pk_test_")
        .or_else(|| key.strip_prefix("pk_live_"));

    matches!(rest, Some(rest) if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Format an amount in the smallest currency unit for display
#[wasm_bindgen(js_name = formatAmount)]
pub fn format_amount(amount: i64, currency: &str) -> String {
    match Currency::from_code(currency) {
        Some(currency) => currency.format_amount(amount),
        None => format!("{} {}", amount, currency.to_uppercase()),
    }
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
