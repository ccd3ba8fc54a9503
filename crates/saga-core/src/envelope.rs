//! # Request Envelope
//!
//! Wrapper handed to the intent bridge. Only `options` is transmitted;
//! anything else a caller packs next to it is dropped when the envelope is
//! deserialized and never reaches the wire.

use crate::error::SagaResult;
use serde::{Deserialize, Serialize};

/// Request wrapper whose `options` field is the request body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentEnvelope<O> {
    /// Body forwarded to the endpoint
    #[serde(default)]
    pub options: O,
}

impl<O> IntentEnvelope<O> {
    pub fn new(options: O) -> Self {
        Self { options }
    }

    /// Borrow the body that will be transmitted
    pub fn options(&self) -> &O {
        &self.options
    }

    /// Unwrap the envelope
    pub fn into_options(self) -> O {
        self.options
    }
}

impl<O: Serialize> IntentEnvelope<O> {
    /// The JSON object put on the wire.
    ///
    /// Options that do not serialize to an object (a missing open-JSON
    /// `options` defaults to `null`) are sent as `{}`.
    pub fn body(&self) -> SagaResult<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(&self.options)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(serde_json::Map::new()),
        }
    }
}

impl IntentEnvelope<serde_json::Map<String, serde_json::Value>> {
    /// Build an envelope from an arbitrary JSON value.
    ///
    /// A missing or non-object `options` yields an empty body.
    pub fn from_json(value: serde_json::Value) -> Self {
        let options = match value {
            serde_json::Value::Object(mut outer) => match outer.remove("options") {
                Some(serde_json::Value::Object(options)) => options,
                _ => serde_json::Map::new(),
            },
            _ => serde_json::Map::new(),
        };
        Self { options }
    }
}
