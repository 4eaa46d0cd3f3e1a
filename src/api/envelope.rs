//! Response envelope `{ success, message, data }` shared by every API call.
//!
//! The console API does not always nest the payload under `data`; many
//! endpoints flatten payload fields next to `success` (for example
//! `{ "installed": true }` or `{ "success": true, "projects": [...] }`). When
//! `data` is missing, the payload is the body object without `success` and
//! `message`.

use serde_json::{Map, Value};

#[derive(Clone, Debug, PartialEq)]
pub struct ResponseEnvelope {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub payload: Value,
}

impl ResponseEnvelope {
    #[must_use]
    pub fn from_body(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return Self {
                success: None,
                message: None,
                payload: body,
            };
        };

        let success = fields.remove("success").and_then(|value| value.as_bool());
        let message = fields
            .remove("message")
            .and_then(|value| value.as_str().map(str::to_string))
            .filter(|message| !message.trim().is_empty());
        let payload = match fields.remove("data") {
            Some(data) => data,
            None => Value::Object(fields),
        };

        Self {
            success,
            message,
            payload,
        }
    }

    /// Only an explicit `success: false` marks an application error.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// Splits the envelope into its payload or the server message of a failure.
    ///
    /// # Errors
    /// Returns the optional server message when `success` is `false`.
    pub fn into_payload(self) -> Result<Value, Option<String>> {
        if self.is_failure() {
            Err(self.message)
        } else {
            Ok(self.payload)
        }
    }
}

/// Extracts a non-empty `message` from an error body, if it is an envelope.
#[must_use]
pub fn server_message(body: &str) -> Option<String> {
    let fields: Map<String, Value> = serde_json::from_str(body).ok()?;
    fields
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}
