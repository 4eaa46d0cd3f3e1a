//! Inbound classification of every transport outcome.
//!
//! | outcome                         | side effects                                  | result          |
//! |---------------------------------|-----------------------------------------------|-----------------|
//! | status 401                      | clear session, notify, force `/login`         | `Unauthorized`  |
//! | other non-2xx                   | notify (server message or fallback)           | `Http`          |
//! | no status (network, timeout)    | notify fallback                               | `Network`/`Timeout` |
//! | 2xx, body not JSON              | notify fallback                               | `Parse`         |
//! | 2xx, `success: false`           | notify (server message or fallback)           | `Application`   |
//! | 2xx otherwise                   | none                                          | payload         |
//!
//! Side effects on 401 are ordered: the session is cleared before the
//! notification, and the notification is emitted before the navigation.
//!
//! [`classify`] alone produces the result column without any side effect.

use super::{
    envelope::{server_message, ResponseEnvelope},
    errors::{ApiError, TransportError},
    transport::RawResponse,
};
use crate::{
    navigation::{Navigator, Notifier},
    session::SessionManager,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error";

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

pub struct InboundStage {
    session: Arc<SessionManager>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
    login_path: String,
}

impl InboundStage {
    #[must_use]
    pub fn new(
        session: Arc<SessionManager>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            session,
            notifier,
            navigator,
            login_path: login_path.into(),
        }
    }

    /// Classifies one outcome, performing its side effects.
    ///
    /// # Errors
    /// Returns the classified failure for every outcome except a successful envelope.
    pub fn handle(&self, outcome: Result<RawResponse, TransportError>) -> Result<Value, ApiError> {
        classify(outcome).map_err(|err| {
            self.react(&err);
            err
        })
    }

    fn react(&self, err: &ApiError) {
        match err {
            ApiError::Unauthorized { .. } => {
                warn!("credential rejected, tearing down session");
                self.session.clear();
                self.notifier.error(SESSION_EXPIRED_MESSAGE);
                self.navigator.force_to(&self.login_path);
            }
            ApiError::Http { message, .. } | ApiError::Application(message) => {
                self.notifier.error(message);
            }
            ApiError::Network(_) | ApiError::Timeout(_) => {
                self.notifier.error(NETWORK_ERROR_MESSAGE);
            }
            ApiError::Parse(_) | ApiError::Serialization(_) => {
                self.notifier.error(REQUEST_FAILED_MESSAGE);
            }
        }
    }
}

/// Maps an outcome to the unwrapped payload or the classified failure.
///
/// # Errors
/// Returns the classified failure for every outcome except a successful envelope.
pub fn classify(outcome: Result<RawResponse, TransportError>) -> Result<Value, ApiError> {
    let response = match outcome {
        Ok(response) => response,
        Err(err) => {
            warn!("request failed before a response: {err}");
            return Err(err.into());
        }
    };

    if response.status == 401 {
        return Err(ApiError::Unauthorized {
            message: server_message(&response.body)
                .unwrap_or_else(|| UNAUTHORIZED_MESSAGE.to_string()),
        });
    }

    if !response.is_success() {
        warn!(status = response.status, "request rejected by server");
        return Err(ApiError::Http {
            status: response.status,
            message: server_message(&response.body)
                .unwrap_or_else(|| NETWORK_ERROR_MESSAGE.to_string()),
        });
    }

    let body = parse_body(&response.body).map_err(|err| {
        warn!(status = response.status, "malformed response body: {err}");
        ApiError::Parse(format!("Failed to decode response: {err}"))
    })?;

    ResponseEnvelope::from_body(body)
        .into_payload()
        .map_err(|message| {
            let message = message.unwrap_or_else(|| REQUEST_FAILED_MESSAGE.to_string());
            debug!("application error: {message}");
            ApiError::Application(message)
        })
}

fn parse_body(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str(body)
    }
}
