//! Outbound request stages. Each stage is a pure `OutboundRequest ->
//! OutboundRequest` step, applied in order before the transport sends the
//! request. Stages cannot fail.

use crate::session::SessionManager;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Method,
};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

/// Transport-agnostic request; `path` is relative to the API base.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl OutboundRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

pub trait RequestStage: Send + Sync {
    fn apply(&self, request: OutboundRequest) -> OutboundRequest;
}

impl<F> RequestStage for F
where
    F: Fn(OutboundRequest) -> OutboundRequest + Send + Sync,
{
    fn apply(&self, request: OutboundRequest) -> OutboundRequest {
        self(request)
    }
}

/// Adds `Authorization: Bearer <credential>` when the session holds one and
/// leaves the request untouched otherwise.
pub struct AttachCredential {
    session: Arc<SessionManager>,
}

impl AttachCredential {
    #[must_use]
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }
}

impl RequestStage for AttachCredential {
    fn apply(&self, mut request: OutboundRequest) -> OutboundRequest {
        let Some(credential) = self.session.credential() else {
            return request;
        };

        match HeaderValue::from_str(&format!("Bearer {}", credential.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            Err(_) => warn!("stored credential is not a valid header value, sending without it"),
        }

        request
    }
}
