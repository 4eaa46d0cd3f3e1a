//! HTTP pipeline wrapping every outbound API call.
//!
//! Flow Overview:
//! - Request stages run in order; [`AttachCredential`] is always first.
//! - The [`Transport`] sends the prepared request (30 s upper bound).
//! - The [`InboundStage`] classifies the outcome, performs its side effects
//!   and unwraps the envelope payload.
//!
//! [`HttpPipeline::send_quiet`] skips the side effects and only classifies;
//! the installation probe uses it so a guard evaluation never notifies or
//! tears the session down.
//!
//! Concurrent calls are independent. Several calls may each observe a `401`
//! and each clear the (already cleared) session and force navigation; this is
//! idempotent and not deduplicated.

mod envelope;
mod errors;
mod inbound;
mod middleware;
mod transport;

pub use envelope::{server_message, ResponseEnvelope};
pub use errors::{ApiError, TransportError};
pub use inbound::{
    classify, InboundStage, NETWORK_ERROR_MESSAGE, REQUEST_FAILED_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
pub use middleware::{AttachCredential, OutboundRequest, RequestStage};
pub use reqwest::Method;
pub use transport::{HttpTransport, RawResponse, Transport};

use crate::{
    config::LOGIN_PATH,
    navigation::{Navigator, Notifier},
    session::SessionManager,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

pub struct HttpPipeline<T: Transport> {
    transport: T,
    stages: Vec<Box<dyn RequestStage>>,
    inbound: InboundStage,
}

impl<T: Transport> HttpPipeline<T> {
    #[must_use]
    pub fn new(
        transport: T,
        session: Arc<SessionManager>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let stages: Vec<Box<dyn RequestStage>> =
            vec![Box::new(AttachCredential::new(session.clone()))];
        Self {
            transport,
            stages,
            inbound: InboundStage::new(session, notifier, navigator, LOGIN_PATH),
        }
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Appends a request stage after the existing ones.
    #[must_use]
    pub fn with_stage(mut self, stage: impl RequestStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Runs the request stages in order.
    #[must_use]
    pub fn prepare(&self, request: OutboundRequest) -> OutboundRequest {
        self.stages
            .iter()
            .fold(request, |request, stage| stage.apply(request))
    }

    /// Sends a request through every stage and returns the unwrapped payload.
    ///
    /// # Errors
    /// Returns the classified failure; see [`InboundStage::handle`].
    pub async fn send(&self, request: OutboundRequest) -> Result<Value, ApiError> {
        let request = self.prepare(request);
        debug!(method = %request.method, path = %request.path, "sending request");
        let outcome = self.transport.send(request).await;
        self.inbound.handle(outcome)
    }

    /// Like [`Self::send`], but the outcome is only classified: no
    /// notification, no session teardown, no forced navigation.
    ///
    /// # Errors
    /// Returns the classified failure.
    pub async fn send_quiet(&self, request: OutboundRequest) -> Result<Value, ApiError> {
        let request = self.prepare(request);
        debug!(method = %request.method, path = %request.path, "sending quiet request");
        classify(self.transport.send(request).await)
    }

    /// # Errors
    /// Returns the classified failure, or a parse error if the payload does not match `R`.
    pub async fn get_json_quiet<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        decode(self.send_quiet(OutboundRequest::new(Method::GET, path)).await?)
    }

    /// # Errors
    /// Returns the classified failure.
    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(OutboundRequest::new(Method::GET, path)).await
    }

    /// # Errors
    /// Returns an error if the body cannot be encoded or the call fails.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let request = OutboundRequest::new(Method::POST, path).with_body(encode(body)?);
        self.send(request).await
    }

    /// # Errors
    /// Returns an error if the body cannot be encoded or the call fails.
    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let request = OutboundRequest::new(Method::PUT, path).with_body(encode(body)?);
        self.send(request).await
    }

    /// # Errors
    /// Returns the classified failure.
    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.send(OutboundRequest::new(Method::DELETE, path)).await
    }

    /// Fetches and decodes the payload into `R`.
    ///
    /// # Errors
    /// Returns the classified failure, or a parse error if the payload does not match `R`.
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        decode(self.get(path).await?)
    }

    /// Posts `body` and decodes the payload into `R`.
    ///
    /// # Errors
    /// Returns the classified failure, or a parse error if the payload does not match `R`.
    pub async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ApiError> {
        decode(self.post(path, body).await?)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))
}

fn decode<R: DeserializeOwned>(payload: Value) -> Result<R, ApiError> {
    serde_json::from_value(payload)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}
