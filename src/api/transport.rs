//! HTTP transport used by the pipeline.
//!
//! The transport only moves bytes: it sends an already prepared
//! [`OutboundRequest`] and returns the status and raw body, or a
//! [`TransportError`] when no status was received. Classification happens in
//! the inbound stage. Every request is bounded by [`REQUEST_TIMEOUT`]; there is
//! no cancellation.

use super::{errors::TransportError, middleware::OutboundRequest};
use crate::config::{build_url_with_base, REQUEST_TIMEOUT};
use reqwest::Client;
use std::future::Future;
use tracing::{debug, info_span, Instrument};
use url::Url;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// `reqwest`-backed transport rooted at the resolved API base URL.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// # Errors
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, base_url })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let OutboundRequest {
            method,
            path,
            headers,
            body,
        } = request;
        let url = build_url_with_base(self.base_url.as_str(), &path);

        let span = info_span!("api.request", http.method = %method, url = %url);
        let mut builder = self.client.request(method, &url).headers(headers);
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .instrument(span)
            .await
            .map_err(map_request_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_request_error)?;

        debug!(status, url = %url, "response received");

        Ok(RawResponse { status, body })
    }
}

fn map_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_response_success_range() {
        assert!(RawResponse::new(200, "").is_success());
        assert!(RawResponse::new(204, "").is_success());
        assert!(!RawResponse::new(199, "").is_success());
        assert!(!RawResponse::new(301, "").is_success());
        assert!(!RawResponse::new(401, "").is_success());
    }
}
