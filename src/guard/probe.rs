use crate::api::{ApiError, HttpPipeline, Transport};
use serde::Deserialize;
use std::{future::Future, sync::Arc};

pub const CHECK_INSTALL_PATH: &str = "/check-install";

/// Whether first-time setup has completed. Never cached.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct InstallationState {
    pub installed: bool,
}

pub trait InstallationProbe: Send + Sync {
    /// One remote read, no retry.
    fn check(&self) -> impl Future<Output = Result<InstallationState, ApiError>> + Send;
}

/// Probe issuing `GET <base>/check-install` through the pipeline's request
/// stages. Failures are returned, never reported to the user, and a `401`
/// leaves the session alone.
pub struct HttpInstallationProbe<T: Transport> {
    pipeline: Arc<HttpPipeline<T>>,
}

impl<T: Transport> HttpInstallationProbe<T> {
    #[must_use]
    pub fn new(pipeline: Arc<HttpPipeline<T>>) -> Self {
        Self { pipeline }
    }
}

impl<T: Transport> InstallationProbe for HttpInstallationProbe<T> {
    async fn check(&self) -> Result<InstallationState, ApiError> {
        self.pipeline.get_json_quiet(CHECK_INSTALL_PATH).await
    }
}
