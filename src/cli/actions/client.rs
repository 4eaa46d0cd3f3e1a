use crate::{
    api::{HttpPipeline, HttpTransport},
    cli::globals::GlobalArgs,
    navigation::{ConsoleNavigator, ConsoleNotifier},
    session::{FileStore, SessionManager},
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

/// Collaborators wired once per process and shared by reference.
pub struct Client {
    pub session: Arc<SessionManager>,
    pub navigator: Arc<ConsoleNavigator>,
    pub pipeline: Arc<HttpPipeline<HttpTransport>>,
}

impl Client {
    /// # Errors
    /// Returns an error if the API base cannot be resolved or the HTTP client fails to build.
    pub fn connect(globals: &GlobalArgs) -> Result<Self> {
        let session = Arc::new(open_session(globals));
        let base_url = globals
            .config
            .api_url()
            .with_context(|| format!("invalid API base URL: {}", globals.config.api_base_url))?;
        debug!(base_url = %base_url, "resolved API base");

        let transport = HttpTransport::new(base_url).context("failed to build HTTP client")?;
        let navigator = Arc::new(ConsoleNavigator::new());
        let pipeline = Arc::new(HttpPipeline::new(
            transport,
            session.clone(),
            Arc::new(ConsoleNotifier::new()),
            navigator.clone(),
        ));

        Ok(Self {
            session,
            navigator,
            pipeline,
        })
    }

    /// Reports a hard navigation forced while the command ran.
    pub fn report_forced_navigation(&self) {
        if let Some(location) = self.navigator.location() {
            eprintln!("redirected to {location}");
        }
    }
}

/// Session access without any network setup.
#[must_use]
pub fn open_session(globals: &GlobalArgs) -> SessionManager {
    let store = FileStore::open(&globals.config.state_dir, &globals.config.origin);
    SessionManager::new(Arc::new(store))
}
