use crate::config::AppConfig;
use std::path::PathBuf;

/// Connection settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub config: AppConfig,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn set_origin(&mut self, origin: String) {
        self.config.origin = origin;
    }

    pub fn set_api_base_url(&mut self, api_base_url: String) {
        self.config.api_base_url = api_base_url;
    }

    pub fn set_state_dir(&mut self, state_dir: PathBuf) {
        self.config.state_dir = state_dir;
    }
}
