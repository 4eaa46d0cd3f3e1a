//! Build-time configuration for the API base address with an optional runtime
//! override. The runtime values are read from the process environment
//! (`WARDEN_API_BASE_URL`, `WARDEN_ORIGIN`, `WARDEN_STATE_DIR`) so the same
//! binary can target different deployments without rebuilding.
//! Configuration values are public; do not store secrets here.

use std::{env, path::PathBuf, time::Duration};
use url::Url;

/// Relative prefix used for every API call when no override is configured.
pub const DEFAULT_API_BASE_URL: &str = "/api";
/// Origin the console is served from when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";
/// Directory holding the per-origin session files.
pub const DEFAULT_STATE_DIR: &str = ".warden";
/// Login destination for unauthenticated navigations and expired sessions.
pub const LOGIN_PATH: &str = "/login";
/// Default landing page for authenticated users lacking a required role.
pub const LANDING_PATH: &str = "/dashboard";
/// Upper bound applied to every outbound request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration derived from build-time defaults and the environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_base_url: String,
    pub origin: String,
    pub state_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("WARDEN_API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
        }
    }
}

impl AppConfig {
    /// Loads the build-time defaults and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();
        apply_runtime_overrides(&mut config, runtime_config());
        config
    }

    /// Resolves the API base against the origin.
    ///
    /// # Errors
    /// Returns an error if the origin or an absolute override is not a valid URL.
    pub fn api_url(&self) -> Result<Url, url::ParseError> {
        let base = self.api_base_url.trim();
        if base.starts_with("http://") || base.starts_with("https://") {
            return Url::parse(base);
        }
        let origin = Url::parse(self.origin.trim())?;
        origin.join(base)
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    origin: Option<String>,
    state_dir: Option<String>,
}

fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        api_base_url: read_runtime_value("WARDEN_API_BASE_URL"),
        origin: read_runtime_value("WARDEN_ORIGIN"),
        state_dir: read_runtime_value("WARDEN_STATE_DIR"),
    }
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.origin {
        config.origin = value;
    }
    if let Some(value) = runtime.state_dir {
        config.state_dir = PathBuf::from(value);
    }
}

fn read_runtime_value(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|value| normalize_runtime_value(&value))
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Builds a URL string from an explicit base and the provided path.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}
