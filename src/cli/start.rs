use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch, telemetry,
};
use anyhow::Result;

/// Main entry point for the CLI - builds and returns the Action
///
/// # Errors
///
/// Returns an error if argument parsing, logging initialization, or action dispatch fails
pub fn start() -> Result<Action> {
    // 1. Parse command-line arguments
    let matches = commands::new().get_matches();

    // 2. Initialize logging from the verbosity count
    let verbosity = matches
        .get_one::<u8>(logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);
    telemetry::init(logging::level_for(verbosity))?;

    // 3. Dispatch to appropriate action
    dispatch::handler(&matches)
}
