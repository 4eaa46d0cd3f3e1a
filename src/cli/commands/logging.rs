use clap::{builder::ValueParser, Arg, ArgAction, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted by `WARDEN_LOG_LEVEL`, indexed by the `-v` count
/// they stand for.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parses one verbosity value: a `-v` count or a level name.
///
/// # Errors
/// Returns an error naming the accepted levels.
pub fn parse_verbosity(value: &str) -> Result<u8, String> {
    let value = value.trim();
    if let Ok(count) = value.parse::<u8>() {
        return Ok(count);
    }

    LEVEL_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(value))
        .and_then(|index| u8::try_from(index).ok())
        .ok_or_else(|| {
            format!(
                "invalid log level `{value}`, expected a count or one of: {}",
                LEVEL_NAMES.join(", ")
            )
        })
}

/// Tracing level for a verbosity count. `None` keeps the default (errors only).
#[must_use]
pub const fn level_for(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Increase logging on stderr; repeatable (env takes error, warn, info, debug, trace)")
            .env("WARDEN_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(ValueParser::new(parse_verbosity)),
    )
}
