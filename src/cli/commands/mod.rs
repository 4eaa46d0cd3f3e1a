pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_ORIGIN: &str = "origin";
pub const ARG_API_BASE_URL: &str = "api-base-url";
pub const ARG_STATE_DIR: &str = "state-dir";

pub const CMD_NAVIGATE: &str = "navigate";
pub const CMD_REQUEST: &str = "request";
pub const CMD_LOGIN: &str = "login";
pub const CMD_SESSION: &str = "session";

fn with_connection_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ORIGIN)
                .long("origin")
                .help("Console origin; scopes the stored session (default: http://localhost:8080, env: WARDEN_ORIGIN)")
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_BASE_URL)
                .long("api-base-url")
                .help("API base address, absolute or relative to the origin (default: /api, env: WARDEN_API_BASE_URL)")
                .global(true),
        )
        .arg(
            Arg::new(ARG_STATE_DIR)
                .long("state-dir")
                .help("Directory holding session files (default: .warden, env: WARDEN_STATE_DIR)")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}

fn subcommands(command: Command) -> Command {
    command
        .subcommand(
            Command::new(CMD_NAVIGATE)
                .about("Run the navigation guard for a console path and print where it lands")
                .arg(Arg::new("path").help("Console path, e.g. /admin").required(true)),
        )
        .subcommand(
            Command::new(CMD_REQUEST)
                .about("Send an API request through the pipeline and print the payload")
                .arg(
                    Arg::new("method")
                        .help("HTTP method")
                        .required(true)
                        .value_parser(["GET", "POST", "PUT", "DELETE", "get", "post", "put", "delete"]),
                )
                .arg(Arg::new("path").help("API path, e.g. /projects").required(true))
                .arg(
                    Arg::new("data")
                        .short('d')
                        .long("data")
                        .help("JSON request body"),
                ),
        )
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log in and store the session for this origin")
                .arg(
                    Arg::new("username")
                        .short('u')
                        .long("username")
                        .required(true),
                )
                .arg(
                    Arg::new("password")
                        .short('p')
                        .long("password")
                        .env("WARDEN_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        )
        .subcommand(
            Command::new(CMD_SESSION).about("Show the stored session without its credential"),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("warden")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true);

    let command = with_connection_args(command);
    let command = subcommands(command);
    logging::with_args(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "warden");
        assert_eq!(
            command.get_about().unwrap().to_string(),
            env!("CARGO_PKG_DESCRIPTION")
        );
        assert_eq!(
            command.get_version().unwrap().to_string(),
            env!("CARGO_PKG_VERSION")
        );
    }

    #[test]
    fn test_navigate_with_global_args() {
        let matches = new().get_matches_from(vec![
            "warden",
            "navigate",
            "/admin",
            "--origin",
            "https://console.test",
            "--state-dir",
            "/tmp/warden",
        ]);

        assert_eq!(
            matches.get_one::<String>(ARG_ORIGIN).map(String::as_str),
            Some("https://console.test")
        );
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, CMD_NAVIGATE);
        assert_eq!(
            sub.get_one::<String>("path").map(String::as_str),
            Some("/admin")
        );
    }

    #[test]
    fn test_request_rejects_unknown_method() {
        let result = new().try_get_matches_from(vec!["warden", "request", "PATCH", "/x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_login_password_from_env() {
        temp_env::with_vars([("WARDEN_PASSWORD", Some("s3cret"))], || {
            let matches = new().get_matches_from(vec!["warden", "login", "-u", "ana"]);
            let (_, sub) = matches.subcommand().unwrap();
            assert_eq!(
                sub.get_one::<String>("password").map(String::as_str),
                Some("s3cret")
            );
        });
    }

    #[test]
    fn test_verbosity_level_name_from_env() {
        temp_env::with_vars([("WARDEN_LOG_LEVEL", Some("debug"))], || {
            let matches = new().get_matches_from(vec!["warden", "session"]);
            assert_eq!(
                matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                Some(3)
            );
        });
    }

    #[test]
    fn test_verbosity_counts_flags() {
        let matches = new().get_matches_from(vec!["warden", "-vvv", "session"]);
        assert_eq!(
            matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
            Some(3)
        );
    }
}
