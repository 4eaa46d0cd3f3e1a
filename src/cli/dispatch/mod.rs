//! Command-line argument dispatch.
//!
//! This module maps validated CLI matches to an [`Action`] carrying the
//! resolved connection settings.

use crate::api::Method;
use crate::cli::{
    actions::{login, navigate, request, session, Action},
    commands::{
        ARG_API_BASE_URL, ARG_ORIGIN, ARG_STATE_DIR, CMD_LOGIN, CMD_NAVIGATE, CMD_REQUEST,
        CMD_SESSION,
    },
    globals::GlobalArgs,
};
use crate::config::AppConfig;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::path::PathBuf;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or malformed.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = global_args(matches);

    let (name, sub) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("missing subcommand"))?;

    match name {
        CMD_NAVIGATE => Ok(Action::Navigate(navigate::Args {
            globals,
            path: required(sub, "path")?,
        })),
        CMD_REQUEST => {
            let method = required(sub, "method")?;
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("invalid HTTP method: {method}"))?;
            let data = sub
                .get_one::<String>("data")
                .map(|raw| serde_json::from_str::<serde_json::Value>(raw))
                .transpose()
                .context("--data must be valid JSON")?;
            Ok(Action::Request(request::Args {
                globals,
                method,
                path: required(sub, "path")?,
                data,
            }))
        }
        CMD_LOGIN => Ok(Action::Login(login::Args {
            globals,
            username: required(sub, "username")?,
            password: SecretString::from(required(sub, "password")?),
        })),
        CMD_SESSION => Ok(Action::Session(session::Args { globals })),
        other => Err(anyhow!("unknown subcommand: {other}")),
    }
}

fn global_args(matches: &clap::ArgMatches) -> GlobalArgs {
    let mut globals = GlobalArgs::new(AppConfig::load());
    if let Some(origin) = matches.get_one::<String>(ARG_ORIGIN) {
        globals.set_origin(origin.clone());
    }
    if let Some(base) = matches.get_one::<String>(ARG_API_BASE_URL) {
        globals.set_api_base_url(base.clone());
    }
    if let Some(dir) = matches.get_one::<PathBuf>(ARG_STATE_DIR) {
        globals.set_state_dir(dir.clone());
    }
    globals
}

fn required(matches: &clap::ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: {name}"))
}
