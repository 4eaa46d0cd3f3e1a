use crate::cli::{actions::client::open_session, globals::GlobalArgs};
use anyhow::Result;
use serde_json::json;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Prints the stored session. The credential value is never shown.
/// # Errors
/// Returns an error if the output cannot be encoded.
pub fn execute(args: &Args) -> Result<()> {
    let session = open_session(&args.globals).read();

    let summary = json!({
        "origin": args.globals.config.origin,
        "authenticated": session.has_credential(),
        "identity": session.identity,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
