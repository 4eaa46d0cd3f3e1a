use crate::{
    auth,
    cli::{actions::client::Client, globals::GlobalArgs},
};
use anyhow::Result;
use secrecy::SecretString;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub username: String,
    pub password: SecretString,
}

/// # Errors
/// Returns an error if the login is rejected or the session cannot be stored.
pub async fn execute(args: Args) -> Result<()> {
    let client = Client::connect(&args.globals)?;

    let result = auth::login(
        &client.pipeline,
        &client.session,
        &args.username,
        &args.password,
    )
    .await;
    client.report_forced_navigation();
    let identity = result?;

    let name = identity.username.as_deref().unwrap_or(&args.username);
    if identity.is_super_admin {
        println!("logged in as {name} (super admin)");
    } else {
        println!("logged in as {name}");
    }

    Ok(())
}
