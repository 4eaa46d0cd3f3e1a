use crate::{
    cli::{actions::client::Client, globals::GlobalArgs},
    guard::{HttpInstallationProbe, NavigationGuard, RouteTable, Router},
};
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub path: String,
}

/// Runs the guarded router for `path` and prints the final location.
/// # Errors
/// Returns an error if the path has no route or the redirects do not settle.
pub async fn execute(args: Args) -> Result<()> {
    let client = Client::connect(&args.globals)?;
    let probe = HttpInstallationProbe::new(client.pipeline.clone());
    let guard = NavigationGuard::new(client.session.clone(), probe);
    let router = Router::new(RouteTable::console()?, guard);

    let result = router
        .navigate(&args.path)
        .await
        .with_context(|| format!("navigation to {} failed", args.path));
    client.report_forced_navigation();
    let navigation = result?;

    for hop in &navigation.redirects {
        eprintln!("-> {hop}");
    }
    println!("{} ({})", navigation.path, navigation.route);

    Ok(())
}
