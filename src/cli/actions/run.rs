use crate::cli::actions::{login, navigate, request, session, Action};
use anyhow::Result;

/// Execute the provided action.
// This is the single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Navigate(args) => navigate::execute(args).await,
        Action::Request(args) => request::execute(args).await,
        Action::Login(args) => login::execute(args).await,
        Action::Session(args) => session::execute(&args),
    }
}
