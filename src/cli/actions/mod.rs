pub mod login;
pub mod navigate;
pub mod request;
pub mod session;

mod client;

// Internal "interpreter" for `Action`.
// We keep the match in a separate module so `mod.rs` stays small as more actions are added.
mod run;

#[derive(Debug)]
pub enum Action {
    Navigate(navigate::Args),
    Request(request::Args),
    Login(login::Args),
    Session(session::Args),
}

impl Action {
    // Convenience wrapper so call sites can do `action.execute().await`.
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
