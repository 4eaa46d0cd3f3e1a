//! Login flow that creates the session. The guard and the pipeline only read
//! and clear the session; this is the only writer. The password is sent once
//! and never stored or logged.

use crate::{
    api::{HttpPipeline, Transport},
    session::{Identity, SessionManager},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const LOGIN_ENDPOINT: &str = "/login";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: Identity,
}

/// Exchanges credentials for a bearer token and stores the session.
///
/// # Errors
/// Returns an error if the API rejects the login or the session cannot be stored.
pub async fn login<T: Transport>(
    pipeline: &HttpPipeline<T>,
    session: &SessionManager,
    username: &str,
    password: &SecretString,
) -> Result<Identity> {
    let request = LoginRequest {
        username,
        password: password.expose_secret(),
    };
    let response: LoginResponse = pipeline
        .post_json(LOGIN_ENDPOINT, &request)
        .await
        .context("login failed")?;

    session
        .store(&SecretString::from(response.token), &response.user)
        .context("failed to store session")?;

    info!(user_id = response.user.id, "logged in");

    Ok(response.user)
}
