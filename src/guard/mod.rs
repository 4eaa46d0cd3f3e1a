//! Navigation guard run before every route transition.
//!
//! Decision order, first redirect wins:
//! 1. `requires_not_installed`: probe installation state. Installed redirects
//!    to login; a probe failure is logged and treated as not installed
//!    (fail-open).
//! 2. `requires_auth` without a credential redirects to login (fail-closed).
//! 3. `requires_super_admin` with an identity lacking the role redirects to the
//!    default landing page. Without any identity the check is skipped.
//! 4. Allow.
//!
//! The guard never mutates the session.

mod probe;
mod router;
mod routes;

pub use probe::{HttpInstallationProbe, InstallationProbe, InstallationState, CHECK_INSTALL_PATH};
pub use router::{Navigation, Router, MAX_REDIRECTS};
pub use routes::{
    normalize_path, Route, RouteDef, RouteError, RouteMatch, RouteRequirement, RouteTable,
    CONSOLE_ROUTES,
};

use crate::{
    config::{LANDING_PATH, LOGIN_PATH},
    session::SessionManager,
};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(String),
}

pub struct NavigationGuard<P> {
    session: Arc<SessionManager>,
    probe: P,
    login_path: String,
    landing_path: String,
}

impl<P: InstallationProbe> NavigationGuard<P> {
    #[must_use]
    pub fn new(session: Arc<SessionManager>, probe: P) -> Self {
        Self {
            session,
            probe,
            login_path: LOGIN_PATH.to_string(),
            landing_path: LANDING_PATH.to_string(),
        }
    }

    /// Evaluates one navigation attempt against the target's requirement.
    pub async fn evaluate(&self, requirement: &RouteRequirement) -> GuardDecision {
        let session = self.session.read();

        if requirement.requires_not_installed {
            match self.probe.check().await {
                Ok(state) if state.installed => {
                    debug!("system already installed, leaving setup");
                    return GuardDecision::Redirect(self.login_path.clone());
                }
                Ok(_) => {}
                Err(err) => warn!("installation check failed, continuing: {err}"),
            }
        }

        if requirement.requires_auth && !session.has_credential() {
            debug!("no credential for protected route");
            return GuardDecision::Redirect(self.login_path.clone());
        }

        if requirement.requires_super_admin {
            match &session.identity {
                Some(identity) if !identity.is_super_admin => {
                    debug!(user_id = identity.id, "super admin role required");
                    return GuardDecision::Redirect(self.landing_path.clone());
                }
                Some(_) => {}
                None => debug!("no identity stored, skipping super admin check"),
            }
        }

        GuardDecision::Allow
    }
}
