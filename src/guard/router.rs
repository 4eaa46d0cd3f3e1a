use super::{
    routes::{normalize_path, RouteError, RouteTable},
    GuardDecision, InstallationProbe, NavigationGuard,
};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Most redirects followed for a single navigation; one more is a loop.
pub const MAX_REDIRECTS: usize = 8;

/// Where a navigation finally landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    pub path: String,
    pub route: &'static str,
    pub params: BTreeMap<String, String>,
    /// Every intermediate destination, in order.
    pub redirects: Vec<String>,
}

/// Guarded router: each redirect starts a fresh guarded navigation.
pub struct Router<P> {
    table: RouteTable,
    guard: NavigationGuard<P>,
}

impl<P: InstallationProbe> Router<P> {
    #[must_use]
    pub fn new(table: RouteTable, guard: NavigationGuard<P>) -> Self {
        Self { table, guard }
    }

    /// # Errors
    /// Returns an error if a path has no route or redirects do not settle.
    pub async fn navigate(&self, path: &str) -> Result<Navigation, RouteError> {
        let mut current = normalize_path(path);
        let mut redirects = Vec::new();

        loop {
            let matched = self
                .table
                .resolve(&current)
                .ok_or_else(|| RouteError::NotFound(current.clone()))?;
            let def = matched.route.def;

            let target = match def.redirect {
                Some(target) => target.to_string(),
                None => match self.guard.evaluate(&def.requirement).await {
                    GuardDecision::Allow => {
                        debug!(path = %current, route = def.name, "navigation allowed");
                        return Ok(Navigation {
                            path: current,
                            route: def.name,
                            params: matched.params,
                            redirects,
                        });
                    }
                    GuardDecision::Redirect(target) => {
                        info!(from = %current, to = %target, "navigation redirected");
                        target
                    }
                },
            };

            if redirects.len() >= MAX_REDIRECTS {
                return Err(RouteError::RedirectLoop(path.to_string()));
            }
            current = normalize_path(&target);
            redirects.push(current.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::guard::{InstallationState, RouteDef, RouteRequirement};
    use crate::session::{Identity, SessionManager};
    use secrecy::SecretString;
    use std::sync::Arc;

    struct Installed(bool);

    impl InstallationProbe for Installed {
        async fn check(&self) -> Result<InstallationState, ApiError> {
            Ok(InstallationState { installed: self.0 })
        }
    }

    fn router(session: Arc<SessionManager>, installed: bool) -> Router<Installed> {
        Router::new(
            RouteTable::console().unwrap(),
            NavigationGuard::new(session, Installed(installed)),
        )
    }

    fn signed_in(is_super_admin: bool) -> Arc<SessionManager> {
        let session = Arc::new(SessionManager::in_memory());
        let identity = Identity {
            id: 5,
            is_super_admin,
            ..Identity::default()
        };
        session
            .store(&SecretString::from("tok".to_string()), &identity)
            .unwrap();
        session
    }

    #[tokio::test]
    async fn root_lands_on_login() {
        let navigation = router(Arc::new(SessionManager::in_memory()), true)
            .navigate("/")
            .await
            .unwrap();
        assert_eq!(navigation.route, "Login");
        assert_eq!(navigation.redirects, vec!["/login".to_string()]);
    }

    #[tokio::test]
    async fn anonymous_project_view_lands_on_login() {
        let navigation = router(Arc::new(SessionManager::in_memory()), true)
            .navigate("/project/3/curl-tasks")
            .await
            .unwrap();
        assert_eq!(navigation.path, "/login");
    }

    #[tokio::test]
    async fn member_admin_visit_lands_on_dashboard() {
        let navigation = router(signed_in(false), true)
            .navigate("/admin")
            .await
            .unwrap();
        assert_eq!(navigation.route, "Dashboard");
        assert_eq!(navigation.redirects, vec!["/dashboard".to_string()]);
    }

    #[tokio::test]
    async fn allowed_navigation_keeps_params() {
        let navigation = router(signed_in(true), true)
            .navigate("/project/12/vulnerabilities/")
            .await
            .unwrap();
        assert_eq!(navigation.route, "VulnerabilityManagement");
        assert_eq!(navigation.params.get("id").map(String::as_str), Some("12"));
        assert!(navigation.redirects.is_empty());
    }

    #[tokio::test]
    async fn install_page_after_setup_lands_on_login() {
        let navigation = router(signed_in(true), true)
            .navigate("/install")
            .await
            .unwrap();
        assert_eq!(navigation.route, "Login");
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let result = router(signed_in(true), true).navigate("/missing").await;
        assert!(matches!(result, Err(RouteError::NotFound(path)) if path == "/missing"));
    }

    fn chain(hops: usize) -> Vec<RouteDef> {
        const NAMES: [&str; 10] = ["/r0", "/r1", "/r2", "/r3", "/r4", "/r5", "/r6", "/r7", "/r8", "/r9"];
        (0..=hops)
            .map(|index| RouteDef {
                name: NAMES[index],
                pattern: NAMES[index],
                requirement: RouteRequirement::NONE,
                redirect: (index < hops).then(|| NAMES[index + 1]),
            })
            .collect()
    }

    #[tokio::test]
    async fn redirect_limit_is_inclusive() {
        let session = Arc::new(SessionManager::in_memory());

        let router = Router::new(
            RouteTable::new(&chain(MAX_REDIRECTS)).unwrap(),
            NavigationGuard::new(session.clone(), Installed(false)),
        );
        let navigation = router.navigate("/r0").await.unwrap();
        assert_eq!(navigation.redirects.len(), MAX_REDIRECTS);
        assert_eq!(navigation.path, "/r8");

        let router = Router::new(
            RouteTable::new(&chain(MAX_REDIRECTS + 1)).unwrap(),
            NavigationGuard::new(session, Installed(false)),
        );
        assert!(matches!(
            router.navigate("/r0").await,
            Err(RouteError::RedirectLoop(_))
        ));
    }

    #[tokio::test]
    async fn redirect_cycle_is_reported() {
        const LOOP: &[RouteDef] = &[
            RouteDef {
                name: "A",
                pattern: "/a",
                requirement: RouteRequirement::NONE,
                redirect: Some("/b"),
            },
            RouteDef {
                name: "B",
                pattern: "/b",
                requirement: RouteRequirement::NONE,
                redirect: Some("/a"),
            },
        ];
        let router = Router::new(
            RouteTable::new(LOOP).unwrap(),
            NavigationGuard::new(Arc::new(SessionManager::in_memory()), Installed(false)),
        );
        assert!(matches!(
            router.navigate("/a").await,
            Err(RouteError::RedirectLoop(_))
        ));
    }
}
