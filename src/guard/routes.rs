//! Route table of the console and the requirements each route declares.
//!
//! Patterns use `:name` for a single non-empty path segment. A trailing slash,
//! query string, or fragment on the navigated path is ignored when matching.

use regex::Regex;
use std::collections::BTreeMap;
use thiserror::Error;

/// Capability requirements attached to a navigation target. All flags are
/// independent and may combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteRequirement {
    pub requires_auth: bool,
    pub requires_not_installed: bool,
    pub requires_super_admin: bool,
}

impl RouteRequirement {
    pub const NONE: Self = Self {
        requires_auth: false,
        requires_not_installed: false,
        requires_super_admin: false,
    };

    pub const AUTH: Self = Self {
        requires_auth: true,
        ..Self::NONE
    };

    pub const SUPER_ADMIN: Self = Self {
        requires_auth: true,
        requires_super_admin: true,
        ..Self::NONE
    };

    pub const NOT_INSTALLED: Self = Self {
        requires_not_installed: true,
        ..Self::NONE
    };
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("too many redirects while navigating to {0}")]
    RedirectLoop(String),
    #[error("invalid route pattern {pattern}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Declarative route entry.
#[derive(Clone, Copy, Debug)]
pub struct RouteDef {
    pub name: &'static str,
    pub pattern: &'static str,
    pub requirement: RouteRequirement,
    /// Static redirect applied before any guard runs.
    pub redirect: Option<&'static str>,
}

impl RouteDef {
    const fn page(name: &'static str, pattern: &'static str, requirement: RouteRequirement) -> Self {
        Self {
            name,
            pattern,
            requirement,
            redirect: None,
        }
    }
}

/// Navigable surface of the console.
pub const CONSOLE_ROUTES: &[RouteDef] = &[
    RouteDef {
        name: "Root",
        pattern: "/",
        requirement: RouteRequirement::NONE,
        redirect: Some("/login"),
    },
    RouteDef::page("Install", "/install", RouteRequirement::NOT_INSTALLED),
    RouteDef::page("Login", "/login", RouteRequirement::NONE),
    RouteDef::page("Dashboard", "/dashboard", RouteRequirement::AUTH),
    RouteDef::page("ProjectDetail", "/project/:id", RouteRequirement::AUTH),
    RouteDef::page("DomainMap", "/project/:id/domain-map", RouteRequirement::AUTH),
    RouteDef::page("CurlTasks", "/project/:id/curl-tasks", RouteRequirement::AUTH),
    RouteDef::page(
        "VulnerabilityManagement",
        "/project/:id/vulnerabilities",
        RouteRequirement::AUTH,
    ),
    RouteDef::page("UserSettings", "/settings", RouteRequirement::AUTH),
    RouteDef::page("BigScreen", "/bigscreen", RouteRequirement::AUTH),
    RouteDef::page("SharedCredentials", "/credentials", RouteRequirement::AUTH),
    RouteDef::page("ReportTemplates", "/report-templates", RouteRequirement::AUTH),
    RouteDef::page("ReportEditor", "/reports/:id/edit", RouteRequirement::AUTH),
    RouteDef::page("AdminPanel", "/admin", RouteRequirement::SUPER_ADMIN),
];

#[derive(Debug)]
pub struct Route {
    pub def: RouteDef,
    matcher: Regex,
}

#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    pub params: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Compiles the given definitions; the first match wins.
    ///
    /// # Errors
    /// Returns an error if a pattern cannot be compiled.
    pub fn new(defs: &[RouteDef]) -> Result<Self, RouteError> {
        let routes = defs
            .iter()
            .map(|def| -> Result<Route, RouteError> {
                let matcher = compile(def.pattern).map_err(|source| RouteError::Pattern {
                    pattern: def.pattern.to_string(),
                    source,
                })?;
                Ok(Route { def: *def, matcher })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    /// # Errors
    /// Returns an error if a console pattern cannot be compiled.
    pub fn console() -> Result<Self, RouteError> {
        Self::new(CONSOLE_ROUTES)
    }

    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = normalize_path(path);
        self.routes.iter().find_map(|route| {
            let captures = route.matcher.captures(&path)?;
            let params = route
                .matcher
                .capture_names()
                .flatten()
                .filter_map(|name| {
                    captures
                        .name(name)
                        .map(|value| (name.to_string(), value.as_str().to_string()))
                })
                .collect();
            Some(RouteMatch { route, params })
        })
    }
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::from("^");
    for segment in pattern.split('/').filter(|segment| !segment.is_empty()) {
        expr.push('/');
        match segment.strip_prefix(':') {
            Some(name) => expr.push_str(&format!("(?P<{name}>[^/]+)")),
            None => expr.push_str(&regex::escape(segment)),
        }
    }
    if expr.len() == 1 {
        expr.push('/');
    }
    expr.push('$');
    Regex::new(&expr)
}

/// Strips query, fragment and trailing slashes; the root stays `/`.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn console_table_compiles() {
        assert!(RouteTable::console().is_ok());
    }

    #[test]
    fn resolves_static_and_parameterized_routes() {
        let table = RouteTable::console().unwrap();

        let matched = table.resolve("/dashboard").unwrap();
        assert_eq!(matched.route.def.name, "Dashboard");
        assert!(matched.params.is_empty());

        let matched = table.resolve("/project/42/domain-map").unwrap();
        assert_eq!(matched.route.def.name, "DomainMap");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));

        let matched = table.resolve("/reports/7/edit?tab=body").unwrap();
        assert_eq!(matched.route.def.name, "ReportEditor");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("7"));
    }

    #[test]
    fn parameter_matches_a_single_segment() {
        let table = RouteTable::console().unwrap();
        assert!(table.resolve("/project/").is_none());
        assert!(table.resolve("/project/1/2").is_none());
        assert!(table.resolve("/nowhere").is_none());
    }

    #[test]
    fn root_redirects_to_login() {
        let table = RouteTable::console().unwrap();
        let matched = table.resolve("/").unwrap();
        assert_eq!(matched.route.def.redirect, Some("/login"));
    }

    #[test]
    fn requirement_combinations_in_use() {
        let table = RouteTable::console().unwrap();
        let requirement = |path: &str| table.resolve(path).unwrap().route.def.requirement;

        assert_eq!(requirement("/login"), RouteRequirement::NONE);
        assert_eq!(requirement("/settings"), RouteRequirement::AUTH);
        assert_eq!(requirement("/install"), RouteRequirement::NOT_INSTALLED);
        let admin = requirement("/admin");
        assert!(admin.requires_auth && admin.requires_super_admin);
        assert!(!admin.requires_not_installed);
    }

    #[test]
    fn normalize_path_strips_decorations() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("/admin/"), "/admin");
        assert_eq!(normalize_path("admin"), "/admin");
        assert_eq!(normalize_path("/login?next=/admin#top"), "/login");
    }

    #[test]
    fn literal_segments_are_escaped() {
        let table = RouteTable::new(&[RouteDef::page("Dot", "/a.b", RouteRequirement::NONE)]).unwrap();
        assert!(table.resolve("/a.b").is_some());
        assert!(table.resolve("/axb").is_none());
    }
}
