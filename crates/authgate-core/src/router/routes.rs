use std::fmt;
use std::str::FromStr;

use super::RouterError;

/// Named pages of the application. Redirects always target a name so they
/// survive path changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteName {
    Home,
    Login,
    Register,
    Dashboard,
}

impl RouteName {
    pub const ALL: [RouteName; 4] = [
        RouteName::Home,
        RouteName::Login,
        RouteName::Register,
        RouteName::Dashboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteName::Home => "Home",
            RouteName::Login => "Login",
            RouteName::Register => "Register",
            RouteName::Dashboard => "Dashboard",
        }
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RouteName {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| RouterError::NotFound(s.to_string()))
    }
}

/// Access policy declared on a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoutePolicy {
    /// Anyone may visit
    #[default]
    None,
    /// Only signed-in users; others go to Login
    RequiresAuth,
    /// Only signed-out users; others go to Dashboard
    RequiresGuest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub name: RouteName,
    pub policy: RoutePolicy,
}

impl Route {
    pub const fn new(path: &'static str, name: RouteName, policy: RoutePolicy) -> Self {
        Self { path, name, policy }
    }
}

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Result<Self, RouterError> {
        for (i, route) in routes.iter().enumerate() {
            let duplicate = routes[..i]
                .iter()
                .any(|r| r.name == route.name || r.path == route.path);
            if duplicate {
                return Err(RouterError::DuplicateRoute(format!(
                    "{} ({})",
                    route.name, route.path
                )));
            }
        }
        Ok(Self { routes })
    }

    /// Look a route up by name (`"Dashboard"`) or by path (`"/dashboard"`).
    pub fn resolve(&self, target: &str) -> Result<&Route, RouterError> {
        let target = target.trim();
        let found = if target.starts_with('/') {
            self.routes.iter().find(|r| r.path == target)
        } else {
            target
                .parse::<RouteName>()
                .ok()
                .and_then(|name| self.by_name(name))
        };
        found.ok_or_else(|| RouterError::NotFound(target.to_string()))
    }

    pub fn by_name(&self, name: RouteName) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            routes: vec![
                Route::new("/", RouteName::Home, RoutePolicy::None),
                Route::new("/login", RouteName::Login, RoutePolicy::RequiresGuest),
                Route::new("/register", RouteName::Register, RoutePolicy::RequiresGuest),
                Route::new("/dashboard", RouteName::Dashboard, RoutePolicy::RequiresAuth),
            ],
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
