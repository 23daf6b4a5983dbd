use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use crate::auth::SessionStore;

use super::guard::{GuardDecision, NavigationGuard};
use super::routes::{Route, RouteName, RouteTable};
use super::RouterError;

/// Maximum number of guard redirects followed for one navigation.
/// The default table settles in at most one hop; anything longer is a
/// misconfigured table.
const MAX_REDIRECTS: usize = 5;

/// Where a navigation ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub requested: RouteName,
    pub resolved: RouteName,
    /// Routes the guard turned away, in order
    pub redirected_from: Vec<RouteName>,
}

impl Navigation {
    pub fn was_redirected(&self) -> bool {
        !self.redirected_from.is_empty()
    }
}

/// Resolves targets against the route table and runs the guard on every
/// transition, redirects included.
///
/// Overlapping pushes are not serialized; whichever finishes last sets the
/// current route.
pub struct Router {
    table: RouteTable,
    guard: NavigationGuard,
    current: RwLock<Option<RouteName>>,
}

impl Router {
    pub fn new(table: RouteTable, store: Arc<SessionStore>) -> Self {
        Self {
            table,
            guard: NavigationGuard::new(store),
            current: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        self.guard.store()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> Option<RouteName> {
        *self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Navigate to a route by name or path.
    pub async fn push(&self, target: &str) -> Result<Navigation, RouterError> {
        let requested = self.table.resolve(target)?;
        self.navigate(requested).await
    }

    pub async fn push_name(&self, name: RouteName) -> Result<Navigation, RouterError> {
        let requested = self
            .table
            .by_name(name)
            .ok_or_else(|| RouterError::NotFound(name.to_string()))?;
        self.navigate(requested).await
    }

    async fn navigate(&self, requested: &Route) -> Result<Navigation, RouterError> {
        let mut route = requested;
        let mut redirected_from = Vec::new();

        loop {
            match self.guard.before_each(route).await {
                GuardDecision::Allow => break,
                GuardDecision::Redirect(next) => {
                    if redirected_from.len() >= MAX_REDIRECTS {
                        return Err(RouterError::RedirectLoop(requested.name.to_string()));
                    }
                    debug!(from = %route.name, to = %next, "Redirecting");
                    redirected_from.push(route.name);
                    route = self
                        .table
                        .by_name(next)
                        .ok_or_else(|| RouterError::NotFound(next.to_string()))?;
                }
            }
        }

        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(route.name);
        info!(requested = %requested.name, resolved = %route.name, "Navigated");

        Ok(Navigation {
            requested: requested.name,
            resolved: route.name,
            redirected_from,
        })
    }

    /// Where to send the user at startup: Dashboard when signed in with a
    /// usable token, Login otherwise.
    pub async fn landing_route(&self) -> RouteName {
        let store = self.store();
        if store.check_session().await && store.has_token() {
            RouteName::Dashboard
        } else {
            RouteName::Login
        }
    }

    /// Sign out, then go to the login page.
    pub async fn logout(&self) -> Result<Navigation, RouterError> {
        self.store().logout().await;
        self.push_name(RouteName::Login).await
    }
}

// ============================================================================
// Tests
// ============================================================================
