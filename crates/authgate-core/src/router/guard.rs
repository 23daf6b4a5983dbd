use std::sync::Arc;

use tracing::debug;

use crate::auth::SessionStore;

use super::routes::{Route, RouteName, RoutePolicy};

/// Outcome of guarding one transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(RouteName),
}

/// Decision table for a route policy.
///
/// `authenticated` must already include the token check: a session without a
/// usable token counts as signed out.
pub fn decide(policy: RoutePolicy, authenticated: bool) -> GuardDecision {
    match (policy, authenticated) {
        (RoutePolicy::RequiresAuth, true) => GuardDecision::Allow,
        (RoutePolicy::RequiresAuth, false) => GuardDecision::Redirect(RouteName::Login),
        (RoutePolicy::RequiresGuest, true) => GuardDecision::Redirect(RouteName::Dashboard),
        (RoutePolicy::RequiresGuest, false) => GuardDecision::Allow,
        (RoutePolicy::None, _) => GuardDecision::Allow,
    }
}

/// Runs before every route transition.
#[derive(Clone)]
pub struct NavigationGuard {
    store: Arc<SessionStore>,
}

impl NavigationGuard {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Refresh the session and decide whether `to` may be shown.
    ///
    /// Always resolves; refresh failures already arrive here as "not
    /// authenticated".
    pub async fn before_each(&self, to: &Route) -> GuardDecision {
        let authenticated = self.store.check_session().await;
        let usable = authenticated && self.store.has_token();

        let decision = decide(to.policy, usable);
        debug!(
            route = %to.name,
            policy = ?to.policy,
            authenticated,
            usable,
            ?decision,
            "Guard decision"
        );
        decision
    }
}

// ============================================================================
// Tests
// ============================================================================
