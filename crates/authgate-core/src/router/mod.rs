//! Client-side routing with an authentication guard.
//!
//! Every transition goes through [`NavigationGuard::before_each`], which
//! refreshes the session store and checks the target's [`RoutePolicy`].
//! Redirect targets are route names, never raw paths.

pub mod guard;
pub mod navigator;
pub mod routes;

use thiserror::Error;

pub use guard::{decide, GuardDecision, NavigationGuard};
pub use navigator::{Navigation, Router};
pub use routes::{Route, RouteName, RoutePolicy, RouteTable};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    #[error("No route matches: {0}")]
    NotFound(String),

    #[error("Duplicate route: {0}")]
    DuplicateRoute(String),

    #[error("Too many redirects while navigating to {0}")]
    RedirectLoop(String),
}
