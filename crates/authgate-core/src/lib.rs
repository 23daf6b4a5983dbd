//! authgate - client-side session tracking and route gating.
//!
//! The [`SessionStore`] caches the session handed out by an
//! [`IdentityProvider`] and derives the authentication flags from it. The
//! [`Router`] runs a [`NavigationGuard`] before every transition, which
//! refreshes the store and allows or redirects based on the route's policy.

pub mod auth;
pub mod config;
pub mod provider;
pub mod router;

#[cfg(test)]
mod testing;

pub use auth::{AuthState, Session, SessionStore, User};
pub use config::Config;
pub use provider::{
    AuthError, ConnectionStatus, IdentityProvider, SessionReply, SignOutReply,
    SupabaseAuthClient, TransportError,
};
pub use router::{
    GuardDecision, Navigation, NavigationGuard, Route, RouteName, RoutePolicy, RouteTable,
    Router, RouterError,
};
