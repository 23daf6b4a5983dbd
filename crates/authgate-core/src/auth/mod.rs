//! Authentication module for tracking the current user session.
//!
//! This module provides:
//! - `Session` / `User`: the records handed out by the identity provider
//! - `AuthState`: the session plus the flags derived from it
//! - `SessionStore`: the single writer of `AuthState`, refreshed from the
//!   identity provider
//!
//! Sessions are held in memory only; persistence is the provider's business.

pub mod session;
pub mod state;
pub mod store;

pub use session::{Session, User};
pub use state::AuthState;
pub use store::SessionStore;
