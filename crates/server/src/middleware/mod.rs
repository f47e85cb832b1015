//! Request middleware and extractors.

pub mod auth;

pub use auth::{AUTH_COOKIE, RequireAdmin, RequireAuth, auth_cookie, clear_auth_cookie};
