//! Business services sitting between routes and repositories.

pub mod auth;
pub mod tokens;

pub use auth::{AuthError, AuthService};
pub use tokens::{Claims, TokenCodec, TokenError};
