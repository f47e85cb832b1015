//! Authentication extractors and the auth cookie.
//!
//! [`RequireAuth`] is the session check: it pulls the token from the cookie
//! (or a bearer header), verifies it, then re-loads the user from the
//! database. The reload is what makes deactivation take effect on the next
//! request without any token revocation machinery. [`RequireAdmin`] layers a
//! role check on top.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use axum::response::{IntoResponse, Response};
use cookie::{Cookie, SameSite};

use starfruit_crm_core::UserId;

use crate::config::ServerConfig;
use crate::db::users::UserRepository;
use crate::error::ApiError;
use crate::models::User;
use crate::state::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "token";

/// Extractor that requires a valid session.
///
/// The extracted value is the freshly loaded user, not the token claims, so
/// downstream handlers always see current role and status.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that requires a valid session with the admin role.
pub struct RequireAdmin(pub User);

/// Rejection for the auth extractors.
pub enum AuthRejection {
    /// No token in the cookie or authorization header.
    MissingToken,
    /// Token failed verification (malformed, expired, or bad signature).
    InvalidToken,
    /// Token verified but the user is gone or deactivated.
    UserGone,
    /// Authenticated but not an admin.
    NotAdmin,
    /// The user lookup itself failed.
    StoreUnavailable,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let err = match self {
            Self::MissingToken => ApiError::Unauthenticated("Access token required".to_owned()),
            Self::InvalidToken => ApiError::Unauthenticated("Invalid token".to_owned()),
            Self::UserGone => ApiError::Unauthenticated("Invalid or inactive user".to_owned()),
            Self::NotAdmin => ApiError::Forbidden("Admin access required".to_owned()),
            Self::StoreUnavailable => ApiError::Internal("session user lookup failed".to_owned()),
        };
        err.into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or(AuthRejection::MissingToken)?;

        let claims = state
            .tokens()
            .verify(&token)
            .map_err(|_| AuthRejection::InvalidToken)?;

        // Re-load on every request: a deleted or deactivated account loses
        // access immediately, even with an unexpired token in hand.
        let user = UserRepository::new(state.pool())
            .get_by_id(UserId::new(claims.sub))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "session user lookup failed");
                AuthRejection::StoreUnavailable
            })?;

        match user {
            Some(user) if user.is_active => Ok(Self(user)),
            _ => Err(AuthRejection::UserGone),
        }
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.role.is_admin() {
            return Err(AuthRejection::NotAdmin);
        }

        Ok(Self(user))
    }
}

/// Pull the session token from the cookie, falling back to a bearer header.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|part| {
        let parsed = Cookie::parse(part.trim().to_owned()).ok()?;
        (parsed.name() == AUTH_COOKIE).then(|| parsed.value().to_owned())
    })
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Build the Set-Cookie value for a fresh session.
///
/// Http-only, path `/`, seven-day max-age. Production runs the SPA on a
/// different origin, so the cookie needs `SameSite=None; Secure` there;
/// development keeps `Lax` so plain HTTP works.
#[must_use]
pub fn auth_cookie(token: &str, config: &ServerConfig) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, token.to_owned()))
        .http_only(true)
        .path("/")
        .max_age(cookie::time::Duration::days(7))
        .secure(config.is_production())
        .same_site(if config.is_production() {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .build()
}

/// Build the Set-Cookie value that clears the session.
#[must_use]
pub fn clear_auth_cookie(config: &ServerConfig) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, ""))
        .http_only(true)
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .secure(config.is_production())
        .same_site(if config.is_production() {
            SameSite::None
        } else {
            SameSite::Lax
        })
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;
    use secrecy::SecretString;

    use crate::config::Environment;

    use super::*;

    fn headers_with(name: header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn config(environment: Environment) -> ServerConfig {
        ServerConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            jwt_secret: SecretString::from("x".repeat(32)),
            environment,
            cors_allowed_origins: vec![],
            sentry_dsn: None,
        }
    }

    #[test]
    fn test_token_from_cookie() {
        let headers = headers_with(header::COOKIE, "theme=dark; token=abc.def.ghi; lang=en");
        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_token_from_bearer_header() {
        let headers = headers_with(header::AUTHORIZATION, "Bearer abc.def.ghi");
        assert_eq!(extract_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_cookie_takes_precedence_over_header() {
        let mut headers = headers_with(header::COOKIE, "token=from-cookie");
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(extract_token(&headers).unwrap(), "from-cookie");
    }

    #[test]
    fn test_no_token_anywhere() {
        assert!(extract_token(&HeaderMap::new()).is_none());

        let headers = headers_with(header::COOKIE, "theme=dark");
        assert!(extract_token(&headers).is_none());

        let headers = headers_with(header::AUTHORIZATION, "Basic dXNlcjpwYXNz");
        assert!(extract_token(&headers).is_none());

        let headers = headers_with(header::AUTHORIZATION, "Bearer ");
        assert!(extract_token(&headers).is_none());
    }

    #[test]
    fn test_auth_cookie_development_flags() {
        let cookie = auth_cookie("abc", &config(Environment::Development));
        assert_eq!(cookie.name(), AUTH_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::days(7)));
    }

    #[test]
    fn test_auth_cookie_production_flags() {
        let cookie = auth_cookie("abc", &config(Environment::Production));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_auth_cookie(&config(Environment::Development));
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::ZERO));
    }
}
