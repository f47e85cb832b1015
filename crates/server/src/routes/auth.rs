//! Authentication routes.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use starfruit_crm_core::Role;

use crate::error::{ApiError, Result};
use crate::middleware::{RequireAdmin, RequireAuth, auth_cookie, clear_auth_cookie};
use crate::response;
use crate::services::AuthService;
use crate::state::AppState;

use super::non_empty;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// POST /api/auth/login
///
/// Validates credentials, issues a token, and sets it as the session cookie.
/// The body also carries the raw token for clients that prefer the bearer
/// header.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Response> {
    let (Some(email), Some(password)) = (non_empty(body.email), non_empty(body.password)) else {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_owned(),
        ));
    };

    let user = AuthService::new(state.pool())
        .login(&email, &password)
        .await?;

    let token = state.tokens().issue(&user)?;
    let cookie = auth_cookie(&token, state.config());

    let mut res = response::ok(json!({ "user": user, "token": token }));
    res.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );

    Ok(res)
}

/// POST /api/auth/logout
///
/// Clears the session cookie. Stateless tokens can't be revoked, so this is
/// purely a client-side cleanup; no session is required to call it.
pub async fn logout(State(state): State<AppState>) -> Result<Response> {
    let cookie = clear_auth_cookie(state.config());

    let mut res = response::ok_message("Logged out successfully");
    res.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| ApiError::Internal(e.to_string()))?,
    );

    Ok(res)
}

/// GET /api/auth/me
pub async fn me(RequireAuth(user): RequireAuth) -> Response {
    response::ok(user)
}

/// POST /api/auth/register
///
/// Admin-only account creation. New accounts default to the `user` role and
/// start active.
pub async fn register(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<RegisterRequest>,
) -> Result<Response> {
    let (Some(email), Some(password), Some(name)) = (
        non_empty(body.email),
        non_empty(body.password),
        non_empty(body.name),
    ) else {
        return Err(ApiError::BadRequest(
            "Email, password, and name are required".to_owned(),
        ));
    };

    let role = match non_empty(body.role) {
        Some(raw) => raw.parse::<Role>().map_err(|_| {
            ApiError::BadRequest("Invalid role. Must be admin or user".to_owned())
        })?,
        None => Role::User,
    };

    let user = AuthService::new(state.pool())
        .create_user(&email, &password, &name, role, true)
        .await?;

    Ok(response::ok(user))
}

/// POST /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<Response> {
    let (Some(current), Some(new)) = (
        non_empty(body.current_password),
        non_empty(body.new_password),
    ) else {
        return Err(ApiError::BadRequest(
            "Current and new passwords are required".to_owned(),
        ));
    };

    AuthService::new(state.pool())
        .change_password(&user, &current, &new)
        .await?;

    Ok(response::ok_message("Password changed successfully"))
}
