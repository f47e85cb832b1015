//! User management routes (admin only).

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;

use starfruit_crm_core::{Email, Role, UserId};

use crate::db::RepositoryError;
use crate::db::users::{UserRepository, UserUpdate};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::response;
use crate::services::AuthService;
use crate::state::AppState;

use super::non_empty;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Map repository errors onto this entity's client-facing responses.
fn user_error(e: RepositoryError) -> ApiError {
    match e {
        RepositoryError::NotFound => ApiError::NotFound("User not found".to_owned()),
        RepositoryError::Conflict(_) => ApiError::Conflict("Email already exists".to_owned()),
        other => ApiError::Database(other),
    }
}

/// Parse an optional role field into the enum.
fn checked_role(role: Option<String>) -> Result<Option<Role>> {
    non_empty(role)
        .map(|raw| {
            raw.parse::<Role>()
                .map_err(|_| ApiError::BadRequest("Invalid role. Must be admin or user".to_owned()))
        })
        .transpose()
}

/// GET /api/users
pub async fn list(State(state): State<AppState>, RequireAdmin(_admin): RequireAdmin) -> Result<Response> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(response::ok(users))
}

/// GET /api/users/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Response> {
    let stats = UserRepository::new(state.pool()).stats().await?;
    Ok(response::ok(stats))
}

/// GET /api/users/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Response> {
    let user = UserRepository::new(state.pool())
        .get_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    Ok(response::ok(user))
}

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<UserPayload>,
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

    let role = checked_role(body.role)?.unwrap_or_default();
    let is_active = body.is_active.unwrap_or(true);

    let user = AuthService::new(state.pool())
        .create_user(&email, &password, &name, role, is_active)
        .await?;

    Ok(response::created(user))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    Json(body): Json<UserPayload>,
) -> Result<Response> {
    let Some(name) = non_empty(body.name) else {
        return Err(ApiError::BadRequest("Name is required".to_owned()));
    };

    let role = checked_role(body.role)?;
    let id = UserId::new(id);
    let repo = UserRepository::new(state.pool());

    // If the email is changing, reject an address already held by another
    // account before touching the row.
    let email = match non_empty(body.email) {
        Some(raw) => {
            let email = Email::parse(&raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;
            if let Some(existing) = repo.get_by_email(&email).await? {
                if existing.id != id {
                    return Err(ApiError::Conflict("Email already exists".to_owned()));
                }
            }
            Some(email)
        }
        None => None,
    };

    let password_hash = match non_empty(body.password) {
        Some(password) => Some(AuthService::new(state.pool()).hash_for_update(&password)?),
        None => None,
    };

    let user = repo
        .update(
            id,
            &UserUpdate {
                email,
                password_hash,
                name: Some(name),
                role,
                is_active: body.is_active,
            },
        )
        .await
        .map_err(user_error)?;

    Ok(response::ok(user))
}

/// DELETE /api/users/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Response> {
    let id = UserId::new(id);

    // Self-delete guard: an admin cannot remove the account it is acting as.
    if id == admin.id {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_owned(),
        ));
    }

    UserRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(user_error)?;

    Ok(response::ok_message("User deleted successfully"))
}

/// POST /api/users/{id}/toggle-status
pub async fn toggle_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i32>,
) -> Result<Response> {
    let id = UserId::new(id);

    // Same self-action guard as delete; deactivating yourself would end the
    // session making the request.
    if id == admin.id {
        return Err(ApiError::BadRequest(
            "Cannot deactivate your own account".to_owned(),
        ));
    }

    let repo = UserRepository::new(state.pool());
    let user = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_owned()))?;

    let updated = repo
        .update(
            id,
            &UserUpdate {
                is_active: Some(!user.is_active),
                ..UserUpdate::default()
            },
        )
        .await
        .map_err(user_error)?;

    let message = if updated.is_active {
        "User activated successfully"
    } else {
        "User deactivated successfully"
    };

    Ok(response::ok_with_message(updated, message))
}
