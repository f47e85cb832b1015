//! Contact routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::Value;

use starfruit_crm_core::{ContactId, CustomerId};

use crate::db::RepositoryError;
use crate::db::contacts::{ContactRepository, ContactUpdate, NewContact};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::response;
use crate::state::AppState;

use super::{non_empty, parse_ref_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactPayload {
    pub customer_id: Option<Value>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
}

/// Map repository errors onto this entity's client-facing responses.
fn contact_error(e: RepositoryError) -> ApiError {
    match e {
        RepositoryError::NotFound => ApiError::NotFound("Contact not found".to_owned()),
        RepositoryError::ForeignKey(_) => ApiError::BadRequest("Invalid customer ID".to_owned()),
        other => ApiError::Database(other),
    }
}

/// GET /api/contacts
pub async fn list(State(state): State<AppState>, RequireAuth(_user): RequireAuth) -> Result<Response> {
    let contacts = ContactRepository::new(state.pool()).list().await?;
    Ok(response::ok(contacts))
}

/// GET /api/contacts/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    let contact = ContactRepository::new(state.pool())
        .get_by_id(ContactId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Contact not found".to_owned()))?;

    Ok(response::ok(contact))
}

/// GET /api/contacts/customer/{customer_id}
pub async fn list_by_customer(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(customer_id): Path<i32>,
) -> Result<Response> {
    let contacts = ContactRepository::new(state.pool())
        .list_by_customer(CustomerId::new(customer_id))
        .await?;

    Ok(response::ok(contacts))
}

/// POST /api/contacts
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<CreateContactPayload>,
) -> Result<Response> {
    let customer_id = body.customer_id.as_ref().and_then(parse_ref_id);
    let (Some(customer_id), Some(name), Some(email)) =
        (customer_id, non_empty(body.name), non_empty(body.email))
    else {
        return Err(ApiError::BadRequest(
            "Customer ID, name, and email are required".to_owned(),
        ));
    };

    let phone = non_empty(body.phone);
    let position = non_empty(body.position);

    let contact = ContactRepository::new(state.pool())
        .create(&NewContact {
            customer_id: CustomerId::new(customer_id),
            name: &name,
            email: &email,
            phone: phone.as_deref(),
            position: position.as_deref(),
        })
        .await
        .map_err(contact_error)?;

    Ok(response::created(contact))
}

/// PUT /api/contacts/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<UpdateContactPayload>,
) -> Result<Response> {
    let (Some(name), Some(email)) = (non_empty(body.name), non_empty(body.email)) else {
        return Err(ApiError::BadRequest("Name and email are required".to_owned()));
    };

    let phone = non_empty(body.phone);
    let position = non_empty(body.position);

    let contact = ContactRepository::new(state.pool())
        .update(
            ContactId::new(id),
            &ContactUpdate {
                name: &name,
                email: &email,
                phone: phone.as_deref(),
                position: position.as_deref(),
            },
        )
        .await
        .map_err(contact_error)?;

    Ok(response::ok(contact))
}

/// DELETE /api/contacts/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    ContactRepository::new(state.pool())
        .delete(ContactId::new(id))
        .await
        .map_err(contact_error)?;

    Ok(response::ok_message("Contact deleted successfully"))
}
