//! Customer routes.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use serde::Deserialize;

use starfruit_crm_core::CustomerId;

use crate::db::RepositoryError;
use crate::db::customers::{CustomerRepository, NewCustomer};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::response;
use crate::state::AppState;

use super::non_empty;

#[derive(Debug, Deserialize)]
pub struct CustomerPayload {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Map repository errors onto this entity's client-facing responses.
fn customer_error(e: RepositoryError) -> ApiError {
    match e {
        RepositoryError::NotFound => ApiError::NotFound("Customer not found".to_owned()),
        RepositoryError::Conflict(_) => ApiError::Conflict("Email already exists".to_owned()),
        other => ApiError::Database(other),
    }
}

/// GET /api/customers
pub async fn list(State(state): State<AppState>, RequireAuth(_user): RequireAuth) -> Result<Response> {
    let customers = CustomerRepository::new(state.pool()).list().await?;
    Ok(response::ok(customers))
}

/// GET /api/customers/search?q=
pub async fn search(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<SearchParams>,
) -> Result<Response> {
    let Some(q) = non_empty(params.q) else {
        return Err(ApiError::BadRequest("Search query is required".to_owned()));
    };

    let customers = CustomerRepository::new(state.pool()).search(&q).await?;
    Ok(response::ok(customers))
}

/// GET /api/customers/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    let customer = CustomerRepository::new(state.pool())
        .get_by_id(CustomerId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Customer not found".to_owned()))?;

    Ok(response::ok(customer))
}

/// POST /api/customers
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<CustomerPayload>,
) -> Result<Response> {
    let (Some(name), Some(email)) = (non_empty(body.name), non_empty(body.email)) else {
        return Err(ApiError::BadRequest("Name and email are required".to_owned()));
    };

    let phone = non_empty(body.phone);
    let company = non_empty(body.company);

    let customer = CustomerRepository::new(state.pool())
        .create(&NewCustomer {
            name: &name,
            email: &email,
            phone: phone.as_deref(),
            company: company.as_deref(),
        })
        .await
        .map_err(customer_error)?;

    Ok(response::created(customer))
}

/// PUT /api/customers/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<CustomerPayload>,
) -> Result<Response> {
    let (Some(name), Some(email)) = (non_empty(body.name), non_empty(body.email)) else {
        return Err(ApiError::BadRequest("Name and email are required".to_owned()));
    };

    let phone = non_empty(body.phone);
    let company = non_empty(body.company);

    let customer = CustomerRepository::new(state.pool())
        .update(
            CustomerId::new(id),
            &NewCustomer {
                name: &name,
                email: &email,
                phone: phone.as_deref(),
                company: company.as_deref(),
            },
        )
        .await
        .map_err(customer_error)?;

    Ok(response::ok(customer))
}

/// DELETE /api/customers/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    CustomerRepository::new(state.pool())
        .delete(CustomerId::new(id))
        .await
        .map_err(customer_error)?;

    Ok(response::ok_message("Customer deleted successfully"))
}
