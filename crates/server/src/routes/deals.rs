//! Deal routes.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::Response;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use starfruit_crm_core::{CustomerId, DealId, DealStatus};

use crate::db::RepositoryError;
use crate::db::deals::{DealRepository, DealUpdate, NewDeal};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAuth;
use crate::response;
use crate::state::AppState;

use super::{non_empty, parse_money, parse_ref_id};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealPayload {
    pub customer_id: Option<Value>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDealPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    pub value: Option<Value>,
    pub status: Option<String>,
}

/// Map repository errors onto this entity's client-facing responses.
fn deal_error(e: RepositoryError) -> ApiError {
    match e {
        RepositoryError::NotFound => ApiError::NotFound("Deal not found".to_owned()),
        RepositoryError::ForeignKey(_) => ApiError::BadRequest("Invalid customer ID".to_owned()),
        other => ApiError::Database(other),
    }
}

/// Parse and range-check a deal value from the payload.
fn checked_value(value: Option<&Value>) -> Result<Decimal> {
    let amount = value
        .and_then(parse_money)
        .ok_or_else(|| ApiError::BadRequest("Value must be a positive number".to_owned()))?;

    if amount < Decimal::ZERO {
        return Err(ApiError::BadRequest(
            "Value must be a positive number".to_owned(),
        ));
    }

    Ok(amount)
}

/// Parse an optional status field, defaulting to `open`.
fn checked_status(status: Option<String>) -> Result<DealStatus> {
    match non_empty(status) {
        Some(raw) => raw
            .parse::<DealStatus>()
            .map_err(|_| ApiError::BadRequest("Invalid status".to_owned())),
        None => Ok(DealStatus::Open),
    }
}

/// GET /api/deals
pub async fn list(State(state): State<AppState>, RequireAuth(_user): RequireAuth) -> Result<Response> {
    let deals = DealRepository::new(state.pool()).list().await?;
    Ok(response::ok(deals))
}

/// GET /api/deals/stats
pub async fn stats(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Response> {
    let stats = DealRepository::new(state.pool()).stats().await?;
    Ok(response::ok(stats))
}

/// GET /api/deals/{id}
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    let deal = DealRepository::new(state.pool())
        .get_by_id(DealId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Deal not found".to_owned()))?;

    Ok(response::ok(deal))
}

/// GET /api/deals/customer/{customer_id}
pub async fn list_by_customer(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(customer_id): Path<i32>,
) -> Result<Response> {
    let deals = DealRepository::new(state.pool())
        .list_by_customer(CustomerId::new(customer_id))
        .await?;

    Ok(response::ok(deals))
}

/// GET /api/deals/status/{status}
pub async fn list_by_status(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(status): Path<String>,
) -> Result<Response> {
    let status = status
        .parse::<DealStatus>()
        .map_err(|_| ApiError::BadRequest("Invalid status".to_owned()))?;

    let deals = DealRepository::new(state.pool()).list_by_status(status).await?;
    Ok(response::ok(deals))
}

/// POST /api/deals
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<CreateDealPayload>,
) -> Result<Response> {
    let customer_id = body.customer_id.as_ref().and_then(parse_ref_id);
    let (Some(customer_id), Some(title), Some(_)) =
        (customer_id, non_empty(body.title), body.value.as_ref())
    else {
        return Err(ApiError::BadRequest(
            "Customer ID, title, and value are required".to_owned(),
        ));
    };

    let value = checked_value(body.value.as_ref())?;
    let status = checked_status(body.status)?;
    let description = non_empty(body.description);

    let deal = DealRepository::new(state.pool())
        .create(&NewDeal {
            customer_id: CustomerId::new(customer_id),
            title: &title,
            description: description.as_deref(),
            value,
            status,
        })
        .await
        .map_err(deal_error)?;

    Ok(response::created(deal))
}

/// PUT /api/deals/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
    Json(body): Json<UpdateDealPayload>,
) -> Result<Response> {
    let (Some(title), Some(_)) = (non_empty(body.title), body.value.as_ref()) else {
        return Err(ApiError::BadRequest("Title and value are required".to_owned()));
    };

    let value = checked_value(body.value.as_ref())?;
    let status = checked_status(body.status)?;
    let description = non_empty(body.description);

    let deal = DealRepository::new(state.pool())
        .update(
            DealId::new(id),
            &DealUpdate {
                title: &title,
                description: description.as_deref(),
                value,
                status,
            },
        )
        .await
        .map_err(deal_error)?;

    Ok(response::ok(deal))
}

/// DELETE /api/deals/{id}
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Response> {
    DealRepository::new(state.pool())
        .delete(DealId::new(id))
        .await
        .map_err(deal_error)?;

    Ok(response::ok_message("Deal deleted successfully"))
}
