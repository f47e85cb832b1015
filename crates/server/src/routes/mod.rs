//! HTTP route handlers for the CRM API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - API index
//! GET  /health                  - Health check (status, timestamp, uptime)
//!
//! # Auth
//! POST /api/auth/login          - Login, sets the session cookie
//! POST /api/auth/logout         - Logout, clears the session cookie
//! GET  /api/auth/me             - Current user (session required)
//! POST /api/auth/register       - Create account (admin only)
//! POST /api/auth/change-password - Change own password (session required)
//!
//! # Customers (session required)
//! GET    /api/customers         - List customers
//! GET    /api/customers/search  - Search by name/email/company (?q=)
//! GET    /api/customers/{id}    - Customer detail
//! POST   /api/customers         - Create customer
//! PUT    /api/customers/{id}    - Update customer
//! DELETE /api/customers/{id}    - Delete customer (contacts/deals cascade)
//!
//! # Contacts (session required)
//! GET    /api/contacts          - List contacts
//! GET    /api/contacts/customer/{customer_id} - Contacts of one customer
//! GET    /api/contacts/{id}     - Contact detail
//! POST   /api/contacts          - Create contact
//! PUT    /api/contacts/{id}     - Update contact
//! DELETE /api/contacts/{id}     - Delete contact
//!
//! # Deals (session required)
//! GET    /api/deals             - List deals
//! GET    /api/deals/stats       - Aggregate counts and values
//! GET    /api/deals/customer/{customer_id} - Deals of one customer
//! GET    /api/deals/status/{status} - Deals in one status
//! GET    /api/deals/{id}        - Deal detail
//! POST   /api/deals             - Create deal
//! PUT    /api/deals/{id}        - Update deal
//! DELETE /api/deals/{id}        - Delete deal
//!
//! # Users (admin only)
//! GET    /api/users             - List users
//! GET    /api/users/stats       - Aggregate user counts
//! GET    /api/users/{id}        - User detail
//! POST   /api/users             - Create user
//! PUT    /api/users/{id}        - Update user
//! DELETE /api/users/{id}        - Delete user (self-delete refused)
//! POST   /api/users/{id}/toggle-status - Flip active flag (self refused)
//! ```

pub mod auth;
pub mod contacts;
pub mod customers;
pub mod deals;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/register", post(auth::register))
        .route("/change-password", post(auth::change_password))
}

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route("/search", get(customers::search))
        .route(
            "/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::remove),
        )
}

/// Create the contact routes router.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(contacts::list).post(contacts::create))
        .route("/customer/{customer_id}", get(contacts::list_by_customer))
        .route(
            "/{id}",
            get(contacts::show)
                .put(contacts::update)
                .delete(contacts::remove),
        )
}

/// Create the deal routes router.
pub fn deal_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(deals::list).post(deals::create))
        .route("/stats", get(deals::stats))
        .route("/customer/{customer_id}", get(deals::list_by_customer))
        .route("/status/{status}", get(deals::list_by_status))
        .route(
            "/{id}",
            get(deals::show).put(deals::update).delete(deals::remove),
        )
}

/// Create the user management routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list).post(users::create))
        .route("/stats", get(users::stats))
        .route(
            "/{id}",
            get(users::show).put(users::update).delete(users::remove),
        )
        .route("/{id}/toggle-status", post(users::toggle_status))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/customers", customer_routes())
        .nest("/api/contacts", contact_routes())
        .nest("/api/deals", deal_routes())
        .nest("/api/users", user_routes())
}

// =============================================================================
// Payload helpers
// =============================================================================

/// Treat missing and blank strings the same way: absent.
pub(crate) fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// Parse a monetary amount from a JSON number or numeric string.
pub(crate) fn parse_money(value: &Value) -> Option<Decimal> {
    let s = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_owned(),
        _ => return None,
    };

    s.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&s).ok())
}

/// Parse an entity reference from a JSON number or numeric string.
pub(crate) fn parse_ref_id(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some("  x ".to_string())), Some("x".to_string()));
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("   ".to_string())), None);
        assert_eq!(non_empty(None), None);
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money(&json!(100)), Some(Decimal::from(100)));
        assert_eq!(
            parse_money(&json!(99.5)),
            Some("99.5".parse::<Decimal>().unwrap())
        );
        assert_eq!(parse_money(&json!("250.75")), "250.75".parse().ok());
        assert_eq!(parse_money(&json!(-1)), Some(Decimal::from(-1)));
        assert_eq!(parse_money(&json!("abc")), None);
        assert_eq!(parse_money(&json!(null)), None);
        assert_eq!(parse_money(&json!([1])), None);
    }

    #[test]
    fn test_parse_ref_id() {
        assert_eq!(parse_ref_id(&json!(3)), Some(3));
        assert_eq!(parse_ref_id(&json!("3")), Some(3));
        assert_eq!(parse_ref_id(&json!(2.5)), None);
        assert_eq!(parse_ref_id(&json!("three")), None);
        assert_eq!(parse_ref_id(&json!(null)), None);
    }
}
