//! Customer domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use starfruit_crm_core::CustomerId;

/// A customer company/account. Owns contacts and deals.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Customer name.
    pub name: String,
    /// Primary email (unique).
    pub email: String,
    /// Phone number, if known.
    pub phone: Option<String>,
    /// Company name, if known.
    pub company: Option<String>,
    /// When the customer was created.
    pub created_at: DateTime<Utc>,
    /// When the customer was last updated.
    pub updated_at: DateTime<Utc>,
}
