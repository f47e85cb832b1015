//! Contact domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use starfruit_crm_core::{ContactId, CustomerId};

/// A person at a customer. Belongs to exactly one customer.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Unique contact ID.
    pub id: ContactId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Phone number, if known.
    pub phone: Option<String>,
    /// Job title, if known.
    pub position: Option<String>,
    /// When the contact was created.
    pub created_at: DateTime<Utc>,
    /// When the contact was last updated.
    pub updated_at: DateTime<Utc>,
}
