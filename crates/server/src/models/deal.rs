//! Deal domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use starfruit_crm_core::{CustomerId, DealId, DealStatus};

/// A sales deal. Belongs to exactly one customer.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    /// Unique deal ID.
    pub id: DealId,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Deal title.
    pub title: String,
    /// Free-form description, if any.
    pub description: Option<String>,
    /// Monetary value; never negative.
    pub value: Decimal,
    /// Lifecycle status.
    pub status: DealStatus,
    /// When the deal was created.
    pub created_at: DateTime<Utc>,
    /// When the deal was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Aggregate deal counts and values for the dashboard.
///
/// `total_deals` always equals `open_deals + won_deals + lost_deals`.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DealStats {
    pub total_deals: i64,
    pub open_deals: i64,
    pub won_deals: i64,
    pub lost_deals: i64,
    pub total_value: Decimal,
    pub won_value: Decimal,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serializes_camel_case() {
        let stats = DealStats {
            total_deals: 3,
            open_deals: 1,
            won_deals: 1,
            lost_deals: 1,
            total_value: Decimal::new(30000, 2),
            won_value: Decimal::new(10000, 2),
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalDeals"], 3);
        assert_eq!(
            json["totalDeals"].as_i64().unwrap(),
            json["openDeals"].as_i64().unwrap()
                + json["wonDeals"].as_i64().unwrap()
                + json["lostDeals"].as_i64().unwrap()
        );
    }
}
