//! Deal repository for database operations.

use rust_decimal::Decimal;
use sqlx::PgPool;

use starfruit_crm_core::{CustomerId, DealId, DealStatus};

use super::{RepositoryError, classify_write_error};
use crate::models::deal::{Deal, DealStats};

/// A new deal row to insert.
#[derive(Debug)]
pub struct NewDeal<'a> {
    pub customer_id: CustomerId,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub value: Decimal,
    pub status: DealStatus,
}

/// Fields replaced on update (the owning customer never changes).
#[derive(Debug)]
pub struct DealUpdate<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub value: Decimal,
    pub status: DealStatus,
}

/// Repository for deal database operations.
pub struct DealRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DealRepository<'a> {
    /// Create a new deal repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all deals, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Deal>, RepositoryError> {
        let deals = sqlx::query_as::<_, Deal>(
            "SELECT id, customer_id, title, description, value, status, created_at, updated_at
             FROM deals ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(deals)
    }

    /// Get a deal by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: DealId) -> Result<Option<Deal>, RepositoryError> {
        let deal = sqlx::query_as::<_, Deal>(
            "SELECT id, customer_id, title, description, value, status, created_at, updated_at
             FROM deals WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(deal)
    }

    /// List deals belonging to one customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Deal>, RepositoryError> {
        let deals = sqlx::query_as::<_, Deal>(
            "SELECT id, customer_id, title, description, value, status, created_at, updated_at
             FROM deals WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(deals)
    }

    /// List deals in one lifecycle status, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_status(
        &self,
        status: DealStatus,
    ) -> Result<Vec<Deal>, RepositoryError> {
        let deals = sqlx::query_as::<_, Deal>(
            "SELECT id, customer_id, title, description, value, status, created_at, updated_at
             FROM deals WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status)
        .fetch_all(self.pool)
        .await?;

        Ok(deals)
    }

    /// Create a new deal.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewDeal<'_>) -> Result<Deal, RepositoryError> {
        let deal = sqlx::query_as::<_, Deal>(
            "INSERT INTO deals (customer_id, title, description, value, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, customer_id, title, description, value, status, created_at, updated_at",
        )
        .bind(new.customer_id)
        .bind(new.title)
        .bind(new.description)
        .bind(new.value)
        .bind(new.status)
        .fetch_one(self.pool)
        .await
        .map_err(classify_write_error)?;

        Ok(deal)
    }

    /// Replace a deal's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the deal doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: DealId,
        update: &DealUpdate<'_>,
    ) -> Result<Deal, RepositoryError> {
        let deal = sqlx::query_as::<_, Deal>(
            "UPDATE deals
             SET title = $2, description = $3, value = $4, status = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING id, customer_id, title, description, value, status, created_at, updated_at",
        )
        .bind(id)
        .bind(update.title)
        .bind(update.description)
        .bind(update.value)
        .bind(update.status)
        .fetch_optional(self.pool)
        .await
        .map_err(classify_write_error)?;

        deal.ok_or(RepositoryError::NotFound)
    }

    /// Delete a deal.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the deal doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: DealId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM deals WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Aggregate deal counts and values in one pass.
    ///
    /// The count columns partition the table, so `total_deals` always equals
    /// the sum of the per-status counts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stats(&self) -> Result<DealStats, RepositoryError> {
        let stats = sqlx::query_as::<_, DealStats>(
            "SELECT COUNT(*) AS total_deals,
                    COUNT(*) FILTER (WHERE status = 'open') AS open_deals,
                    COUNT(*) FILTER (WHERE status = 'won') AS won_deals,
                    COUNT(*) FILTER (WHERE status = 'lost') AS lost_deals,
                    COALESCE(SUM(value), 0) AS total_value,
                    COALESCE(SUM(value) FILTER (WHERE status = 'won'), 0) AS won_value
             FROM deals",
        )
        .fetch_one(self.pool)
        .await?;

        Ok(stats)
    }
}
