//! Customer repository for database operations.

use sqlx::PgPool;

use starfruit_crm_core::CustomerId;

use super::{RepositoryError, classify_write_error};
use crate::models::Customer;

/// A new customer row to insert.
#[derive(Debug)]
pub struct NewCustomer<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
}

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, company, created_at, updated_at
             FROM customers ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, company, created_at, updated_at
             FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Case-insensitive substring search across name, email, and company.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Customer>, RepositoryError> {
        let pattern = format!("%{query}%");
        let customers = sqlx::query_as::<_, Customer>(
            "SELECT id, name, email, phone, company, created_at, updated_at
             FROM customers
             WHERE name ILIKE $1 OR email ILIKE $1 OR company ILIKE $1
             ORDER BY created_at DESC",
        )
        .bind(&pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewCustomer<'_>) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "INSERT INTO customers (name, email, phone, company)
             VALUES ($1, $2, $3, $4)
             RETURNING id, name, email, phone, company, created_at, updated_at",
        )
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.company)
        .fetch_one(self.pool)
        .await
        .map_err(classify_write_error)?;

        Ok(customer)
    }

    /// Replace a customer's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        new: &NewCustomer<'_>,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "UPDATE customers
             SET name = $2, email = $3, phone = $4, company = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING id, name, email, phone, company, created_at, updated_at",
        )
        .bind(id)
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.company)
        .fetch_optional(self.pool)
        .await
        .map_err(classify_write_error)?;

        customer.ok_or(RepositoryError::NotFound)
    }

    /// Delete a customer. Dependent contacts and deals cascade at the schema
    /// layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
