//! Contact repository for database operations.

use sqlx::PgPool;

use starfruit_crm_core::{ContactId, CustomerId};

use super::{RepositoryError, classify_write_error};
use crate::models::Contact;

/// A new contact row to insert.
#[derive(Debug)]
pub struct NewContact<'a> {
    pub customer_id: CustomerId,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
}

/// Fields replaced on update (the owning customer never changes).
#[derive(Debug)]
pub struct ContactUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub position: Option<&'a str>,
}

/// Repository for contact database operations.
pub struct ContactRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepository<'a> {
    /// Create a new contact repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all contacts, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Contact>, RepositoryError> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, customer_id, name, email, phone, position, created_at, updated_at
             FROM contacts ORDER BY created_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    /// Get a contact by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ContactId) -> Result<Option<Contact>, RepositoryError> {
        let contact = sqlx::query_as::<_, Contact>(
            "SELECT id, customer_id, name, email, phone, position, created_at, updated_at
             FROM contacts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact)
    }

    /// List contacts belonging to one customer, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Contact>, RepositoryError> {
        let contacts = sqlx::query_as::<_, Contact>(
            "SELECT id, customer_id, name, email, phone, position, created_at, updated_at
             FROM contacts WHERE customer_id = $1 ORDER BY created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    /// Create a new contact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewContact<'_>) -> Result<Contact, RepositoryError> {
        let contact = sqlx::query_as::<_, Contact>(
            "INSERT INTO contacts (customer_id, name, email, phone, position)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, customer_id, name, email, phone, position, created_at, updated_at",
        )
        .bind(new.customer_id)
        .bind(new.name)
        .bind(new.email)
        .bind(new.phone)
        .bind(new.position)
        .fetch_one(self.pool)
        .await
        .map_err(classify_write_error)?;

        Ok(contact)
    }

    /// Replace a contact's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the contact doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ContactId,
        update: &ContactUpdate<'_>,
    ) -> Result<Contact, RepositoryError> {
        let contact = sqlx::query_as::<_, Contact>(
            "UPDATE contacts
             SET name = $2, email = $3, phone = $4, position = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING id, customer_id, name, email, phone, position, created_at, updated_at",
        )
        .bind(id)
        .bind(update.name)
        .bind(update.email)
        .bind(update.phone)
        .bind(update.position)
        .fetch_optional(self.pool)
        .await
        .map_err(classify_write_error)?;

        contact.ok_or(RepositoryError::NotFound)
    }

    /// Delete a contact.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the contact doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ContactId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
