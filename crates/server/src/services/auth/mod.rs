//! Authentication service.
//!
//! Credential checks, password hashing, and account lifecycle operations.
//! Tokens are a separate concern; see [`crate::services::tokens`].

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use starfruit_crm_core::{Email, Role};

use crate::db::RepositoryError;
use crate::db::users::{NewUser, UserRepository};
use crate::models::User;

/// Email of the admin account created on an empty database.
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@dumbcrm.com";

/// Initial password of the bootstrap admin. Meant to be changed immediately.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

/// Authentication service.
///
/// Handles login, account creation, and password changes.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Login with email and password.
    ///
    /// The unknown-email and wrong-password outcomes are identical on
    /// purpose; only deactivation is distinguishable.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::AccountDeactivated` if the account is inactive.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // A malformed email can't match any stored (validated) address, so it
        // collapses into the same outcome as an unknown one.
        let Ok(email) = Email::parse(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let (user, password_hash) = self
            .users
            .get_by_email_with_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Create a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already taken.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: Role,
        is_active: bool,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&NewUser {
                email: &email,
                password_hash: &password_hash,
                name,
                role,
                is_active,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Change a user's password after re-verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WrongCurrentPassword` if the current password
    /// doesn't match.
    pub async fn change_password(
        &self,
        user: &User,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let (_, password_hash) = self
            .users
            .get_by_email_with_hash(&user.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(current_password, &password_hash)
            .map_err(|_| AuthError::WrongCurrentPassword)?;

        let new_hash = hash_password(new_password)?;
        self.users.set_password_hash(user.id, &new_hash).await?;

        Ok(())
    }

    /// Hash a password and apply a partial account update.
    ///
    /// Used by admin user management when a password accompanies other field
    /// changes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub fn hash_for_update(&self, password: &str) -> Result<String, AuthError> {
        hash_password(password)
    }

    /// Create the default admin account if the database holds no users yet.
    ///
    /// Returns the created account, or `None` when users already exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Repository` if the database operation fails.
    pub async fn bootstrap_admin(&self) -> Result<Option<User>, AuthError> {
        if self.users.count().await? > 0 {
            return Ok(None);
        }

        let user = self
            .create_user(
                BOOTSTRAP_ADMIN_EMAIL,
                BOOTSTRAP_ADMIN_PASSWORD,
                "Admin User",
                Role::Admin,
                true,
            )
            .await?;

        Ok(Some(user))
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("admin123").unwrap();
        assert!(verify_password("admin123", &hash).is_ok());
        assert!(verify_password("admin124", &hash).is_err());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("admin123").unwrap();
        let b = hash_password("admin123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(
            verify_password("whatever", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
