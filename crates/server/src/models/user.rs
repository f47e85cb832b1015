//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use starfruit_crm_core::{Email, Role, UserId};

/// A CRM user account.
///
/// The password hash is deliberately absent: repositories return it
/// separately so it can never serialize into a response body.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email, stored lowercase.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Access role.
    pub role: Role,
    /// Whether the account may authenticate. Deactivation takes effect on the
    /// next request because the session check re-loads this record.
    pub is_active: bool,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Aggregate user counts for the admin dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_users: i64,
    pub active_users: i64,
    pub admin_users: i64,
    pub regular_users: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_camel_case_without_hash() {
        let user = User {
            id: UserId::new(1),
            email: Email::parse("admin@dumbcrm.com").unwrap(),
            name: "Admin User".to_string(),
            role: Role::Admin,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "admin@dumbcrm.com");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["isActive"], true);
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("createdAt").is_some());
    }
}
