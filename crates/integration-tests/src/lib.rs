//! Integration tests for Starfruit CRM.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and server against a fresh database
//! createdb starfruit_test
//! DATABASE_URL=postgres://localhost/starfruit_test cargo run -p starfruit-crm-server
//!
//! # Run integration tests (ignored by default)
//! cargo test -p starfruit-crm-integration-tests -- --ignored
//! ```
//!
//! The tests assume the first-boot bootstrap admin (`admin@dumbcrm.com` /
//! `admin123`) still exists with its initial password.
//!
//! # Test Categories
//!
//! - `auth` - Login, sessions, and the admin gate
//! - `api` - Entity CRUD, search, and statistics

use reqwest::Client;
use serde_json::{Value, json};

/// Email of the admin account created on first boot.
pub const BOOTSTRAP_ADMIN_EMAIL: &str = "admin@dumbcrm.com";

/// Initial password of the bootstrap admin.
pub const BOOTSTRAP_ADMIN_PASSWORD: &str = "admin123";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so Set-Cookie from login
/// carries the session into later requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Log in and return the raw token from the response body.
///
/// The client's cookie store also picks up the session cookie as a side
/// effect.
///
/// # Panics
///
/// Panics if the login request fails or the response carries no token.
pub async fn login(client: &Client, email: &str, password: &str) -> String {
    let resp = client
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");

    assert!(
        resp.status().is_success(),
        "login failed with status {}",
        resp.status()
    );

    let body: Value = resp.json().await.expect("Failed to parse login response");
    body["data"]["token"]
        .as_str()
        .expect("login response carried no token")
        .to_owned()
}

/// Log in as the bootstrap admin and return the token.
pub async fn login_as_admin(client: &Client) -> String {
    login(client, BOOTSTRAP_ADMIN_EMAIL, BOOTSTRAP_ADMIN_PASSWORD).await
}

/// Create a regular (non-admin) user via the admin API and return its
/// `(id, email, password)`.
///
/// # Panics
///
/// Panics if the create request fails.
pub async fn create_test_user(admin_client: &Client) -> (i64, String, String) {
    let email = format!("user-{}@example.com", uuid::Uuid::new_v4());
    let password = format!("pw-{}", uuid::Uuid::new_v4());

    let resp = admin_client
        .post(format!("{}/api/users", base_url()))
        .json(&json!({
            "email": email,
            "password": password,
            "name": "Test User",
            "role": "user"
        }))
        .send()
        .await
        .expect("Failed to create test user");

    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse user response");
    let id = body["data"]["id"].as_i64().expect("user response had no id");

    (id, email, password)
}
