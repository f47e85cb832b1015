//! Integration tests for authentication and sessions.
//!
//! These tests require:
//! - A running `PostgreSQL` database
//! - The server running against it (cargo run -p starfruit-crm-server)
//! - The bootstrap admin still using its initial password
//!
//! Run with: cargo test -p starfruit-crm-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use starfruit_crm_integration_tests::{
    BOOTSTRAP_ADMIN_EMAIL, base_url, client, create_test_user, login, login_as_admin,
};

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_health_endpoint() {
    let resp = client()
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to get health");

    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse health response");
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert!(body["uptime"].as_f64().expect("uptime missing") >= 0.0);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_login_requires_email_and_password() {
    let resp = client()
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_bootstrap_admin_login_sets_cookie() {
    let resp = client()
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({
            "email": BOOTSTRAP_ADMIN_EMAIL,
            "password": "admin123"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(
        resp.headers().contains_key(reqwest::header::SET_COOKIE),
        "login response carried no Set-Cookie header"
    );

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["role"], "admin");
    assert_eq!(body["data"]["user"]["email"], BOOTSTRAP_ADMIN_EMAIL);
    assert!(body["data"]["token"].is_string());
    // The hash must never serialize into a response
    assert!(body["data"]["user"].get("password").is_none());
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let c = client();

    let unknown = c
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({
            "email": format!("nobody-{}@example.com", uuid::Uuid::new_v4()),
            "password": "whatever"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    let unknown_status = unknown.status();
    let unknown_body: Value = unknown.json().await.expect("Failed to parse response");

    let wrong = c
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({
            "email": BOOTSTRAP_ADMIN_EMAIL,
            "password": "definitely-not-the-password"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    let wrong_status = wrong.status();
    let wrong_body: Value = wrong.json().await.expect("Failed to parse response");

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    // Identical bodies: the response must not reveal whether the email exists
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_login_is_case_insensitive_on_email() {
    let c = client();
    let token = login(&c, "Admin@DumbCRM.com", "admin123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_me_requires_session() {
    let resp = client()
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .expect("Failed to get /me");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_me_with_cookie_session() {
    let c = client();
    login_as_admin(&c).await;

    // Cookie store carries the session; no bearer header needed
    let resp = c
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .expect("Failed to get /me");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["email"], BOOTSTRAP_ADMIN_EMAIL);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_me_with_bearer_token() {
    let c = client();
    let token = login_as_admin(&c).await;

    let resp = client() // fresh client: no cookies
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get /me");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_malformed_token_rejected() {
    let resp = client()
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth("not.a.token")
        .send()
        .await
        .expect("Failed to get /me");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_protected_routes_require_session() {
    let c = client();
    for path in ["/api/customers", "/api/contacts", "/api/deals"] {
        let resp = c
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_admin_routes_reject_non_admin() {
    let admin = client();
    login_as_admin(&admin).await;
    let (_, email, password) = create_test_user(&admin).await;

    let user = client();
    let token = login(&user, &email, &password).await;

    let resp = client()
        .get(format!("{}/api/users", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list users");

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_deactivation_invalidates_live_tokens() {
    let admin = client();
    login_as_admin(&admin).await;
    let (id, email, password) = create_test_user(&admin).await;

    // The user logs in and holds an unexpired token
    let user = client();
    let token = login(&user, &email, &password).await;

    let before = client()
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get /me");
    assert_eq!(before.status(), StatusCode::OK);

    // Admin deactivates the account
    let toggled = admin
        .post(format!("{}/api/users/{id}/toggle-status", base_url()))
        .send()
        .await
        .expect("Failed to toggle status");
    assert_eq!(toggled.status(), StatusCode::OK);

    // The very next request with the same token is rejected: the session
    // check re-loads the user, so no revocation list is needed
    let after = client()
        .get(format!("{}/api/auth/me", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to get /me");
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);

    // A fresh login is refused with the distinguishable deactivation message
    let relogin = client()
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(relogin.status(), StatusCode::UNAUTHORIZED);
    let body: Value = relogin.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Account is deactivated");
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_change_password_flow() {
    let admin = client();
    login_as_admin(&admin).await;
    let (_, email, password) = create_test_user(&admin).await;

    let user = client();
    login(&user, &email, &password).await;

    // Wrong current password is refused
    let wrong = user
        .post(format!("{}/api/auth/change-password", base_url()))
        .json(&json!({
            "currentPassword": "not-the-password",
            "newPassword": "new-password-123"
        }))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    // Correct current password succeeds
    let ok = user
        .post(format!("{}/api/auth/change-password", base_url()))
        .json(&json!({
            "currentPassword": password,
            "newPassword": "new-password-123"
        }))
        .send()
        .await
        .expect("Failed to change password");
    assert_eq!(ok.status(), StatusCode::OK);

    // Old password no longer works, new one does
    let stale = client()
        .post(format!("{}/api/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    login(&client(), &email, "new-password-123").await;
}

#[tokio::test]
#[ignore = "Requires a running server and database"]
async fn test_logout_clears_cookie() {
    let c = client();
    login_as_admin(&c).await;

    let resp = c
        .post(format!("{}/api/auth/logout", base_url()))
        .send()
        .await
        .expect("Failed to logout");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);

    // The cookie store saw the clearing Set-Cookie, so the session is gone
    let me = c
        .get(format!("{}/api/auth/me", base_url()))
        .send()
        .await
        .expect("Failed to get /me");
    assert_eq!(me.status(), StatusCode::UNAUTHORIZED);
}
