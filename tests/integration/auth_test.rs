//! Integration tests for owner login and health.

mod helpers;

use axum::http::StatusCode;
use helpers::{OWNER_PASSWORD, TestApp};

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    app.create_owner("Olivia Owner", "olivia@example.com").await;

    let resp = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "olivia@example.com",
                "password": OWNER_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "success");
    assert!(resp.body["data"]["access_token"].is_string());
    assert!(resp.body["data"]["expires_at"].is_string());
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new().await;
    app.create_owner("Olivia Owner", "olivia@example.com").await;

    let resp = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "olivia@example.com",
                "password": "wrong",
            })),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let app = TestApp::new().await;

    let resp = app
        .request(
            "POST",
            "/api/auth/login",
            Some(serde_json::json!({
                "email": "nobody@example.com",
                "password": OWNER_PASSWORD,
            })),
            None,
        )
        .await;

    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Invalid email or password");
}

#[tokio::test]
async fn test_guest_placeholder_cannot_log_in() {
    let app = TestApp::new().await;
    let (_, token) = app.owner().await;
    let resp = app.invite(&token, "a@x.com").await;
    assert_eq!(resp.status, StatusCode::OK);

    let guest = app
        .stores
        .users
        .find_guest_for("a@x.com")
        .await
        .unwrap()
        .unwrap();

    for email in ["a@x.com", guest.email.as_str()] {
        let resp = app
            .request(
                "POST",
                "/api/auth/login",
                Some(serde_json::json!({ "email": email, "password": "guess" })),
                None,
            )
            .await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;

    let resp = app.request("GET", "/api/health", None, None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "success");
    assert_eq!(resp.body["data"]["status"], "ok");
}
