//! Integration tests for reverse share invites.

mod helpers;

use axum::http::StatusCode;
use chrono::{DateTime, Duration, Utc};
use helpers::TestApp;

use inbound_core::config::{AccountMatch, AppConfig};

#[tokio::test]
async fn test_invite_creates_guest_invite_and_mail() {
    let app = TestApp::new().await;
    let (owner_id, token) = app.owner().await;

    let before = Utc::now();
    let resp = app.invite(&token, "a@x.com").await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    assert_eq!(resp.body["status"], "success");

    let invite = &resp.body["data"]["invite"];
    assert_eq!(invite["user_id"], owner_id.to_string());
    assert_eq!(invite["recipient_email"], "a@x.com");
    assert_eq!(invite["recipient_name"], "Gus Guest");

    let expires_at: DateTime<Utc> =
        serde_json::from_value(invite["expires_at"].clone()).unwrap();
    let expected = before + Duration::days(7);
    assert!((expires_at - expected).num_seconds().abs() < 60);

    // The guest exists, cannot be reached by the recipient address and is
    // not a login account.
    let guest = app
        .stores
        .users
        .find_guest_for("a@x.com")
        .await
        .unwrap()
        .expect("guest created");
    assert!(guest.is_guest);
    assert_ne!(guest.email, "a@x.com");
    assert_eq!(invite["guest_user_id"], guest.id.to_string());
    assert!(app.stores.users.find_by_email("a@x.com").await.unwrap().is_none());

    let mail = app.next_mail().await.expect("mail queued");
    assert_eq!(mail["job_type"], "send_email");
    assert_eq!(mail["recipient"], "a@x.com");
    assert_eq!(mail["template"], "reverse_share_invite");
    assert_eq!(mail["payload"]["user"]["id"], owner_id.to_string());
    assert!(!mail["payload"]["token"].as_str().unwrap().is_empty());
    assert!(app.next_mail().await.is_none());
}

#[tokio::test]
async fn test_invite_rejected_when_feature_disabled() {
    let app = TestApp::new().await;
    app.allow_reverse_shares(false).await;
    let (owner_id, token) = app.owner().await;

    let resp = app.invite(&token, "a@x.com").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["status"], "error");
    assert_eq!(resp.body["message"], "Reverse shares are not allowed");

    assert!(app.stores.users.find_guest_for("a@x.com").await.unwrap().is_none());
    assert!(app.stores.invites.list_for_owner(owner_id).await.unwrap().is_empty());
    assert!(app.next_mail().await.is_none());
}

#[tokio::test]
async fn test_disabled_feature_answers_before_body_checks() {
    let app = TestApp::new().await;
    app.allow_reverse_shares(false).await;
    let (_, token) = app.owner().await;

    let bodies = [
        serde_json::json!({ "recipient_name": "", "recipient_email": "not-an-email" }),
        serde_json::json!({ "recipient_name": "Gus" }),
    ];
    for body in bodies {
        let resp = app
            .request("POST", "/api/reverse-shares/invite", Some(body), Some(&token))
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body["message"], "Reverse shares are not allowed");
    }

    let resp = app
        .request(
            "POST",
            "/api/reverse-shares/invite",
            Some(serde_json::json!({ "recipient_email": "not-an-email" })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_anonymous_invalid_invite_is_unauthorized() {
    let app = TestApp::new().await;

    let resp = app
        .request(
            "POST",
            "/api/reverse-shares/invite",
            Some(serde_json::json!({ "recipient_email": "not-an-email" })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invite_rejected_when_flag_never_set() {
    let app = TestApp::with_config(AppConfig::default()).await;
    let (_, token) = app.owner().await;

    let resp = app.invite(&token, "a@x.com").await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert!(app.next_mail().await.is_none());
}

#[tokio::test]
async fn test_invite_requires_owner_token() {
    let app = TestApp::new().await;

    let resp = app
        .request(
            "POST",
            "/api/reverse-shares/invite",
            Some(serde_json::json!({
                "recipient_name": "Gus Guest",
                "recipient_email": "a@x.com",
            })),
            None,
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp.body["message"], "Unauthorized");

    let resp = app
        .request(
            "POST",
            "/api/reverse-shares/invite",
            Some(serde_json::json!({
                "recipient_name": "Gus Guest",
                "recipient_email": "a@x.com",
            })),
            Some("not-a-jwt"),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
    assert!(app.next_mail().await.is_none());
}

#[tokio::test]
async fn test_invite_validation_errors() {
    let app = TestApp::new().await;
    let (_, token) = app.owner().await;

    let resp = app
        .request(
            "POST",
            "/api/reverse-shares/invite",
            Some(serde_json::json!({
                "recipient_name": "",
                "recipient_email": "not-an-email",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["message"], "Validation failed");
    let errors = &resp.body["data"]["errors"];
    assert!(errors["recipient_email"].is_array());
    assert!(errors["recipient_name"].is_array());

    let resp = app
        .request(
            "POST",
            "/api/reverse-shares/invite",
            Some(serde_json::json!({ "recipient_name": "Gus" })),
            Some(&token),
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(app.next_mail().await.is_none());
}

#[tokio::test]
async fn test_repeat_invites_reuse_guest() {
    let app = TestApp::new().await;
    let (owner_id, token) = app.owner().await;

    let first = app.invite(&token, "a@x.com").await;
    let second = app.invite(&token, "a@x.com").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);

    assert_eq!(
        first.body["data"]["invite"]["guest_user_id"],
        second.body["data"]["invite"]["guest_user_id"]
    );
    assert_ne!(
        first.body["data"]["invite"]["id"],
        second.body["data"]["invite"]["id"]
    );
    assert_eq!(app.stores.invites.list_for_owner(owner_id).await.unwrap().len(), 2);

    let first_token = app.guest_token().await;
    let second_token = app.guest_token().await;
    assert_ne!(first_token, second_token);
}

#[tokio::test]
async fn test_guests_only_keeps_invite_off_real_account() {
    let mut config = AppConfig::default();
    config.reverse_share.account_match = AccountMatch::GuestsOnly;
    let app = TestApp::with_config(config).await;
    app.allow_reverse_shares(true).await;

    let (_, token) = app.owner().await;
    let colleague = app.create_owner("Carl Colleague", "carl@example.com").await;

    let resp = app.invite(&token, "carl@example.com").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_ne!(
        resp.body["data"]["invite"]["guest_user_id"],
        colleague.to_string()
    );
}

#[tokio::test]
async fn test_any_match_reuses_real_account() {
    let app = TestApp::new().await;
    let (_, token) = app.owner().await;
    let colleague = app.create_owner("Carl Colleague", "carl@example.com").await;

    let resp = app.invite(&token, "carl@example.com").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body["data"]["invite"]["guest_user_id"],
        colleague.to_string()
    );
}
