//! Integration tests for guest uploads behind the malware scan.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::TestApp;

use inbound_core::types::{ScanFailure, ScanVerdict};
use inbound_entity::invite::CreateReverseShareInvite;
use inbound_entity::user::CreateUser;

/// Owner, one invite for a@x.com and the guest token from its mail.
async fn invited(app: &TestApp) -> String {
    let (_, token) = app.owner().await;
    let resp = app.invite(&token, "a@x.com").await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    app.guest_token().await
}

fn stored_files(app: &TestApp, dir: &str) -> usize {
    fn count(path: &std::path::Path) -> usize {
        std::fs::read_dir(path)
            .map(|entries| {
                entries
                    .flatten()
                    .map(|e| {
                        let p = e.path();
                        if p.is_dir() { count(&p) } else { 1 }
                    })
                    .sum()
            })
            .unwrap_or(0)
    }
    count(&app.storage.path().join(dir))
}

#[tokio::test]
async fn test_clean_upload_is_stored() {
    let app = TestApp::new().await;
    let guest_token = invited(&app).await;

    let resp = app
        .upload(Some(&guest_token), "file", "contract.pdf", b"%PDF-1.7 signed")
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);

    let receipt = &resp.body["data"];
    assert_eq!(receipt["file_name"], "contract.pdf");
    assert_eq!(receipt["size_bytes"], 15);
    assert_eq!(receipt["verdict"], "clean");

    let path = receipt["path"].as_str().unwrap();
    assert!(path.starts_with("reverse-shares/"));
    let stored = std::fs::read(app.storage.path().join(path)).unwrap();
    assert_eq!(stored, b"%PDF-1.7 signed");
    assert_eq!(stored_files(&app, "temp"), 0);
}

#[tokio::test]
async fn test_infected_upload_is_rejected() {
    let app = TestApp::new().await;
    let guest_token = invited(&app).await;
    app.scanner
        .set(ScanVerdict::Infected {
            signatures: vec!["Eicar-Test".into()],
        })
        .await;

    let resp = app
        .upload(Some(&guest_token), "file", "f.exe", b"X5O!P%@AP[4\\PZX54(P^)7CC)7}")
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["status"], "error");
    assert_eq!(resp.body["data"]["signatures"][0], "Eicar-Test");

    assert_eq!(stored_files(&app, "temp"), 0);
    assert_eq!(stored_files(&app, "reverse-shares"), 0);
}

#[tokio::test]
async fn test_undetermined_scan_is_never_accepted() {
    let app = TestApp::new().await;
    let guest_token = invited(&app).await;
    app.scanner
        .set(ScanVerdict::Undetermined {
            reason: ScanFailure::Timeout,
        })
        .await;

    let resp = app
        .upload(Some(&guest_token), "file", "notes.txt", b"hello")
        .await;
    assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(stored_files(&app, "reverse-shares"), 0);
    assert_eq!(stored_files(&app, "temp"), 0);
}

#[tokio::test]
async fn test_upload_requires_guest_token() {
    let app = TestApp::new().await;

    let resp = app.upload(None, "file", "notes.txt", b"hello").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);

    let resp = app
        .upload(Some("bm90LWEtdG9rZW4"), "file", "notes.txt", b"hello")
        .await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_owner_access_token_is_not_a_guest_token() {
    let app = TestApp::new().await;
    let (_, token) = app.owner().await;

    let resp = app.upload(Some(&token), "file", "notes.txt", b"hello").await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_missing_file_field() {
    let app = TestApp::new().await;
    let guest_token = invited(&app).await;

    let resp = app
        .upload(Some(&guest_token), "attachment", "notes.txt", b"hello")
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.body["data"]["errors"]["file"].is_array());
}

#[tokio::test]
async fn test_expired_invite_refuses_upload() {
    let app = TestApp::new().await;
    let owner_id = app.create_owner("Olivia Owner", "olivia@example.com").await;

    let guest = app
        .stores
        .users
        .create_guest(
            "late@x.com",
            &CreateUser {
                name: "Late Guest".into(),
                email: "placeholder-late-guest".into(),
                password_hash: "unusable".into(),
                is_guest: true,
            },
        )
        .await
        .unwrap();
    let invite = app
        .stores
        .invites
        .create(&CreateReverseShareInvite::new(
            owner_id,
            guest.id,
            "Late Guest",
            "late@x.com",
            None,
            Utc::now() - Duration::days(8),
        ))
        .await
        .unwrap();

    let guest_token = app.issue_guest_token(guest.id, invite.id);
    let resp = app
        .upload(Some(&guest_token), "file", "notes.txt", b"hello")
        .await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
    assert_eq!(resp.body["message"], "No active reverse share invite");
}

#[tokio::test]
async fn test_upload_goes_to_the_inviting_owner() {
    let app = TestApp::new().await;
    let (olivia, olivia_token) = app.owner().await;
    let oscar = app.create_owner("Oscar Owner", "oscar@example.com").await;
    let oscar_token = app.login("oscar@example.com").await;

    let resp = app.invite(&olivia_token, "bob@example.com").await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    let olivia_invite = resp.body["data"]["invite"]["id"].as_str().unwrap().to_string();
    let olivia_guest_token = app.guest_token().await;

    let resp = app.invite(&oscar_token, "bob@example.com").await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    let oscar_invite = resp.body["data"]["invite"]["id"].as_str().unwrap().to_string();
    let oscar_guest_token = app.guest_token().await;

    let resp = app
        .upload(Some(&olivia_guest_token), "file", "for-olivia.txt", b"olivia")
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    assert_eq!(resp.body["data"]["invite_id"], olivia_invite);
    assert_eq!(
        resp.body["data"]["path"],
        format!("reverse-shares/{olivia}/{olivia_invite}/for-olivia.txt")
    );

    let resp = app
        .upload(Some(&oscar_guest_token), "file", "for-oscar.txt", b"oscar")
        .await;
    assert_eq!(resp.status, StatusCode::OK, "{}", resp.body);
    assert_eq!(resp.body["data"]["invite_id"], oscar_invite);
    assert_eq!(
        resp.body["data"]["path"],
        format!("reverse-shares/{oscar}/{oscar_invite}/for-oscar.txt")
    );
}
