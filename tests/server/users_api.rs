use bookshelf::domain::users::NewUser;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crate::helpers::{auth_cookie, spawn_app, spawn_app_with_session};

// --- Registration ---

#[tokio::test]
async fn creating_a_user_returns_the_user_without_credentials() {
    let app = spawn_app().await;

    let response = app.create_user("reader@example.com", "s3cret").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "reader@example.com");
    assert!(body["_id"].is_i64());
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    assert!(body.get("token_hash").is_none());
}

#[tokio::test]
async fn stored_password_is_never_the_plaintext() {
    let app = spawn_app().await;
    app.create_user("reader@example.com", "s3cret").await;

    let stored = app
        .user_repo
        .get_by_email("reader@example.com")
        .await
        .expect("user should exist");

    assert_ne!(stored.password_hash, "s3cret");
    assert!(!stored.password_hash.contains("s3cret"));
    assert!(stored.token_hash.is_none());
}

#[tokio::test]
async fn creating_a_user_with_an_existing_email_fails() {
    let app = spawn_app().await;
    assert_eq!(
        app.create_user("reader@example.com", "first").await.status(),
        StatusCode::OK
    );

    let response = app.create_user("reader@example.com", "second").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn emails_are_compared_case_insensitively() {
    let app = spawn_app().await;
    app.create_user("Reader@Example.com", "first").await;

    let response = app.create_user("reader@example.COM", "second").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn creating_a_user_with_missing_fields_returns_400() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/user"))
        .json(&json!({ "email": "reader@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn creating_a_user_with_an_empty_password_returns_400() {
    let app = spawn_app().await;

    let response = app.create_user("reader@example.com", "").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_reports_success_and_the_new_user() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/register"))
        .json(&json!({ "email": "new@example.com", "password": "pw", "name": "Ignored" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "new@example.com");
}

#[tokio::test]
async fn register_with_duplicate_email_reports_failure() {
    let app = spawn_app().await;
    app.create_user("taken@example.com", "pw").await;

    let response = app
        .client
        .post(app.url("/api/register"))
        .json(&json!({ "email": "taken@example.com", "password": "pw" }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
    assert!(body.get("user").is_none());
}

#[tokio::test]
async fn register_with_malformed_json_reports_failure() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/register"))
        .header("content-type", "application/json")
        .body(r#"{"email": "#)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["success"], false);
}

// --- Password comparison ---

#[tokio::test]
async fn compare_password_matches_only_the_original_plaintext() {
    let app = spawn_app().await;
    app.create_user("reader@example.com", "open sesame").await;
    let user = app
        .user_service
        .find_by_email("reader@example.com")
        .await
        .expect("user should exist");

    for (candidate, expected) in [
        ("open sesame", true),
        ("open sesame ", false),
        ("Open sesame", false),
        ("", false),
    ] {
        let matches = app
            .user_service
            .compare_password(&user, candidate)
            .await
            .expect("comparison should not fail");
        assert_eq!(matches, expected, "candidate {candidate:?}");
    }
}

// --- Login ---

#[tokio::test]
async fn login_sets_the_auth_cookie_and_returns_ok() {
    let app = spawn_app().await;
    app.create_user("reader@example.com", "pw").await;

    let response = app.login("reader@example.com", "pw").await;

    assert_eq!(response.status(), StatusCode::OK);
    let token = auth_cookie(&response).expect("auth cookie should be set");
    assert!(!token.is_empty());
    assert_eq!(response.text().await.unwrap(), "ok");

    let stored = app
        .user_repo
        .get_by_email("reader@example.com")
        .await
        .unwrap();
    let stored_hash = stored.token_hash.expect("token should be stored after login");
    assert_ne!(stored_hash, token, "only a digest of the token is stored");
}

#[tokio::test]
async fn login_with_unknown_email_returns_404() {
    let app = spawn_app().await;

    let response = app.login("ghost@example.com", "pw").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(auth_cookie(&response).is_none());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Auth failed, user not found");
}

#[tokio::test]
async fn login_with_wrong_password_returns_400() {
    let app = spawn_app().await;
    app.create_user("reader@example.com", "right").await;

    let response = app.login("reader@example.com", "wrong").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(auth_cookie(&response).is_none());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Wrong password");
}

#[tokio::test]
async fn login_with_corrupt_stored_hash_returns_500() {
    let app = spawn_app().await;
    app.user_repo
        .insert(NewUser::new(
            "broken@example.com".to_string(),
            "not-a-password-hash".to_string(),
        ))
        .await
        .expect("Failed to insert user");

    let response = app.login("broken@example.com", "pw").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "internal server error");
}

// --- Session / profile ---

#[tokio::test]
async fn profile_resolves_the_logged_in_user() {
    let app = spawn_app_with_session("reader@example.com", "pw").await;

    let response = app.profile().await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "reader@example.com");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[tokio::test]
async fn issued_token_resolves_to_the_same_user_as_a_raw_cookie() {
    let app = spawn_app().await;
    app.create_user("reader@example.com", "pw").await;
    let login = app.login("reader@example.com", "pw").await;
    let token = auth_cookie(&login).expect("auth cookie should be set");

    let response = Client::new()
        .get(app.url("/user/profile"))
        .header("cookie", format!("auth={token}"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["email"], "reader@example.com");
    assert_eq!(body["token"], token.as_str());
}

#[tokio::test]
async fn profile_without_cookie_returns_401() {
    let app = spawn_app().await;

    let response = app.profile().await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn profile_with_garbage_cookie_returns_401() {
    let app = spawn_app_with_session("reader@example.com", "pw").await;

    let response = Client::new()
        .get(app.url("/user/profile"))
        .header("cookie", "auth=definitely-not-a-session")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logging_in_again_replaces_the_previous_token() {
    let app = spawn_app().await;
    app.create_user("reader@example.com", "pw").await;
    let first = auth_cookie(&app.login("reader@example.com", "pw").await).unwrap();
    let second = auth_cookie(&app.login("reader@example.com", "pw").await).unwrap();
    assert_ne!(first, second);

    let stale = Client::new()
        .get(app.url("/user/profile"))
        .header("cookie", format!("auth={first}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);

    let fresh = Client::new()
        .get(app.url("/user/profile"))
        .header("cookie", format!("auth={second}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(fresh.status(), StatusCode::OK);
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = spawn_app().await;
    app.create_user("reader@example.com", "pw").await;
    let token = auth_cookie(&app.login("reader@example.com", "pw").await).unwrap();

    let response = app
        .client
        .get(app.url("/api/user/logout"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let stored = app
        .user_repo
        .get_by_email("reader@example.com")
        .await
        .unwrap();
    assert!(stored.token_hash.is_none());

    let replay = Client::new()
        .get(app.url("/user/profile"))
        .header("cookie", format!("auth={token}"))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_without_session_returns_401() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/user/logout"))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn verify_token_rejects_unknown_and_empty_tokens() {
    let app = spawn_app_with_session("reader@example.com", "pw").await;

    assert!(app.user_service.verify_token("").await.is_err());
    assert!(app.user_service.verify_token("unknown").await.is_err());
}
