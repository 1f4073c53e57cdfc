//! End-to-end tests for signup, login and logout.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap

mod common;

use axum::http::StatusCode;
use common::TestApp;

#[tokio::test]
async fn signup_then_login_shows_authenticated_nav() {
    let mut app = TestApp::new();

    let signup = app.signup("Alice", "alice@example.com", "pa55word!").await;
    assert_eq!(signup.status, StatusCode::SEE_OTHER);
    assert_eq!(signup.location(), "/user/login");
    assert_eq!(app.users.len(), 1);

    let login_page = app.get("/user/login").await;
    assert!(login_page.body.contains("Your signup was successful. Please log in."));

    let login = app.login("alice@example.com", "pa55word!").await;
    assert_eq!(login.status, StatusCode::SEE_OTHER);
    assert_eq!(login.location(), "/snippet/create");

    let home = app.get("/").await;
    assert!(home.body.contains(r#"action="/user/logout""#));
    assert!(!home.body.contains(r#"href="/user/signup""#));
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let mut app = TestApp::new();
    app.signup("Alice", "alice@example.com", "pa55word!").await;

    let again = app.signup("Another Alice", "alice@example.com", "different1").await;
    assert_eq!(again.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(again.body.contains("Email address is already in use"));
    assert!(again.body.contains(r#"value="Another Alice""#));
    assert_eq!(app.users.len(), 1);
}

#[tokio::test]
async fn invalid_signup_is_rerendered() {
    let mut app = TestApp::new();
    let response = app.signup("", "not-an-email", "short").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("This field cannot be blank"));
    assert!(response.body.contains("This field must be a valid email address"));
    assert!(response.body.contains("This field must be at least 8 characters long"));
    assert!(app.users.is_empty());
}

#[tokio::test]
async fn wrong_password_is_a_non_field_error() {
    let mut app = TestApp::new();
    app.signup("Alice", "alice@example.com", "pa55word!").await;

    let response = app.login("alice@example.com", "wrong-password").await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email or password is incorrect"));
    assert!(response.body.contains(r#"value="alice@example.com""#));
    assert!(!response.body.contains("wrong-password"));

    assert_eq!(app.get("/snippet/create").await.status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn unknown_email_gets_the_same_message() {
    let mut app = TestApp::new();
    let response = app.login("nobody@example.com", "pa55word!").await;

    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email or password is incorrect"));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let mut app = TestApp::logged_in().await;
    let before = app.session_cookie().unwrap().to_string();
    let token = app.csrf_token_from("/").await;

    let response = app.post_form("/user/logout", &[("csrf_token", &token)]).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), "/");
    assert_ne!(app.session_cookie(), Some(before.as_str()));

    let home = app.get("/").await;
    assert!(home.body.contains("logged out successfully"));
    assert!(home.body.contains(r#"href="/user/login""#));

    let gated = app.get("/snippet/create").await;
    assert_eq!(gated.status, StatusCode::SEE_OTHER);
}
