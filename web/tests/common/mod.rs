//! Browser-like test client over the full router.
//!
//! Requests go through `tower::ServiceExt::oneshot`, so every middleware
//! stage runs exactly as it does behind a socket. The client remembers the
//! session cookie between requests the way a browser would.

#![allow(dead_code)] // Each test binary uses a different subset

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::Utc;
use snippetbox_auth::mocks::MockSessionStore;
use snippetbox_testing::{FixedClock, MockSnippetRepository, MockUserRepository};
use snippetbox_web::routes::{Timeouts, build_router};
use snippetbox_web::{AppState, SessionConfig, TemplateCache};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Response with the body already collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Value of a header, or `""` when absent.
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    /// Target of a redirect.
    pub fn location(&self) -> &str {
        self.header("location")
    }

    /// The hidden CSRF token embedded in a rendered form.
    pub fn csrf_token(&self) -> String {
        let marker = r#"name="csrf_token" value=""#;
        let start = self
            .body
            .find(marker)
            .map(|i| i + marker.len())
            .expect("page has no CSRF field");
        let end = self.body[start..].find('"').expect("unterminated CSRF value");
        self.body[start..start + end].to_string()
    }
}

/// Application wired to in-memory collaborators.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    cookie: Option<String>,
    pub snippets: MockSnippetRepository,
    pub users: MockUserRepository,
    pub sessions: MockSessionStore,
    pub clock: FixedClock,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = FixedClock::new(Utc::now());
        let snippets = MockSnippetRepository::new(Arc::new(clock.clone()));
        let users = MockUserRepository::new(Arc::new(clock.clone()));
        let sessions = MockSessionStore::new();

        let state = AppState::new(
            Arc::new(snippets.clone()),
            Arc::new(users.clone()),
            Arc::new(sessions.clone()),
            Arc::new(TemplateCache::new().expect("built-in templates compile")),
            SessionConfig::default(),
            Arc::new(clock.clone()),
        );
        let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ui/static");

        Self {
            router: build_router(state.clone(), &static_dir, Timeouts::default()),
            state,
            cookie: None,
            snippets,
            users,
            sessions,
            clock,
        }
    }

    /// Current session cookie value, if the server issued one.
    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Forget the session cookie, as a fresh browser would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a request, attaching and then updating the session cookie.
    pub async fn send(&mut self, mut request: Request<Body>) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            request.headers_mut().insert(
                header::COOKIE,
                format!("session={cookie}").parse().expect("valid cookie header"),
            );
        }

        let response = self.router.clone().oneshot(request).await.expect("infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collects");

        if let Some(value) = headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .and_then(|pair| pair.strip_prefix("session="))
        {
            self.cookie = Some(value.to_string());
        }

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    pub async fn get(&mut self, path: &str) -> TestResponse {
        let request = Request::get(path).body(Body::empty()).expect("valid request");
        self.send(request).await
    }

    pub async fn request(&mut self, method: Method, path: &str) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("valid request");
        self.send(request).await
    }

    /// POST an urlencoded form.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).expect("form encodes");
        let request = Request::post(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .expect("valid request");
        self.send(request).await
    }

    /// Fetch `form_path` and return the CSRF token it embeds.
    pub async fn csrf_token_from(&mut self, form_path: &str) -> String {
        let page = self.get(form_path).await;
        assert_eq!(page.status, StatusCode::OK, "{form_path} should render");
        page.csrf_token()
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> TestResponse {
        let token = self.csrf_token_from("/user/signup").await;
        self.post_form(
            "/user/signup",
            &[
                ("csrf_token", &token),
                ("name", name),
                ("email", email),
                ("password", password),
            ],
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        let token = self.csrf_token_from("/user/login").await;
        self.post_form(
            "/user/login",
            &[("csrf_token", &token), ("email", email), ("password", password)],
        )
        .await
    }

    /// Sign up and log in a default user.
    pub async fn logged_in() -> Self {
        let mut app = Self::new();
        let signup = app.signup("Alice", "alice@example.com", "pa55word!").await;
        assert_eq!(signup.status, StatusCode::SEE_OTHER);
        let login = app.login("alice@example.com", "pa55word!").await;
        assert_eq!(login.status, StatusCode::SEE_OTHER);
        app
    }

    /// Submit the create form with a fresh CSRF token.
    pub async fn create_snippet(&mut self, title: &str, content: &str, expires: &str) -> TestResponse {
        let token = self.csrf_token_from("/snippet/create").await;
        self.post_form(
            "/snippet/create",
            &[
                ("csrf_token", &token),
                ("title", title),
                ("content", content),
                ("expires", expires),
            ],
        )
        .await
    }
}
