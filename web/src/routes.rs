//! Route table.
//!
//! ```text
//! standard chain (every request, 404s included)
//! └── request and body timeouts
//!     ├── GET  /health                      liveness check
//!     ├── GET  /static/*                    assets, no directory listings
//!     ├── dynamic chain (matched routes only)
//!     │   ├── GET  /                        home
//!     │   ├── GET  /snippet/view/:id        snippet_view
//!     │   ├── GET  /user/signup             user_signup
//!     │   ├── POST /user/signup             user_signup_post
//!     │   ├── GET  /user/login              user_login
//!     │   └── POST /user/login              user_login_post
//!     └── protected chain (matched routes only)
//!         ├── GET  /snippet/create          snippet_create
//!         ├── POST /snippet/create          snippet_create_post
//!         └── POST /user/logout             user_logout_post
//! ```

use axum::{
    Router,
    routing::{get, post},
};
use std::path::Path;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

use crate::handlers::{self, snippets, users};
use crate::middleware::Chain;
use crate::state::AppState;

/// Upper bounds on request handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Whole request; exceeding it answers `408 Request Timeout`.
    pub request: Duration,
    /// Receiving the request body.
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
            read: Duration::from_secs(5),
        }
    }
}

/// Build the application router.
///
/// `static_dir` is served under `/static/`. A directory without an
/// `index.html` answers 404 rather than a listing. Timeouts sit inside the
/// standard chain, so a `408` still carries the security headers and a
/// request id.
pub fn build_router(state: AppState, static_dir: &Path, timeouts: Timeouts) -> Router {
    let dynamic = Router::new()
        .route("/", get(snippets::home))
        .route("/snippet/view/:id", get(snippets::snippet_view))
        .route("/user/signup", get(users::user_signup).post(users::user_signup_post))
        .route("/user/login", get(users::user_login).post(users::user_login_post));
    let dynamic = Chain::dynamic().wrap_routes(dynamic, &state);

    let protected = Router::new()
        .route(
            "/snippet/create",
            get(snippets::snippet_create).post(snippets::snippet_create_post),
        )
        .route("/user/logout", post(users::user_logout_post));
    let protected = Chain::protected().wrap_routes(protected, &state);

    let app = Router::new()
        .merge(dynamic)
        .merge(protected)
        .route("/health", get(handlers::health_check))
        .nest_service("/static", ServeDir::new(static_dir).append_index_html_on_directories(true))
        .fallback(handlers::not_found);

    Chain::standard()
        .wrap(with_timeouts(app, timeouts), &state)
        .with_state(state)
}

/// Bound the time spent on a whole request and on receiving its body.
///
/// Wrap the result in [`Chain::standard`] so timed-out responses pass
/// through the outer stages.
pub fn with_timeouts(router: Router<AppState>, timeouts: Timeouts) -> Router<AppState> {
    router
        .layer(TimeoutLayer::new(timeouts.request))
        .layer(RequestBodyTimeoutLayer::new(timeouts.read))
}
