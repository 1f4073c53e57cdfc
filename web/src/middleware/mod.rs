//! Request-processing pipeline.
//!
//! Every stage has the same contract: given the request and the rest of the
//! pipeline ([`Next`]), either call `next.run(request)` or return a response
//! without doing so. A [`Chain`] is an ordered list of [`Stage`]s; the first
//! stage sees the request first and the response last.
//!
//! # Example
//!
//! ```ignore
//! use snippetbox_web::middleware::{Chain, Stage};
//!
//! let app = Chain::standard().wrap(
//!     Chain::dynamic().wrap_routes(Router::new().route("/", get(home)), &state),
//!     &state,
//! );
//! ```
//!
//! # Presets
//!
//! | Chain | Stages |
//! |-------|--------|
//! | [`Chain::standard`] | recover panic → log request → security headers |
//! | [`Chain::dynamic`] | load session → verify CSRF → authenticate |
//! | [`Chain::protected`] | dynamic → require authentication |
//!
//! [`Next`]: axum::middleware::Next

mod auth;
mod csrf;
mod headers;
mod logging;
mod recover;
mod session;

pub use auth::{LOGIN_PATH, authenticate, require_authentication};
pub use csrf::{CSRF_BODY_LIMIT, verify_csrf};
pub use headers::secure_headers;
pub use logging::{REQUEST_ID_HEADER, log_request};
pub use recover::handle_panic;
pub use session::load_session;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use tower_http::catch_panic::CatchPanicLayer;

use crate::state::AppState;

/// A single request-processing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Turn downstream panics into a 500 that closes the connection.
    RecoverPanic,
    /// Assign a request id and log the outcome.
    LogRequest,
    /// Add browser security headers.
    SecureHeaders,
    /// Load or create the session and persist it afterwards.
    LoadSession,
    /// Reject state-changing requests without a matching CSRF token.
    VerifyCsrf,
    /// Resolve the session's user into a [`crate::RequestContext`].
    Authenticate,
    /// Redirect unauthenticated requests to the login page.
    RequireAuthentication,
}

/// Ordered list of stages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    stages: Vec<Stage>,
}

// Router::layer and Router::route_layer share a signature but not a trait,
// so the per-stage dispatch is written once for both.
macro_rules! apply_stage {
    ($router:expr, $method:ident, $stage:expr, $state:expr) => {
        match $stage {
            Stage::RecoverPanic => $router.$method(CatchPanicLayer::custom(handle_panic)),
            Stage::LogRequest => $router.$method(from_fn(log_request)),
            Stage::SecureHeaders => $router.$method(from_fn(secure_headers)),
            Stage::LoadSession => {
                $router.$method(from_fn_with_state($state.clone(), load_session))
            }
            Stage::VerifyCsrf => $router.$method(from_fn(verify_csrf)),
            Stage::Authenticate => {
                $router.$method(from_fn_with_state($state.clone(), authenticate))
            }
            Stage::RequireAuthentication => $router.$method(from_fn(require_authentication)),
        }
    };
}

impl Chain {
    /// Empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Stages applied to every request: recover → log → headers.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .then(Stage::RecoverPanic)
            .then(Stage::LogRequest)
            .then(Stage::SecureHeaders)
    }

    /// Stages for application routes: session → CSRF → authenticate.
    #[must_use]
    pub fn dynamic() -> Self {
        Self::new()
            .then(Stage::LoadSession)
            .then(Stage::VerifyCsrf)
            .then(Stage::Authenticate)
    }

    /// Dynamic stages plus the authentication requirement.
    #[must_use]
    pub fn protected() -> Self {
        Self::dynamic().then(Stage::RequireAuthentication)
    }

    /// Append one stage.
    #[must_use]
    pub fn then(mut self, stage: Stage) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append all stages of `other`.
    #[must_use]
    pub fn append(mut self, other: &Self) -> Self {
        self.stages.extend_from_slice(&other.stages);
        self
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Apply the chain to every request reaching `router`, fallback included.
    #[must_use]
    pub fn wrap(&self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        // The last layer added runs first, so add them back to front.
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| apply_stage!(router, layer, stage, state))
    }

    /// Apply the chain only to requests that match one of `router`'s routes.
    ///
    /// # Panics
    ///
    /// Axum panics if `router` has no routes yet.
    #[must_use]
    pub fn wrap_routes(&self, router: Router<AppState>, state: &AppState) -> Router<AppState> {
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| apply_stage!(router, route_layer, stage, state))
    }
}
