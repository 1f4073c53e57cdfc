use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use snippetbox_core::ModelError;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

/// Where unauthenticated requests to protected routes are sent.
pub const LOGIN_PATH: &str = "/user/login";

/// Resolve the session's user id into a [`RequestContext`].
///
/// A user id that no longer exists is treated as logged out and removed
/// from the session.
pub async fn authenticate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let mut context = RequestContext {
        csrf_token: session.csrf_token(),
        ..RequestContext::default()
    };

    if let Some(id) = session.user_id() {
        match state.users.get(id).await {
            Ok(user) => {
                context.is_authenticated = true;
                context.user = Some(user);
            }
            Err(ModelError::NotFound) => {
                tracing::warn!(user_id = %id, "Session references a user that no longer exists");
                session.remove_user_id();
            }
            Err(e) => return AppError::from(e).into_response(),
        }
    }

    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Send unauthenticated requests to the login page.
///
/// The original path of a GET or HEAD request is remembered so the login
/// handler can return there. Authenticated responses are marked
/// `Cache-Control: no-store`.
pub async fn require_authentication(
    context: RequestContext,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    if !context.is_authenticated {
        if matches!(*request.method(), Method::GET | Method::HEAD) {
            let target = request
                .uri()
                .path_and_query()
                .map_or_else(|| request.uri().path().to_string(), ToString::to_string);
            session.put_redirect(target);
        }
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
