use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use snippetbox_auth::{SessionRecord, SessionToken};

use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;

/// Value of the named cookie, if the client sent a non-empty one.
pub(crate) fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

/// Load the session named by the cookie, or start a new one.
///
/// A record idle for longer than the configured lifetime, measured with the
/// application clock, is ignored and a fresh session takes its place.
///
/// After the rest of the pipeline ran, the session is saved with a sliding
/// expiry and the cookie is (re)issued. A token replaced during the request
/// is deleted. Storage failures become a generic 500.
pub async fn load_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let config = &state.session_config;
    let now = state.clock.now();

    let existing = match cookie_value(request.headers(), &config.cookie_name) {
        Some(value) => match state.sessions.load(&SessionToken::from_cookie(value), now).await {
            Ok(record) => record,
            Err(e) => return AppError::from(e).into_response(),
        },
        None => None,
    };

    let lifetime = chrono::Duration::from_std(config.lifetime).unwrap_or(chrono::Duration::hours(12));
    let session = Session::new(existing.unwrap_or_else(|| {
        tracing::debug!("Starting new session");
        SessionRecord::new(now + lifetime)
    }));
    // Every session carries a CSRF token before any handler runs.
    let _ = session.csrf_token();

    request.extensions_mut().insert(session.clone());
    let mut response = next.run(request).await;

    let (mut record, superseded) = session.snapshot();
    if let Some(old) = superseded {
        if let Err(e) = state.sessions.delete(&old).await {
            return AppError::from(e).into_response();
        }
    }

    record.expires_at = state.clock.now() + lifetime;
    if let Err(e) = state.sessions.save(&record).await {
        return AppError::from(e).into_response();
    }

    match HeaderValue::from_str(&config.cookie_header(record.token.as_str())) {
        Ok(cookie) => {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        Err(e) => {
            return AppError::internal("Invalid session cookie")
                .with_source(e.into())
                .into_response();
        }
    }
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Cookie"));
    response
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::{
        Router, body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get,
    };
    use snippetbox_core::UserId;
    use tower::ServiceExt;

    fn app(state: &AppState) -> Router {
        Router::new()
            .route(
                "/",
                get(|session: Session| async move {
                    session.user_id().map_or_else(|| "anonymous".to_string(), |id| id.to_string())
                }),
            )
            .route(
                "/login",
                get(|session: Session| async move {
                    session.renew_token();
                    session.set_user_id(UserId(9));
                    "logged in"
                }),
            )
            .layer(from_fn_with_state(state.clone(), load_session))
            .with_state(state.clone())
    }

    fn token_from(response: &Response) -> String {
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        cookie
            .strip_prefix("session=")
            .and_then(|rest| rest.split(';').next())
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_cookie_value_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; session=abc; x=1"));
        assert_eq!(cookie_value(&headers, "session"), Some("abc"));
        assert_eq!(cookie_value(&headers, "missing"), None);

        headers.insert(header::COOKIE, HeaderValue::from_static("session="));
        assert_eq!(cookie_value(&headers, "session"), None);
    }

    #[tokio::test]
    async fn test_new_session_sets_cookie() {
        let (state, mocks) = test_state();
        let response = app(&state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::VARY], "Cookie");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert_eq!(mocks.sessions.session_count().unwrap(), 1);

        let token = SessionToken::from_cookie(&token_from(&response));
        let record = state.sessions.load(&token, state.clock.now()).await.unwrap().unwrap();
        assert!(record.data.user_id.is_none());
        assert!(record.data.csrf_token.is_some());
    }

    #[tokio::test]
    async fn test_unknown_cookie_starts_fresh_session() {
        let (state, _mocks) = test_state();
        let response = app(&state)
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::COOKIE, "session=forged-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(token_from(&response), "forged-token");
    }

    #[tokio::test]
    async fn test_renewal_replaces_stored_token() {
        let (state, mocks) = test_state();
        let first = app(&state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let original = token_from(&first);

        let second = app(&state)
            .oneshot(
                Request::builder()
                    .uri("/login")
                    .header(header::COOKIE, format!("session={original}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let renewed = token_from(&second);

        assert_ne!(original, renewed);
        assert!(!mocks.sessions.contains(&SessionToken::from_cookie(&original)).unwrap());
        let record = state
            .sessions
            .load(&SessionToken::from_cookie(&renewed), state.clock.now())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.data.user_id, Some(UserId(9)));
    }

    #[tokio::test]
    async fn test_store_failure_is_500() {
        let (state, mocks) = test_state();
        mocks.sessions.set_failing(true);
        let response = app(&state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }
}
