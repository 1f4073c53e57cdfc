use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::{HeaderMap, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use snippetbox_auth::csrf::{self, CSRF_FORM_FIELD, CSRF_HEADER_NAME};

use crate::error::AppError;
use crate::session::Session;

/// Largest body buffered while looking for the CSRF token (64 KiB).
pub const CSRF_BODY_LIMIT: usize = 64 * 1024;

fn is_safe(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::HEAD | Method::OPTIONS | Method::TRACE
    )
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

fn submitted_token(headers: &HeaderMap, body: &[u8]) -> Option<String> {
    let from_form = if is_form(headers) {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .ok()
            .and_then(|pairs| {
                pairs
                    .into_iter()
                    .find(|(key, _)| key == CSRF_FORM_FIELD)
                    .map(|(_, value)| value)
            })
    } else {
        None
    };

    from_form.or_else(|| {
        headers
            .get(CSRF_HEADER_NAME)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    })
}

/// Reject state-changing requests whose CSRF token does not match the
/// session's.
///
/// The body is buffered (up to [`CSRF_BODY_LIMIT`]) to read the
/// `csrf_token` form field, then handed on unchanged.
pub async fn verify_csrf(session: Session, request: Request, next: Next) -> Response {
    if is_safe(request.method()) {
        return next.run(request).await;
    }

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, CSRF_BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            let inner = e.into_inner();
            if inner.is::<http_body_util::LengthLimitError>() {
                return AppError::payload_too_large().into_response();
            }
            tracing::debug!(error = %inner, "Failed to read request body");
            return AppError::bad_request().into_response();
        }
    };

    let expected = session.csrf_token();
    let submitted = submitted_token(&parts.headers, &bytes);
    if !csrf::verify(&expected, submitted.as_deref()) {
        tracing::warn!(
            method = %parts.method,
            uri = %parts.uri,
            token_present = submitted.is_some(),
            "CSRF token mismatch"
        );
        return AppError::bad_request().into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
