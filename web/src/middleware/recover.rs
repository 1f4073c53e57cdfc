use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::any::Any;

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Response for a request whose handling panicked.
///
/// Whatever the panicking handler produced is discarded; the client gets a
/// generic 500 with `Connection: close` so the connection is not reused.
/// Used as the handler of [`tower_http::catch_panic::CatchPanicLayer`].
#[allow(clippy::needless_pass_by_value)]
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(panic = panic_message(payload.as_ref()), "Request handler panicked");

    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        "Internal Server Error",
    )
        .into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}
