use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Instrument;

use crate::extractors::{ClientIp, RequestId};

/// Header echoing the request id back to the client.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Open a span per request and log its outcome.
///
/// The generated [`RequestId`] is stored in the request extensions for
/// handlers and echoed in the response.
pub async fn log_request(ClientIp(client_ip): ClientIp, mut request: Request, next: Next) -> Response {
    let request_id = RequestId::new();
    request.extensions_mut().insert(request_id);

    let span = tracing::info_span!(
        "http_request",
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        version = ?request.version(),
        %client_ip,
    );

    async move {
        let started = Instant::now();
        let mut response = next.run(request).await;

        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Request completed"
        );

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
