//! Liveness check.

use axum::http::StatusCode;

/// `GET /health`.
///
/// Answers `200 ok` as long as the process can serve requests. It sits
/// outside the session pipeline, so health checks never create sessions and the
/// database is not consulted.
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, (StatusCode::OK, "ok"));
    }
}
