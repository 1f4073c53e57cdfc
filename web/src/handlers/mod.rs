//! HTTP request handlers.
//!
//! This module contains all HTTP handlers organized by domain.

pub mod health;
pub mod snippets;
pub mod users;

pub use health::health_check;

use axum::body::Bytes;
use chrono::Datelike;
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::error::AppError;
use crate::session::Session;
use crate::state::AppState;
use crate::templates::TemplateData;

/// Template data every page needs. Pops the pending flash message.
pub(crate) fn template_data(state: &AppState, context: &RequestContext, session: &Session) -> TemplateData {
    TemplateData {
        current_year: state.clock.now().year(),
        flash: session.pop_flash(),
        is_authenticated: context.is_authenticated,
        csrf_token: context.csrf_token.clone(),
        ..TemplateData::default()
    }
}

/// Decode an `application/x-www-form-urlencoded` body.
///
/// Undecodable input is a client error (400).
pub(crate) fn parse_form<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_urlencoded::from_bytes(body).map_err(|e| {
        tracing::debug!(error = %e, "Failed to decode form body");
        AppError::bad_request()
    })
}

/// Fallback for unmatched routes.
#[allow(clippy::unused_async)]
pub async fn not_found() -> AppError {
    AppError::not_found()
}
