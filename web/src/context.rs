//! Per-request authentication context.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use snippetbox_core::User;

use crate::error::AppError;

/// Who is making the request.
///
/// Built by the authenticate stage and stored in the request extensions.
/// Handlers and templates read authentication state from here only.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Whether a valid user is attached.
    pub is_authenticated: bool,
    /// The authenticated user.
    pub user: Option<User>,
    /// CSRF token to embed in forms.
    pub csrf_token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(|| AppError::internal("Authenticate middleware not installed"))
    }
}
