//! Snippet pages: list, view and create.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use snippetbox_core::models::PERMITTED_EXPIRY_DAYS;
use snippetbox_core::validator::{self, Validator};

use super::{parse_form, template_data};
use crate::context::RequestContext;
use crate::error::AppError;
use crate::WebResult;
use crate::session::Session;
use crate::state::AppState;

/// Create-snippet form values and their validation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetCreateForm {
    /// Title (1 to 100 characters).
    pub title: String,
    /// Body text.
    pub content: String,
    /// Lifetime in days.
    pub expires: i32,
    /// Validation messages.
    #[serde(flatten)]
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: 365,
            validator: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    /// Run all field checks, recording messages in the validator.
    pub fn validate(&mut self) {
        let v = &mut self.validator;
        v.check_field(
            validator::not_blank(&self.title),
            "title",
            "This field cannot be blank",
        );
        v.check_field(
            validator::max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(
            validator::not_blank(&self.content),
            "content",
            "This field cannot be blank",
        );
        v.check_field(
            validator::permitted_value(&self.expires, &PERMITTED_EXPIRY_DAYS),
            "expires",
            "This field must equal 1, 7 or 365",
        );
    }
}

/// Raw submission; `expires` is parsed separately so a non-number is a 400.
#[derive(Debug, Deserialize)]
struct SnippetCreateInput {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    expires: String,
}

/// `GET /`: the latest snippets.
///
/// # Errors
///
/// Repository or template failures (500).
pub async fn home(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
) -> WebResult<Response> {
    let snippets = state.snippets.latest().await?;

    let mut data = template_data(&state, &context, &session);
    data.snippets = snippets;
    state.templates.render("home.html", StatusCode::OK, &data)
}

/// `GET /snippet/view/:id`.
///
/// # Errors
///
/// 404 for ids that are not positive integers or do not name a live
/// snippet.
pub async fn snippet_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
    context: RequestContext,
    session: Session,
) -> WebResult<Response> {
    let id = match id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(AppError::not_found()),
    };

    let snippet = state.snippets.get(id).await?;

    let mut data = template_data(&state, &context, &session);
    data.snippet = Some(snippet);
    state.templates.render("view.html", StatusCode::OK, &data)
}

/// `GET /snippet/create`: empty form defaulting to one year.
///
/// # Errors
///
/// Template failures (500).
pub async fn snippet_create(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
) -> WebResult<Response> {
    let data = template_data(&state, &context, &session).with_form(&SnippetCreateForm::default());
    state.templates.render("create.html", StatusCode::OK, &data)
}

/// `POST /snippet/create`.
///
/// Invalid input re-renders the form with 422; success stores the snippet
/// and redirects to it.
///
/// # Errors
///
/// 400 for an undecodable body or non-integer `expires`; 500 for storage
/// failures.
pub async fn snippet_create_post(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
    body: Bytes,
) -> WebResult<Response> {
    let input: SnippetCreateInput = parse_form(&body)?;
    let expires = input
        .expires
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::bad_request())?;

    let mut form = SnippetCreateForm {
        title: input.title,
        content: input.content,
        expires,
        validator: Validator::default(),
    };
    form.validate();

    if !form.validator.valid() {
        let data = template_data(&state, &context, &session).with_form(&form);
        return state
            .templates
            .render("create.html", StatusCode::UNPROCESSABLE_ENTITY, &data);
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;
    tracing::info!(snippet_id = id, "Snippet created");

    session.put_flash("Snippet successfully created!");
    Ok(Redirect::to(&format!("/snippet/view/{id}")).into_response())
}
