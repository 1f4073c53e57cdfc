//! Precompiled page templates.
//!
//! Every page is compiled at startup into its own [`minijinja::Environment`]
//! together with the base layout and the shared partials, so a broken
//! template stops the process before it accepts traffic. Rendering goes to a
//! `String` first; a response is only built once rendering succeeded.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use minijinja::{Environment, UndefinedBehavior, Value};
use serde::Serialize;
use snippetbox_core::Snippet;
use std::collections::HashMap;
use thiserror::Error;

use crate::error::AppError;

const BASE: (&str, &str) = ("base.html", include_str!("../ui/html/base.html"));

const PARTIALS: &[(&str, &str)] = &[(
    "partials/nav.html",
    include_str!("../ui/html/partials/nav.html"),
)];

const PAGES: &[(&str, &str)] = &[
    ("home.html", include_str!("../ui/html/pages/home.html")),
    ("view.html", include_str!("../ui/html/pages/view.html")),
    ("create.html", include_str!("../ui/html/pages/create.html")),
    ("signup.html", include_str!("../ui/html/pages/signup.html")),
    ("login.html", include_str!("../ui/html/pages/login.html")),
];

/// Template compilation and rendering failures.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A source failed to parse.
    #[error("failed to compile template {name}: {source}")]
    Compile {
        /// Template name.
        name: String,
        /// Parser error.
        #[source]
        source: minijinja::Error,
    },

    /// No page with this name was compiled.
    #[error("the template {0} does not exist")]
    UnknownPage(String),

    /// Rendering failed at runtime.
    #[error("failed to render template {name}: {source}")]
    Render {
        /// Template name.
        name: String,
        /// Render error.
        #[source]
        source: minijinja::Error,
    },
}

/// Format a timestamp as `02 Jan 2006 at 15:04` (UTC).
///
/// Input that is not an RFC 3339 timestamp renders as an empty string.
#[must_use]
pub fn human_date(value: &Value) -> String {
    value
        .as_str()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc).format("%d %b %Y at %H:%M").to_string())
        .unwrap_or_default()
}

/// Data passed to every page.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateData {
    /// Year shown in the footer.
    pub current_year: i32,
    /// One-shot message popped from the session.
    pub flash: Option<String>,
    /// Whether the request is authenticated.
    pub is_authenticated: bool,
    /// Token embedded in every form.
    pub csrf_token: String,
    /// Snippet shown by the view page.
    pub snippet: Option<Snippet>,
    /// Snippets listed on the home page.
    pub snippets: Vec<Snippet>,
    /// Form values and validation messages.
    pub form: Option<Value>,
}

impl TemplateData {
    /// Attach a form (any serializable form struct).
    #[must_use]
    pub fn with_form<T: Serialize>(mut self, form: &T) -> Self {
        self.form = Some(Value::from_serialize(form));
        self
    }
}

/// Compiled page templates, keyed by page name.
#[derive(Debug)]
pub struct TemplateCache {
    pages: HashMap<String, Environment<'static>>,
}

impl TemplateCache {
    /// Compile the built-in pages.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Compile`] if any template fails to parse.
    pub fn new() -> Result<Self, TemplateError> {
        Self::from_sources(BASE.1, PARTIALS, PAGES)
    }

    /// Compile `pages`, each combined with `base` (registered as
    /// `base.html`) and every partial.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Compile`] for the first source that fails.
    pub fn from_sources(
        base: &'static str,
        partials: &[(&'static str, &'static str)],
        pages: &[(&'static str, &'static str)],
    ) -> Result<Self, TemplateError> {
        let compile_error = |name: &str| {
            let name = name.to_string();
            move |source| TemplateError::Compile { name, source }
        };

        let mut compiled = HashMap::with_capacity(pages.len());
        for &(page, source) in pages {
            let mut env = Environment::new();
            env.set_undefined_behavior(UndefinedBehavior::Chainable);
            env.add_filter("human_date", human_date);

            env.add_template(BASE.0, base)
                .map_err(compile_error(BASE.0))?;
            for &(name, partial) in partials {
                env.add_template(name, partial).map_err(compile_error(name))?;
            }
            env.add_template(page, source).map_err(compile_error(page))?;

            compiled.insert(page.to_string(), env);
        }

        tracing::debug!(pages = compiled.len(), "Template cache built");
        Ok(Self { pages: compiled })
    }

    /// Names of the compiled pages.
    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Render `page` to a string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownPage`] or [`TemplateError::Render`].
    pub fn render_to_string(&self, page: &str, data: &TemplateData) -> Result<String, TemplateError> {
        let env = self
            .pages
            .get(page)
            .ok_or_else(|| TemplateError::UnknownPage(page.to_string()))?;

        let render_error = |source| TemplateError::Render {
            name: page.to_string(),
            source,
        };
        env.get_template(page)
            .map_err(render_error)?
            .render(data)
            .map_err(render_error)
    }

    /// Render `page` into an HTML response with `status`.
    ///
    /// # Errors
    ///
    /// Any failure becomes a 500; an unknown page is a server bug, never a
    /// 404.
    pub fn render(
        &self,
        page: &str,
        status: StatusCode,
        data: &TemplateData,
    ) -> Result<Response, AppError> {
        let body = self.render_to_string(page, data)?;
        Ok((status, Html(body)).into_response())
    }
}
