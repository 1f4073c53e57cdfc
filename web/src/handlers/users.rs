//! Account pages: signup, login and logout.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use snippetbox_core::ModelError;
use snippetbox_core::validator::{self, Validator};

use super::{parse_form, template_data};
use crate::context::RequestContext;
use crate::WebResult;
use crate::session::Session;
use crate::state::AppState;

/// Where a freshly logged-in user lands when no target was remembered.
const DEFAULT_AFTER_LOGIN: &str = "/snippet/create";

/// Signup form values and their validation state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserSignupForm {
    /// Display name.
    pub name: String,
    /// Login email, unique across users.
    pub email: String,
    /// Plaintext password; never echoed back.
    #[serde(skip_serializing)]
    pub password: String,
    /// Validation messages.
    #[serde(flatten)]
    pub validator: Validator,
}

#[derive(Debug, Deserialize)]
struct SignupInput {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl From<SignupInput> for UserSignupForm {
    fn from(input: SignupInput) -> Self {
        Self {
            name: input.name,
            email: input.email,
            password: input.password,
            validator: Validator::default(),
        }
    }
}

impl UserSignupForm {
    /// Run all field checks, recording messages in the validator.
    pub fn validate(&mut self) {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.name), "name", "This field cannot be blank");
        v.check_field(validator::not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(
            validator::is_email(&self.email),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(
            validator::not_blank(&self.password),
            "password",
            "This field cannot be blank",
        );
        v.check_field(
            validator::min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );
    }
}

/// Login form values and their validation state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserLoginForm {
    /// Login email.
    pub email: String,
    /// Plaintext password; never echoed back.
    #[serde(skip_serializing)]
    pub password: String,
    /// Validation messages.
    #[serde(flatten)]
    pub validator: Validator,
}

#[derive(Debug, Deserialize)]
struct LoginInput {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

impl From<LoginInput> for UserLoginForm {
    fn from(input: LoginInput) -> Self {
        Self {
            email: input.email,
            password: input.password,
            validator: Validator::default(),
        }
    }
}

impl UserLoginForm {
    /// Run all field checks, recording messages in the validator.
    pub fn validate(&mut self) {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.email), "email", "This field cannot be blank");
        v.check_field(
            validator::is_email(&self.email),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(
            validator::not_blank(&self.password),
            "password",
            "This field cannot be blank",
        );
    }
}

/// Accept only same-site absolute paths as post-login targets.
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

/// `GET /user/signup`.
///
/// # Errors
///
/// Template failures (500).
pub async fn user_signup(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
) -> WebResult<Response> {
    let data = template_data(&state, &context, &session).with_form(&UserSignupForm::default());
    state.templates.render("signup.html", StatusCode::OK, &data)
}

/// `POST /user/signup`.
///
/// # Errors
///
/// 400 for an undecodable body; 500 for storage failures.
pub async fn user_signup_post(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
    body: Bytes,
) -> WebResult<Response> {
    let mut form = UserSignupForm::from(parse_form::<SignupInput>(&body)?);
    form.validate();

    if form.validator.valid() {
        match state.users.insert(&form.name, &form.email, &form.password).await {
            Ok(()) => {
                tracing::info!(email = %form.email, "User signed up");
                session.put_flash("Your signup was successful. Please log in.");
                return Ok(Redirect::to("/user/login").into_response());
            }
            Err(ModelError::DuplicateEmail) => {
                form.validator
                    .add_field_error("email", "Email address is already in use");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = template_data(&state, &context, &session).with_form(&form);
    state
        .templates
        .render("signup.html", StatusCode::UNPROCESSABLE_ENTITY, &data)
}

/// `GET /user/login`.
///
/// # Errors
///
/// Template failures (500).
pub async fn user_login(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
) -> WebResult<Response> {
    let data = template_data(&state, &context, &session).with_form(&UserLoginForm::default());
    state.templates.render("login.html", StatusCode::OK, &data)
}

/// `POST /user/login`.
///
/// On success the session token is renewed before the user id is stored,
/// and the user is sent to the remembered target (if local) or the create
/// page.
///
/// # Errors
///
/// 400 for an undecodable body; 500 for storage failures.
pub async fn user_login_post(
    State(state): State<AppState>,
    context: RequestContext,
    session: Session,
    body: Bytes,
) -> WebResult<Response> {
    let mut form = UserLoginForm::from(parse_form::<LoginInput>(&body)?);
    form.validate();

    if form.validator.valid() {
        match state.users.authenticate(&form.email, &form.password).await {
            Ok(id) => {
                session.renew_token();
                session.set_user_id(id);
                tracing::info!(user_id = %id, "User logged in");

                let target = session
                    .pop_redirect()
                    .filter(|path| is_local_path(path))
                    .unwrap_or_else(|| DEFAULT_AFTER_LOGIN.to_string());
                return Ok(Redirect::to(&target).into_response());
            }
            Err(ModelError::InvalidCredentials) => {
                form.validator
                    .add_non_field_error("Email or password is incorrect");
            }
            Err(e) => return Err(e.into()),
        }
    }

    let data = template_data(&state, &context, &session).with_form(&form);
    state
        .templates
        .render("login.html", StatusCode::UNPROCESSABLE_ENTITY, &data)
}

/// `POST /user/logout`.
#[allow(clippy::unused_async)]
pub async fn user_logout_post(session: Session) -> Response {
    session.renew_token();
    session.remove_user_id();
    session.put_flash("You've been logged out successfully!");
    Redirect::to("/").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_paths() {
        assert!(is_local_path("/snippet/create"));
        assert!(is_local_path("/snippet/view/3?x=1"));
        assert!(!is_local_path("//evil.example.com"));
        assert!(!is_local_path("/\\evil.example.com"));
        assert!(!is_local_path("https://evil.example.com"));
    }

    #[test]
    fn test_signup_validation() {
        let mut form = UserSignupForm {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            validator: Validator::default(),
        };
        form.validate();
        assert_eq!(
            form.validator.field_errors.get("email").map(String::as_str),
            Some("This field must be a valid email address")
        );
        assert_eq!(
            form.validator.field_errors.get("password").map(String::as_str),
            Some("This field must be at least 8 characters long")
        );
        assert!(!form.validator.field_errors.contains_key("name"));
    }

    #[test]
    fn test_password_is_never_serialized() {
        let form = UserLoginForm {
            email: "a@b.com".to_string(),
            password: "secret-password".to_string(),
            validator: Validator::default(),
        };
        let value = minijinja::Value::from_serialize(&form);
        assert!(!value.to_string().contains("secret-password"));
    }
}
