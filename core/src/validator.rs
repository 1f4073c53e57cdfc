//! Form validation.
//!
//! Every form struct owns a [`Validator`] as a plain field. Handlers run the
//! checks, and if [`Validator::valid`] is false they re-render the form with
//! the collected messages instead of redirecting.
//!
//! ```
//! use snippetbox_core::validator::{self, Validator};
//!
//! let mut v = Validator::default();
//! v.check_field(validator::not_blank("  "), "title", "This field cannot be blank");
//! assert!(!v.valid());
//! assert_eq!(v.field_errors.get("title").map(String::as_str), Some("This field cannot be blank"));
//! ```

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Loose email check (the W3C `input type=email` pattern).
static EMAIL_RX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .ok()
});

/// Collected validation messages for one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Validator {
    /// Messages keyed by form field name. Only the first error per field is kept.
    pub field_errors: BTreeMap<String, String>,
    /// Messages not tied to a single field (e.g. bad credentials).
    pub non_field_errors: Vec<String>,
}

impl Validator {
    /// `true` when no errors have been recorded.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record an error for `key` unless one is already present.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// Record a form-level error.
    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    /// Record `message` for `key` when `ok` is false.
    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }
}

/// `true` if the value contains something other than whitespace.
#[must_use]
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// `true` if the value has at most `n` characters (not bytes).
#[must_use]
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

/// `true` if the value has at least `n` characters (not bytes).
#[must_use]
pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

/// `true` if `value` is one of `permitted`.
#[must_use]
pub fn permitted_value<T: PartialEq>(value: &T, permitted: &[T]) -> bool {
    permitted.contains(value)
}

/// `true` if the value looks like an email address.
#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL_RX.as_ref().is_some_and(|rx| rx.is_match(value))
}
