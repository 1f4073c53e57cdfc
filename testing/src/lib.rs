//! # Snippetbox Testing
//!
//! Testing utilities for Snippetbox.
//!
//! This crate provides:
//! - A controllable [`FixedClock`]
//! - In-memory [`MockSnippetRepository`] and [`MockUserRepository`]
//! - proptest strategies for form input
//!
//! ## Example
//!
//! ```
//! use snippetbox_testing::{MockSnippetRepository, test_clock};
//! use snippetbox_core::SnippetRepository;
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let clock = Arc::new(test_clock());
//! let snippets = MockSnippetRepository::new(clock.clone());
//! let id = snippets.insert("O snail", "Climb Mount Fuji", 7).await.unwrap();
//!
//! clock.advance(chrono::Duration::days(8));
//! assert!(snippets.get(id).await.is_err());
//! # }
//! ```

mod repository_mocks;

pub use repository_mocks::{MockSnippetRepository, MockUserRepository};

use chrono::{DateTime, Utc};
use snippetbox_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Clock for deterministic tests.
    ///
    /// Returns the same instant until explicitly advanced. Clones share the
    /// same underlying time.
    ///
    /// # Example
    ///
    /// ```
    /// use snippetbox_testing::mocks::FixedClock;
    /// use snippetbox_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// assert_eq!(time1, clock.now());
    ///
    /// clock.advance(Duration::hours(1));
    /// assert_eq!(clock.now() - time1, Duration::hours(1));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<Mutex<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(Mutex::new(time)),
            }
        }

        /// Move the clock forward.
        pub fn advance(&self, by: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += by;
        }

        /// Jump to an absolute instant.
        pub fn set(&self, to: DateTime<Utc>) {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner) = to;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.time.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Titles that pass validation: 1 to 100 characters, not all whitespace.
    pub fn valid_title() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9 ,.!?é]{0,99}[a-zA-Z0-9]".prop_map(String::from)
    }

    /// Titles longer than 100 characters.
    pub fn overlong_title() -> impl Strategy<Value = String> {
        proptest::collection::vec(proptest::char::range('a', 'z'), 101..200)
            .prop_map(|chars| chars.into_iter().collect())
    }

    /// Syntactically valid email addresses.
    pub fn valid_email() -> impl Strategy<Value = String> {
        ("[a-z][a-z0-9.]{0,15}", "[a-z][a-z0-9]{0,10}", "(com|org|io)")
            .prop_map(|(local, domain, tld)| format!("{local}@{domain}.{tld}"))
    }

    /// Expiry values outside the permitted set.
    pub fn forbidden_expiry() -> impl Strategy<Value = i32> {
        any::<i32>().prop_filter("permitted", |d| ![1, 7, 365].contains(d))
    }
}

// Re-export commonly used items
pub use mocks::{FixedClock, test_clock};
