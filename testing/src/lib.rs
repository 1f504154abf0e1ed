//! # EventEase Testing
//!
//! Testing utilities for the EventEase state layer.
//!
//! This crate provides:
//! - Deterministic clocks for time-dependent rules (booking cancellation)
//! - [`ReducerTest`], a Given-When-Then builder for reducer unit tests
//! - Effect helpers that run the futures a reducer returned
//!
//! ## Example
//!
//! ```ignore
//! use eventease_testing::{resolve_effects, ReducerTest};
//!
//! ReducerTest::new(CategoryReducer)
//!     .with_env(test_environment())
//!     .given_state(CategoryState::default())
//!     .when_action(CategoryAction::FetchCategories)
//!     .then_state(|s| assert_eq!(s.status, RequestStatus::Loading))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use eventease_core::environment::Clock;


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// # Example
    ///
    /// ```
    /// use eventease_testing::mocks::FixedClock;
    /// use eventease_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
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

        /// Advance the clock by `duration`; every clone observes the change
        pub fn advance(&self, duration: chrono::Duration) {
            let mut time = self.time.lock().unwrap_or_else(PoisonError::into_inner);
            *time += duration;
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
    /// Panics if the hardcoded timestamp fails to parse, which cannot happen.
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

/// Helpers for driving effects outside the runtime
pub mod effects {
    use eventease_core::effect::Effect;

    /// Run every effect to completion and collect the actions they produce
    ///
    /// Futures are awaited one at a time in the order the reducer returned
    /// them, so the collected actions are deterministic.
    pub async fn resolve_effects<A>(effects: impl IntoIterator<Item = Effect<A>>) -> Vec<A> {
        let mut actions = Vec::new();

        for effect in effects {
            if let Effect::Future(fut) = effect {
                if let Some(action) = fut.await {
                    actions.push(action);
                }
            }
        }

        actions
    }
}

pub use effects::resolve_effects;
pub use mocks::{test_clock, FixedClock};
