//! Dependencies injected into every slice reducer

use crate::config::SessionConfig;
use eventease_client::EventEaseApi;
use eventease_core::environment::Clock;
use std::fmt;
use std::sync::Arc;

/// Environment shared by the slice reducers
///
/// Cloning is cheap: the API client and clock are shared.
#[derive(Clone)]
pub struct EventEaseEnvironment {
    /// Backend API
    pub api: Arc<dyn EventEaseApi>,
    /// Time source, used to decide whether a booking can still be cancelled
    pub clock: Arc<dyn Clock>,
    /// Session handling
    pub session: SessionConfig,
}

impl EventEaseEnvironment {
    /// Create an environment with the default session settings
    #[must_use]
    pub fn new(api: Arc<dyn EventEaseApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            session: SessionConfig::default(),
        }
    }

    /// Override the session settings
    #[must_use]
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}

impl fmt::Debug for EventEaseEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEaseEnvironment")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
