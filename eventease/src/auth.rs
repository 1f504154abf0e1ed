//! Auth slice: the signed-in user and the session lifecycle.
//!
//! Login and registration only establish the session cookie; the profile is
//! always hydrated afterwards by a `FetchCurrentUser` round trip.

use crate::environment::EventEaseEnvironment;
use crate::status::{RequestSeq, RequestStatus};
use eventease_client::{AuthUser, Credentials, Registration};
use eventease_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Fallback when login fails without a server message
pub const LOGIN_FAILED: &str = "Login failed";
/// Fallback when registration fails without a server message
pub const REGISTRATION_FAILED: &str = "Registration failed";
/// Error recorded when logout fails
pub const LOGOUT_FAILED: &str = "Logout failed";

/// Auth slice state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// Signed-in user, `None` when anonymous
    pub user: Option<AuthUser>,
    /// Last operation status
    pub status: RequestStatus,
    /// Last error message
    pub error: Option<String>,
    /// Fence for session checks
    pub seq: RequestSeq,
}

impl AuthState {
    /// Whether a user is signed in
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// Auth slice actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    // Commands
    /// Ask `/auth/me` for the user owning the session cookie
    FetchCurrentUser,
    /// Sign in
    Login(Credentials),
    /// Create an account and sign in
    Register(Registration),
    /// Sign out
    Logout,
    /// Replace the user without a request
    SetUser(AuthUser),
    /// Drop the last error message
    ClearError,

    // Results
    /// Session check returned a user
    CurrentUserLoaded {
        /// Request sequence number
        seq: u64,
        /// The session's user
        user: AuthUser,
    },
    /// Session check failed; treated as signed out
    CurrentUserFailed {
        /// Request sequence number
        seq: u64,
    },
    /// Login accepted
    LoginSucceeded,
    /// Login rejected
    LoginFailed {
        /// User-facing message
        error: String,
    },
    /// Registration accepted
    RegisterSucceeded,
    /// Registration rejected
    RegisterFailed {
        /// User-facing message
        error: String,
    },
    /// Session ended
    LogoutSucceeded,
    /// Logout request failed
    LogoutFailed {
        /// User-facing message
        error: String,
    },
}

/// Reducer for the auth slice
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthReducer;

impl AuthReducer {
    /// Creates a new `AuthReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn begin(state: &mut AuthState) {
        state.status = RequestStatus::Loading;
        state.error = None;
    }

    fn fetch_current_user(
        state: &mut AuthState,
        env: &EventEaseEnvironment,
    ) -> Effect<AuthAction> {
        Self::begin(state);
        let seq = state.seq.issue();
        let api = Arc::clone(&env.api);

        Effect::future(async move {
            match api.current_user().await {
                Ok(user) => Some(AuthAction::CurrentUserLoaded { seq, user }),
                Err(error) => {
                    tracing::debug!(%error, "No active session");
                    Some(AuthAction::CurrentUserFailed { seq })
                },
            }
        })
    }
}

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;
    type Environment = EventEaseEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            AuthAction::FetchCurrentUser => smallvec![Self::fetch_current_user(state, env)],

            AuthAction::Login(credentials) => {
                Self::begin(state);
                state.seq.issue();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.login(credentials).await {
                        Ok(()) => Some(AuthAction::LoginSucceeded),
                        Err(error) => Some(AuthAction::LoginFailed {
                            error: error.user_message(LOGIN_FAILED),
                        }),
                    }
                })]
            },

            AuthAction::Register(registration) => {
                Self::begin(state);
                state.seq.issue();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.register(registration).await {
                        Ok(()) => Some(AuthAction::RegisterSucceeded),
                        Err(error) => Some(AuthAction::RegisterFailed {
                            error: error.user_message(REGISTRATION_FAILED),
                        }),
                    }
                })]
            },

            AuthAction::Logout => {
                Self::begin(state);
                // A session check still in flight must not sign the user back in
                state.seq.issue();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.logout().await {
                        Ok(()) => Some(AuthAction::LogoutSucceeded),
                        Err(error) => {
                            tracing::warn!(%error, "Logout request failed");
                            Some(AuthAction::LogoutFailed {
                                error: LOGOUT_FAILED.to_string(),
                            })
                        },
                    }
                })]
            },

            AuthAction::SetUser(user) => {
                state.seq.issue();
                state.user = Some(user);
                if state.status == RequestStatus::Loading {
                    state.status = RequestStatus::Succeeded;
                }
                smallvec![Effect::None]
            },

            AuthAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            },

            // ========== Results ==========
            AuthAction::CurrentUserLoaded { seq, user } => {
                if state.seq.accepts(seq, "auth") {
                    tracing::info!(email = %user.email, role = ?user.role, "Session restored");
                    state.user = Some(user);
                    state.status = RequestStatus::Succeeded;
                }
                smallvec![Effect::None]
            },

            AuthAction::CurrentUserFailed { seq } => {
                if state.seq.accepts(seq, "auth") {
                    state.user = None;
                    state.status = RequestStatus::Failed;
                }
                smallvec![Effect::None]
            },

            AuthAction::LoginSucceeded | AuthAction::RegisterSucceeded => {
                state.status = RequestStatus::Succeeded;
                state.error = None;
                smallvec![Effect::send(AuthAction::FetchCurrentUser)]
            },

            AuthAction::LoginFailed { error } | AuthAction::RegisterFailed { error } => {
                state.status = RequestStatus::Failed;
                state.error = Some(error);
                smallvec![Effect::None]
            },

            AuthAction::LogoutSucceeded => {
                tracing::info!("Signed out");
                state.user = None;
                state.status = RequestStatus::Idle;
                state.error = None;
                smallvec![Effect::None]
            },

            AuthAction::LogoutFailed { error } => {
                if env.session.clear_session_on_logout_failure {
                    state.user = None;
                }
                state.status = RequestStatus::Failed;
                state.error = Some(error);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)] // Test code
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::fixtures::{admin, environment, user};
    use eventease_client::mock::{ApiCall, Reply};
    use eventease_client::{ApiError, MockApi, Route};
    use eventease_testing::{assertions, resolve_effects, ReducerTest};

    fn credentials() -> Credentials {
        Credentials {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        }
    }

    fn signed_in() -> AuthState {
        AuthState {
            user: Some(user()),
            status: RequestStatus::Succeeded,
            ..AuthState::default()
        }
    }

    #[test]
    fn login_marks_loading_and_clears_error() {
        ReducerTest::new(AuthReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(AuthState {
                error: Some("stale".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::Login(credentials()))
            .then_state(|state| {
                assert_eq!(state.status, RequestStatus::Loading);
                assert_eq!(state.error, None);
            })
            .then_effects(assertions::assert_has_future_effect)
            .run();
    }

    #[tokio::test]
    async fn login_success_follows_up_with_session_check() {
        let api = MockApi::new();
        api.push(Route::Login, Reply::Unit);
        let env = environment(api.clone());
        let mut state = AuthState::default();

        let effects = AuthReducer.reduce(&mut state, AuthAction::Login(credentials()), &env);
        let results = resolve_effects(effects).await;
        assert_eq!(results, vec![AuthAction::LoginSucceeded]);
        assert_eq!(api.calls(), vec![ApiCall::Login(credentials())]);

        let effects = AuthReducer.reduce(&mut state, AuthAction::LoginSucceeded, &env);
        assert_eq!(state.status, RequestStatus::Succeeded);
        assert_eq!(state.error, None);
        assert_eq!(resolve_effects(effects).await, vec![AuthAction::FetchCurrentUser]);
    }

    #[tokio::test]
    async fn login_failure_uses_server_message_or_fallback() {
        let api = MockApi::new();
        api.push(
            Route::Login,
            Reply::Failure(ApiError::Server {
                status: 401,
                message: Some("Invalid credentials".to_string()),
            }),
        )
        .push(Route::Login, Reply::Failure(ApiError::Request("offline".to_string())));
        let env = environment(api);
        let mut state = AuthState::default();

        let effects = AuthReducer.reduce(&mut state, AuthAction::Login(credentials()), &env);
        let results = resolve_effects(effects).await;
        assert_eq!(
            results,
            vec![AuthAction::LoginFailed {
                error: "Invalid credentials".to_string()
            }]
        );

        let effects = AuthReducer.reduce(&mut state, AuthAction::Login(credentials()), &env);
        let results = resolve_effects(effects).await;
        assert_eq!(
            results,
            vec![AuthAction::LoginFailed {
                error: LOGIN_FAILED.to_string()
            }]
        );

        AuthReducer.reduce(&mut state, results[0].clone(), &env);
        assert_eq!(state.status, RequestStatus::Failed);
        assert_eq!(state.error.as_deref(), Some("Login failed"));
    }

    #[tokio::test]
    async fn register_failure_falls_back() {
        let api = MockApi::new();
        api.push(
            Route::Register,
            Reply::Failure(ApiError::Server {
                status: 500,
                message: None,
            }),
        );
        let env = environment(api);
        let mut state = AuthState::default();

        let registration = Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        let effects = AuthReducer.reduce(&mut state, AuthAction::Register(registration), &env);
        assert_eq!(
            resolve_effects(effects).await,
            vec![AuthAction::RegisterFailed {
                error: REGISTRATION_FAILED.to_string()
            }]
        );
    }

    #[tokio::test]
    async fn session_check_failure_signs_out_silently() {
        let api = MockApi::new();
        api.push(
            Route::CurrentUser,
            Reply::Failure(ApiError::Server {
                status: 401,
                message: Some("Not authenticated".to_string()),
            }),
        );
        let env = environment(api);
        let mut state = AuthState {
            error: None,
            ..signed_in()
        };

        let effects = AuthReducer.reduce(&mut state, AuthAction::FetchCurrentUser, &env);
        assert_eq!(state.status, RequestStatus::Loading);
        for action in resolve_effects(effects).await {
            AuthReducer.reduce(&mut state, action, &env);
        }

        assert_eq!(state.user, None);
        assert_eq!(state.status, RequestStatus::Failed);
        assert_eq!(state.error, None);
    }

    #[test]
    fn stale_session_check_is_ignored() {
        let env = environment(MockApi::new());
        let mut state = AuthState::default();
        let first = state.seq.issue();
        let _second = state.seq.issue();

        AuthReducer.reduce(
            &mut state,
            AuthAction::CurrentUserLoaded {
                seq: first,
                user: admin(),
            },
            &env,
        );
        assert_eq!(state.user, None);
        assert_eq!(state.status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn logout_success_clears_user() {
        let api = MockApi::new();
        api.push(Route::Logout, Reply::Unit);
        let env = environment(api);
        let mut state = signed_in();

        let effects = AuthReducer.reduce(&mut state, AuthAction::Logout, &env);
        for action in resolve_effects(effects).await {
            AuthReducer.reduce(&mut state, action, &env);
        }

        assert_eq!(state.user, None);
        assert_eq!(state.status, RequestStatus::Idle);
        assert_eq!(state.error, None);
    }

    #[test]
    fn logout_failure_keeps_user_by_default() {
        ReducerTest::new(AuthReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(signed_in())
            .when_action(AuthAction::LogoutFailed {
                error: LOGOUT_FAILED.to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.user, Some(user()));
                assert_eq!(state.status, RequestStatus::Failed);
                assert_eq!(state.error.as_deref(), Some("Logout failed"));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn logout_failure_can_clear_session() {
        let env = environment(MockApi::new()).with_session(SessionConfig {
            clear_session_on_logout_failure: true,
        });
        ReducerTest::new(AuthReducer::new())
            .with_env(env)
            .given_state(signed_in())
            .when_action(AuthAction::LogoutFailed {
                error: LOGOUT_FAILED.to_string(),
            })
            .then_state(|state| {
                assert_eq!(state.user, None);
                assert_eq!(state.error.as_deref(), Some("Logout failed"));
            })
            .run();
    }

    #[tokio::test]
    async fn logout_invalidates_pending_session_check() {
        let env = environment(MockApi::new());
        let mut state = AuthState::default();
        let pending = state.seq.issue();

        let effects = AuthReducer.reduce(&mut state, AuthAction::Logout, &env);
        AuthReducer.reduce(
            &mut state,
            AuthAction::CurrentUserLoaded {
                seq: pending,
                user: user(),
            },
            &env,
        );
        assert_eq!(state.user, None);
        assert_eq!(state.status, RequestStatus::Loading);

        for result in resolve_effects(effects).await {
            AuthReducer.reduce(&mut state, result, &env);
        }
        assert_eq!(state.user, None);
        assert_eq!(state.status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn set_user_settles_pending_session_check() {
        let api = MockApi::new();
        api.push(Route::CurrentUser, Reply::User(user()));
        let env = environment(api);
        let mut state = AuthState::default();

        let effects = AuthReducer.reduce(&mut state, AuthAction::FetchCurrentUser, &env);
        assert_eq!(state.status, RequestStatus::Loading);

        AuthReducer.reduce(&mut state, AuthAction::SetUser(admin()), &env);
        assert_eq!(state.status, RequestStatus::Succeeded);

        for result in resolve_effects(effects).await {
            AuthReducer.reduce(&mut state, result, &env);
        }
        assert_eq!(state.user, Some(admin()));
        assert_eq!(state.status, RequestStatus::Succeeded);
    }

    #[tokio::test]
    async fn login_ignores_failing_session_check() {
        let api = MockApi::new();
        api.push(Route::Login, Reply::Unit);
        let env = environment(api);
        let mut state = AuthState::default();
        let pending = state.seq.issue();

        let effects = AuthReducer.reduce(&mut state, AuthAction::Login(credentials()), &env);
        AuthReducer.reduce(&mut state, AuthAction::CurrentUserFailed { seq: pending }, &env);
        assert_eq!(state.status, RequestStatus::Loading);

        for result in resolve_effects(effects).await {
            AuthReducer.reduce(&mut state, result, &env);
        }
        assert_eq!(state.status, RequestStatus::Succeeded);
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn register_ignores_failing_session_check() {
        let api = MockApi::new();
        api.push(Route::Register, Reply::Unit);
        let env = environment(api);
        let mut state = AuthState::default();
        let pending = state.seq.issue();

        let registration = Registration {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        };
        let effects = AuthReducer.reduce(&mut state, AuthAction::Register(registration), &env);
        AuthReducer.reduce(&mut state, AuthAction::CurrentUserFailed { seq: pending }, &env);
        assert_eq!(state.status, RequestStatus::Loading);

        for result in resolve_effects(effects).await {
            AuthReducer.reduce(&mut state, result, &env);
        }
        assert_eq!(state.status, RequestStatus::Succeeded);
    }

    #[test]
    fn set_user_and_clear_error_are_local() {
        ReducerTest::new(AuthReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(AuthState {
                error: Some("Login failed".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::SetUser(admin()))
            .then_state(|state| {
                assert_eq!(state.user, Some(admin()));
                assert!(state.is_authenticated());
            })
            .then_effects(assertions::assert_no_request)
            .run();

        ReducerTest::new(AuthReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(AuthState {
                error: Some("Login failed".to_string()),
                ..AuthState::default()
            })
            .when_action(AuthAction::ClearError)
            .then_state(|state| assert_eq!(state.error, None))
            .run();
    }
}
