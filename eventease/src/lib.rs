//! # EventEase
//!
//! Client-side state layer for the EventEase event booking application.
//!
//! ## Slices
//!
//! - [`auth`]: the signed-in user, login, registration and logout
//! - [`category`]: event categories (admin create / delete)
//! - [`event`]: the paginated, filterable event list and the event detail
//! - [`booking`]: booking seats, the user's and the admin's booking lists,
//!   and cancellation
//!
//! Each slice is a [`Reducer`](eventease_core::reducer::Reducer). The
//! [`store`] module scopes them into one [`AppState`](store::AppState) and
//! runs them in an [`eventease_runtime::Store`]; [`view`] holds pure
//! selectors the presentation layer reads.
//!
//! Every slice tracks a [`RequestStatus`](status::RequestStatus) and the last
//! error message. Fetches are fenced by a per-slice sequence number, so a
//! slow response never overwrites a newer one.
//!
//! ## Example
//!
//! ```ignore
//! use eventease::{build_store, EventEaseEnvironment, AppAction, EventAction};
//! use eventease_client::{ApiClient, ClientConfig, EventQuery};
//! use eventease_core::environment::SystemClock;
//!
//! let api = ApiClient::new(&ClientConfig::default())?;
//! let store = build_store(EventEaseEnvironment::new(Arc::new(api), Arc::new(SystemClock)));
//!
//! let query = EventQuery::new().search("music").category("cat1");
//! let mut handle = store.send(EventAction::FetchEvents(query).into()).await?;
//! handle.wait_with_timeout(Duration::from_secs(5)).await?;
//!
//! let titles = store
//!     .state(|s| s.event.events.iter().map(|e| e.title.clone()).collect::<Vec<_>>())
//!     .await;
//! ```

pub mod auth;
pub mod booking;
pub mod category;
pub(crate) mod collection;
pub mod config;
pub mod environment;
pub mod event;
pub mod status;
pub mod store;
pub mod view;

#[cfg(test)]
mod fixtures;

pub use auth::{AuthAction, AuthReducer, AuthState};
pub use booking::{BookingAction, BookingReducer, BookingState};
pub use category::{CategoryAction, CategoryReducer, CategoryState};
pub use config::{ConfigError, EventEaseConfig};
pub use environment::EventEaseEnvironment;
pub use event::{EventAction, EventReducer, EventState};
pub use status::{RequestSeq, RequestStatus};
pub use store::{app_reducer, build_store, AppAction, AppReducer, AppState, AppStore};
