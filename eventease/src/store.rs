//! The application store: four slices composed into one state tree.
//!
//! Each slice reducer is scoped to its field of [`AppState`] and its variant
//! of [`AppAction`], then the scoped reducers are combined. An action only
//! ever reaches the slice it names.

use crate::auth::{AuthAction, AuthReducer, AuthState};
use crate::booking::{BookingAction, BookingReducer, BookingState};
use crate::category::{CategoryAction, CategoryReducer, CategoryState};
use crate::environment::EventEaseEnvironment;
use crate::event::{EventAction, EventReducer, EventState};
use eventease_core::composition::{combine_reducers, scope_reducer, CombinedReducer, SharedReducer};
use eventease_runtime::Store;
use std::sync::Arc;

/// The whole client state tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// Session
    pub auth: AuthState,
    /// Categories
    pub category: CategoryState,
    /// Events
    pub event: EventState,
    /// Bookings
    pub booking: BookingState,
}

/// Every action the store accepts, tagged by slice
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    /// Auth slice
    Auth(AuthAction),
    /// Category slice
    Category(CategoryAction),
    /// Event slice
    Event(EventAction),
    /// Booking slice
    Booking(BookingAction),
}

impl From<AuthAction> for AppAction {
    fn from(action: AuthAction) -> Self {
        Self::Auth(action)
    }
}

impl From<CategoryAction> for AppAction {
    fn from(action: CategoryAction) -> Self {
        Self::Category(action)
    }
}

impl From<EventAction> for AppAction {
    fn from(action: EventAction) -> Self {
        Self::Event(action)
    }
}

impl From<BookingAction> for AppAction {
    fn from(action: BookingAction) -> Self {
        Self::Booking(action)
    }
}

/// Reducer over the whole tree
pub type AppReducer = CombinedReducer<AppState, AppAction, EventEaseEnvironment>;

/// The runtime store running [`AppReducer`]
pub type AppStore = Store<AppState, AppAction, EventEaseEnvironment, AppReducer>;

type Shared = SharedReducer<AppState, AppAction, EventEaseEnvironment>;

const fn auth_state(state: &mut AppState) -> &mut AuthState {
    &mut state.auth
}

const fn category_state(state: &mut AppState) -> &mut CategoryState {
    &mut state.category
}

const fn event_state(state: &mut AppState) -> &mut EventState {
    &mut state.event
}

const fn booking_state(state: &mut AppState) -> &mut BookingState {
    &mut state.booking
}

fn auth_action(action: AppAction) -> Option<AuthAction> {
    match action {
        AppAction::Auth(action) => Some(action),
        _ => None,
    }
}

fn category_action(action: AppAction) -> Option<CategoryAction> {
    match action {
        AppAction::Category(action) => Some(action),
        _ => None,
    }
}

fn event_action(action: AppAction) -> Option<EventAction> {
    match action {
        AppAction::Event(action) => Some(action),
        _ => None,
    }
}

fn booking_action(action: AppAction) -> Option<BookingAction> {
    match action {
        AppAction::Booking(action) => Some(action),
        _ => None,
    }
}

/// Build the combined reducer
#[must_use]
pub fn app_reducer() -> AppReducer {
    combine_reducers(vec![
        Arc::new(scope_reducer(AuthReducer::new(), auth_state, auth_action, AppAction::Auth)) as Shared,
        Arc::new(scope_reducer(
            CategoryReducer::new(),
            category_state,
            category_action,
            AppAction::Category,
        )) as Shared,
        Arc::new(scope_reducer(EventReducer::new(), event_state, event_action, AppAction::Event)) as Shared,
        Arc::new(scope_reducer(
            BookingReducer::new(),
            booking_state,
            booking_action,
            AppAction::Booking,
        )) as Shared,
    ])
}

/// Create a store with an empty state tree
///
/// ```ignore
/// let store = eventease::store::build_store(environment);
/// store.send(CategoryAction::FetchCategories.into()).await?;
/// ```
#[must_use]
pub fn build_store(environment: EventEaseEnvironment) -> AppStore {
    Store::new(AppState::default(), app_reducer(), environment)
}
