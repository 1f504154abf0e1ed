//! Event slice: the paginated event list, the selected event and admin CRUD.

use crate::collection::{self, Placement};
use crate::environment::EventEaseEnvironment;
use crate::status::{RequestSeq, RequestStatus};
use eventease_client::{Event, EventForm, EventPage, EventQuery, Pagination};
use eventease_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Fallback when the event list cannot be loaded
pub const FETCH_FAILED: &str = "Failed to fetch events";
/// Fallback when a single event cannot be loaded
pub const FETCH_ONE_FAILED: &str = "Failed to fetch event";
/// Fallback when event creation fails
pub const CREATE_FAILED: &str = "Event creation failed";
/// Fallback when an event update fails
pub const UPDATE_FAILED: &str = "Event update failed";
/// Fallback when event deletion fails
pub const DELETE_FAILED: &str = "Event deletion failed";

/// Event slice state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventState {
    /// Events on the current page, unique by id
    pub events: Vec<Event>,
    /// Pagination of the last successful list fetch
    pub pagination: Option<Pagination>,
    /// Event opened on the detail page
    pub selected: Option<Event>,
    /// Status of the detail fetch; list and CRUD operations use `status`
    pub detail_status: RequestStatus,
    /// Last list or CRUD operation status
    pub status: RequestStatus,
    /// Last error message
    pub error: Option<String>,
    /// Fence for list fetches
    pub seq: RequestSeq,
    /// Fence for detail fetches
    pub detail_seq: RequestSeq,
}

impl EventState {
    /// Look up an event by internal id or `eventId`
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Event> {
        self.events.iter().find(|event| event.matches_key(key))
    }
}

/// Event slice actions
#[derive(Debug, Clone, PartialEq)]
pub enum EventAction {
    // Commands
    /// Load a page of events
    FetchEvents(EventQuery),
    /// Load one event for the detail page
    FetchEvent {
        /// Event id
        id: String,
    },
    /// Create an event (admin)
    CreateEvent(EventForm),
    /// Update an event (admin)
    UpdateEvent {
        /// Event id
        id: String,
        /// New field values
        form: EventForm,
    },
    /// Delete an event (admin); `id` may be the internal id or `eventId`
    DeleteEvent {
        /// Event key
        id: String,
    },
    /// Drop the selected event
    ClearSelectedEvent,
    /// Back to the initial state
    ResetEvents,
    /// Drop the last error message
    ClearError,

    // Results
    /// Event page loaded
    EventsLoaded {
        /// Request sequence number
        seq: u64,
        /// Events and pagination
        page: EventPage,
    },
    /// Event page failed to load
    EventsFailed {
        /// Request sequence number
        seq: u64,
        /// User-facing message
        error: String,
    },
    /// Single event loaded
    EventLoaded {
        /// Request sequence number
        seq: u64,
        /// The event
        event: Event,
    },
    /// Single event failed to load
    EventFailed {
        /// Request sequence number
        seq: u64,
        /// User-facing message
        error: String,
    },
    /// Event created
    EventCreated(Event),
    /// Event creation failed
    CreateEventFailed {
        /// User-facing message
        error: String,
    },
    /// Event updated
    EventUpdated(Event),
    /// Event update failed
    UpdateEventFailed {
        /// User-facing message
        error: String,
    },
    /// Event deleted
    EventDeleted {
        /// Event key as sent
        id: String,
    },
    /// Event deletion failed
    DeleteEventFailed {
        /// User-facing message
        error: String,
    },
}

/// Reducer for the event slice
#[derive(Debug, Clone, Copy, Default)]
pub struct EventReducer;

impl EventReducer {
    /// Creates a new `EventReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn begin(state: &mut EventState) {
        state.status = RequestStatus::Loading;
        state.error = None;
    }

    fn fail(state: &mut EventState, error: String) {
        state.status = RequestStatus::Failed;
        state.error = Some(error);
    }

    fn validate(state: &mut EventState, form: &EventForm, require_image: bool) -> bool {
        match form.validate(require_image) {
            Ok(()) => true,
            Err(error) => {
                Self::fail(state, error.to_string());
                false
            },
        }
    }
}

impl Reducer for EventReducer {
    type State = EventState;
    type Action = EventAction;
    type Environment = EventEaseEnvironment;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            EventAction::FetchEvents(query) => {
                Self::begin(state);
                let seq = state.seq.issue();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.list_events(query).await {
                        Ok(page) => Some(EventAction::EventsLoaded { seq, page }),
                        Err(error) => Some(EventAction::EventsFailed {
                            seq,
                            error: error.user_message(FETCH_FAILED),
                        }),
                    }
                })]
            },

            EventAction::FetchEvent { id } => {
                state.detail_status = RequestStatus::Loading;
                state.error = None;
                let seq = state.detail_seq.issue();
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.get_event(id).await {
                        Ok(event) => Some(EventAction::EventLoaded { seq, event }),
                        Err(error) => Some(EventAction::EventFailed {
                            seq,
                            error: error.user_message(FETCH_ONE_FAILED),
                        }),
                    }
                })]
            },

            EventAction::CreateEvent(form) => {
                if !Self::validate(state, &form, true) {
                    return smallvec![Effect::None];
                }
                Self::begin(state);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.create_event(form).await {
                        Ok(event) => Some(EventAction::EventCreated(event)),
                        Err(error) => Some(EventAction::CreateEventFailed {
                            error: error.user_message(CREATE_FAILED),
                        }),
                    }
                })]
            },

            EventAction::UpdateEvent { id, form } => {
                if !Self::validate(state, &form, false) {
                    return smallvec![Effect::None];
                }
                Self::begin(state);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.update_event(id, form).await {
                        Ok(event) => Some(EventAction::EventUpdated(event)),
                        Err(error) => Some(EventAction::UpdateEventFailed {
                            error: error.user_message(UPDATE_FAILED),
                        }),
                    }
                })]
            },

            EventAction::DeleteEvent { id } => {
                Self::begin(state);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.delete_event(id.clone()).await {
                        Ok(()) => Some(EventAction::EventDeleted { id }),
                        Err(error) => Some(EventAction::DeleteEventFailed {
                            error: error.user_message(DELETE_FAILED),
                        }),
                    }
                })]
            },

            EventAction::ClearSelectedEvent => {
                state.detail_seq.issue();
                state.selected = None;
                state.detail_status = RequestStatus::Idle;
                smallvec![Effect::None]
            },

            EventAction::ResetEvents => {
                let (mut seq, mut detail_seq) = (state.seq, state.detail_seq);
                seq.issue();
                detail_seq.issue();
                *state = EventState {
                    seq,
                    detail_seq,
                    ..EventState::default()
                };
                smallvec![Effect::None]
            },

            EventAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            },

            // ========== Results ==========
            EventAction::EventsLoaded { seq, page } => {
                if state.seq.accepts(seq, "event") {
                    state.events = collection::dedup_by_key(page.events, |e| e.id.as_str());
                    state.pagination = page.pagination;
                    state.status = RequestStatus::Succeeded;
                }
                smallvec![Effect::None]
            },

            EventAction::EventsFailed { seq, error } => {
                if state.seq.accepts(seq, "event") {
                    Self::fail(state, error);
                }
                smallvec![Effect::None]
            },

            EventAction::EventLoaded { seq, event } => {
                if state.detail_seq.accepts(seq, "event") {
                    collection::replace(&mut state.events, event.clone(), |e| e.id.as_str());
                    state.selected = Some(event);
                    state.detail_status = RequestStatus::Succeeded;
                }
                smallvec![Effect::None]
            },

            EventAction::EventFailed { seq, error } => {
                if state.detail_seq.accepts(seq, "event") {
                    state.selected = None;
                    state.detail_status = RequestStatus::Failed;
                    state.error = Some(error);
                }
                smallvec![Effect::None]
            },

            EventAction::EventCreated(event) => {
                tracing::info!(id = %event.id, title = %event.title, "Event created");
                collection::upsert(&mut state.events, event, Placement::Front, |e| e.id.as_str());
                state.status = RequestStatus::Succeeded;
                state.error = None;
                smallvec![Effect::None]
            },

            EventAction::EventUpdated(event) => {
                if state.selected.as_ref().is_some_and(|s| s.id == event.id) {
                    state.selected = Some(event.clone());
                }
                if !collection::replace(&mut state.events, event, |e| e.id.as_str()) {
                    tracing::debug!("Updated event is not on the current page");
                }
                state.status = RequestStatus::Succeeded;
                smallvec![Effect::None]
            },

            EventAction::EventDeleted { id } => {
                // Internal ids win over `eventId` so one delete removes one entry
                let position = state
                    .events
                    .iter()
                    .position(|event| event.id == id)
                    .or_else(|| state.events.iter().position(|event| event.matches_key(&id)));
                if let Some(index) = position {
                    state.events.remove(index);
                }
                if state.selected.as_ref().is_some_and(|s| s.matches_key(&id)) {
                    state.selected = None;
                }
                state.status = RequestStatus::Succeeded;
                smallvec![Effect::None]
            },

            EventAction::CreateEventFailed { error }
            | EventAction::UpdateEventFailed { error }
            | EventAction::DeleteEventFailed { error } => {
                Self::fail(state, error);
                smallvec![Effect::None]
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::fixtures::{environment, event, event_form};
    use eventease_client::mock::{ApiCall, Reply};
    use eventease_client::{ApiError, MockApi, Route};
    use eventease_testing::{assertions, resolve_effects, ReducerTest};

    fn pagination(page: u32, total: u64, pages: u32) -> Pagination {
        Pagination {
            page,
            total,
            pages,
            limit: Some(10),
        }
    }

    async fn run(
        state: &mut EventState,
        action: EventAction,
        env: &EventEaseEnvironment,
    ) -> Vec<RequestStatus> {
        let mut seen = Vec::new();
        let effects = EventReducer.reduce(state, action, env);
        seen.push(state.status);
        for result in resolve_effects(effects).await {
            EventReducer.reduce(state, result, env);
            seen.push(state.status);
        }
        seen
    }

    #[tokio::test]
    async fn fetch_replaces_events_and_pagination() {
        let api = MockApi::new();
        api.push(
            Route::ListEvents,
            Reply::Events(EventPage {
                events: vec![event("e1", "Jazz Night"), event("e2", "Rust Meetup")],
                pagination: Some(pagination(2, 12, 2)),
            }),
        );
        let env = environment(api.clone());
        let mut state = EventState {
            events: vec![event("old", "Old")],
            pagination: Some(pagination(1, 1, 1)),
            ..EventState::default()
        };

        let query = EventQuery::new().page(2).search("music");
        let statuses = run(&mut state, EventAction::FetchEvents(query.clone()), &env).await;

        assert_eq!(statuses, vec![RequestStatus::Loading, RequestStatus::Succeeded]);
        assert_eq!(state.events.len(), 2);
        assert_eq!(state.pagination, Some(pagination(2, 12, 2)));
        assert_eq!(api.calls(), vec![ApiCall::ListEvents(query)]);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_pagination_untouched() {
        let api = MockApi::new();
        api.push(
            Route::ListEvents,
            Reply::Failure(ApiError::Server {
                status: 500,
                message: None,
            }),
        );
        let env = environment(api);
        let mut state = EventState {
            events: vec![event("e1", "Jazz Night")],
            pagination: Some(pagination(1, 1, 1)),
            ..EventState::default()
        };

        let statuses = run(&mut state, EventAction::FetchEvents(EventQuery::new()), &env).await;

        assert_eq!(statuses, vec![RequestStatus::Loading, RequestStatus::Failed]);
        assert_eq!(state.error.as_deref(), Some(FETCH_FAILED));
        assert_eq!(state.pagination, Some(pagination(1, 1, 1)));
        assert_eq!(state.events.len(), 1);
    }

    #[test]
    fn stale_page_is_discarded() {
        let env = environment(MockApi::new());
        let mut state = EventState::default();
        let first = state.seq.issue();
        let second = state.seq.issue();

        EventReducer.reduce(
            &mut state,
            EventAction::EventsLoaded {
                seq: second,
                page: EventPage {
                    events: vec![event("e2", "Newer")],
                    pagination: Some(pagination(2, 2, 2)),
                },
            },
            &env,
        );
        EventReducer.reduce(
            &mut state,
            EventAction::EventsLoaded {
                seq: first,
                page: EventPage {
                    events: vec![event("e1", "Older")],
                    pagination: Some(pagination(1, 2, 2)),
                },
            },
            &env,
        );

        assert_eq!(state.events[0].id, "e2");
        assert_eq!(state.pagination.unwrap().page, 2);
    }

    #[tokio::test]
    async fn create_prepends_returned_event() {
        let api = MockApi::new();
        api.push(Route::CreateEvent, Reply::Event(event("e9", "Launch Party")));
        let env = environment(api);
        let mut state = EventState {
            events: vec![event("e1", "Jazz Night")],
            ..EventState::default()
        };

        let statuses = run(&mut state, EventAction::CreateEvent(event_form("Launch Party")), &env).await;

        assert_eq!(statuses, vec![RequestStatus::Loading, RequestStatus::Succeeded]);
        assert_eq!(state.events[0].id, "e9");
        assert_eq!(state.events.iter().filter(|e| e.id == "e9").count(), 1);
    }

    #[test]
    fn create_requires_image() {
        let mut form = event_form("Launch Party");
        form.image = None;

        ReducerTest::new(EventReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(EventState::default())
            .when_action(EventAction::CreateEvent(form))
            .then_state(|state| {
                assert_eq!(state.status, RequestStatus::Failed);
                assert_eq!(state.error.as_deref(), Some("Thumbnail image is required"));
            })
            .then_effects(assertions::assert_no_request)
            .run();
    }

    #[tokio::test]
    async fn update_without_image_replaces_entry() {
        let api = MockApi::new();
        let mut updated = event("e1", "Jazz Night (moved)");
        updated.location = Some("Rooftop".to_string());
        api.push(Route::UpdateEvent, Reply::Event(updated.clone()));
        let env = environment(api);
        let mut state = EventState {
            events: vec![event("e1", "Jazz Night"), event("e2", "Rust Meetup")],
            selected: Some(event("e1", "Jazz Night")),
            ..EventState::default()
        };

        let mut form = event_form("Jazz Night (moved)");
        form.image = None;
        run(
            &mut state,
            EventAction::UpdateEvent {
                id: "e1".to_string(),
                form,
            },
            &env,
        )
        .await;

        assert_eq!(state.events.len(), 2);
        assert_eq!(state.events[0], updated);
        assert_eq!(state.selected, Some(updated));
    }

    #[test]
    fn update_of_absent_event_is_a_no_op() {
        ReducerTest::new(EventReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(EventState {
                events: vec![event("e1", "Jazz Night")],
                ..EventState::default()
            })
            .when_action(EventAction::EventUpdated(event("e7", "Elsewhere")))
            .then_state(|state| {
                assert_eq!(state.events.len(), 1);
                assert_eq!(state.events[0].id, "e1");
            })
            .run();
    }

    #[tokio::test]
    async fn delete_matches_either_identifier() {
        let api = MockApi::new();
        api.push(Route::DeleteEvent, Reply::Unit)
            .push(Route::DeleteEvent, Reply::Unit);
        let env = environment(api);
        let mut state = EventState {
            events: vec![event("e1", "Jazz Night"), event("e2", "Rust Meetup"), event("e3", "Gala")],
            ..EventState::default()
        };

        run(&mut state, EventAction::DeleteEvent { id: "e1".to_string() }, &env).await;
        assert_eq!(state.events.len(), 2);
        assert!(state.find("e1").is_none());

        run(&mut state, EventAction::DeleteEvent { id: "EV-e2".to_string() }, &env).await;
        assert_eq!(state.events.len(), 1);
        assert!(state.find("e2").is_none());
    }

    #[test]
    fn delete_removes_one_entry_when_identifiers_collide() {
        let mut shadow = event("e2", "Shadow");
        shadow.event_id = "e1".to_string();

        ReducerTest::new(EventReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(EventState {
                events: vec![shadow, event("e1", "Jazz Night")],
                ..EventState::default()
            })
            .when_action(EventAction::EventDeleted { id: "e1".to_string() })
            .then_state(|state| {
                assert_eq!(state.events.len(), 1);
                assert_eq!(state.events[0].id, "e2");
            })
            .run();
    }

    #[tokio::test]
    async fn fetch_single_event_selects_it() {
        let api = MockApi::new();
        let fresh = event("e1", "Jazz Night (updated)");
        api.push(Route::GetEvent, Reply::Event(fresh.clone()))
            .push(
                Route::GetEvent,
                Reply::Failure(ApiError::Server {
                    status: 404,
                    message: Some("Event not found".to_string()),
                }),
            );
        let env = environment(api);
        let mut state = EventState {
            events: vec![event("e1", "Jazz Night")],
            ..EventState::default()
        };

        run(&mut state, EventAction::FetchEvent { id: "e1".to_string() }, &env).await;
        assert_eq!(state.selected, Some(fresh.clone()));
        assert_eq!(state.events[0], fresh);
        assert_eq!(state.detail_status, RequestStatus::Succeeded);

        run(&mut state, EventAction::FetchEvent { id: "nope".to_string() }, &env).await;
        assert_eq!(state.selected, None);
        assert_eq!(state.error.as_deref(), Some("Event not found"));
        assert_eq!(state.detail_status, RequestStatus::Failed);
        assert_eq!(state.status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn clearing_selection_settles_pending_detail_fetch() {
        let api = MockApi::new();
        api.push(Route::GetEvent, Reply::Event(event("e1", "Jazz Night")));
        let env = environment(api);
        let mut state = EventState::default();

        let effects = EventReducer.reduce(&mut state, EventAction::FetchEvent { id: "e1".to_string() }, &env);
        assert_eq!(state.detail_status, RequestStatus::Loading);

        EventReducer.reduce(&mut state, EventAction::ClearSelectedEvent, &env);
        for result in resolve_effects(effects).await {
            EventReducer.reduce(&mut state, result, &env);
        }

        assert_eq!(state.selected, None);
        assert_eq!(state.detail_status, RequestStatus::Idle);
        assert_eq!(state.status, RequestStatus::Idle);
    }

    #[tokio::test]
    async fn detail_fetch_does_not_settle_list_fetch() {
        let api = MockApi::new();
        api.push(Route::GetEvent, Reply::Event(event("e1", "Jazz Night")));
        let env = environment(api);
        let mut state = EventState::default();

        let _ = EventReducer.reduce(&mut state, EventAction::FetchEvents(EventQuery::new()), &env);
        let list_seq = state.seq.latest();
        run(&mut state, EventAction::FetchEvent { id: "e1".to_string() }, &env).await;

        assert_eq!(state.status, RequestStatus::Loading);
        assert_eq!(state.detail_status, RequestStatus::Succeeded);

        EventReducer.reduce(
            &mut state,
            EventAction::EventsLoaded {
                seq: list_seq,
                page: EventPage::default(),
            },
            &env,
        );
        assert_eq!(state.status, RequestStatus::Succeeded);
    }

    #[test]
    fn reset_clears_everything() {
        ReducerTest::new(EventReducer::new())
            .with_env(environment(MockApi::new()))
            .given_state(EventState {
                events: vec![event("e1", "Jazz Night")],
                pagination: Some(pagination(1, 1, 1)),
                error: Some("Event update failed".to_string()),
                status: RequestStatus::Failed,
                ..EventState::default()
            })
            .when_action(EventAction::ResetEvents)
            .then_state(|state| {
                assert!(state.events.is_empty());
                assert_eq!(state.pagination, None);
                assert_eq!(state.error, None);
                assert_eq!(state.status, RequestStatus::Idle);
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }
}
