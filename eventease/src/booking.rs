//! Booking slice: seat reservations for the signed-in user and the admin
//! booking tables.
//!
//! The three list fetches share one collection and one fence, so whichever
//! list was requested last is the one shown.

use crate::collection::{self, Placement};
use crate::environment::EventEaseEnvironment;
use crate::status::{RequestSeq, RequestStatus};
use eventease_client::{Booking, BookingPage, BookingRequest, BookingStatus, Pagination};
use eventease_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
use std::sync::Arc;

/// Fallback when booking fails
pub const BOOK_FAILED: &str = "Booking failed";
/// Fallback when the user's bookings cannot be loaded
pub const FETCH_MINE_FAILED: &str = "Fetching my bookings failed";
/// Fallback when the admin booking list cannot be loaded
pub const FETCH_ALL_FAILED: &str = "Fetching all bookings failed";
/// Fallback when an event's bookings cannot be loaded
pub const FETCH_BY_EVENT_FAILED: &str = "Fetching bookings by event failed";
/// Fallback when cancellation fails
pub const CANCEL_FAILED: &str = "Failed to cancel booking.";
/// Error recorded when a cancellation is refused locally
pub const NOT_CANCELLABLE: &str = "This booking can no longer be cancelled";
/// Error recorded when the booking to cancel is not loaded
pub const UNKNOWN_BOOKING: &str = "Booking not found";

/// Booking slice state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingState {
    /// Loaded bookings, unique by id
    pub bookings: Vec<Booking>,
    /// Pagination of the last paged fetch; `None` after a by-event fetch
    pub pagination: Option<Pagination>,
    /// Last operation status
    pub status: RequestStatus,
    /// Last error message
    pub error: Option<String>,
    /// Fence for list fetches
    pub seq: RequestSeq,
}

impl BookingState {
    /// Look up a booking by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id == id)
    }
}

/// Booking slice actions
#[derive(Debug, Clone, PartialEq)]
pub enum BookingAction {
    // Commands
    /// Reserve seats for an event
    BookEvent {
        /// Event id
        event_id: String,
        /// Number of seats
        seats: u32,
    },
    /// Load the signed-in user's bookings
    FetchMyBookings,
    /// Load one page of every booking (admin)
    FetchAllBookings {
        /// Page to load (1-based)
        page: u32,
    },
    /// Load every booking for one event (admin)
    FetchBookingsByEvent {
        /// Event id
        event_id: String,
    },
    /// Cancel a confirmed booking for an upcoming event
    CancelBooking {
        /// Booking id
        booking_id: String,
    },
    /// Drop the last error message
    ClearError,

    // Results
    /// Booking confirmed by the server
    BookingCreated(Booking),
    /// Booking rejected
    BookEventFailed {
        /// User-facing message
        error: String,
    },
    /// A booking list loaded
    BookingsLoaded {
        /// Request sequence number
        seq: u64,
        /// Bookings and pagination
        page: BookingPage,
    },
    /// A booking list failed to load
    BookingsFailed {
        /// Request sequence number
        seq: u64,
        /// User-facing message
        error: String,
    },
    /// Booking cancelled
    BookingCancelled {
        /// Booking id
        booking_id: String,
        /// Updated booking, when the server sent one back
        booking: Option<Booking>,
    },
    /// Cancellation failed
    CancelBookingFailed {
        /// User-facing message
        error: String,
    },
}

/// Reducer for the booking slice
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn begin(state: &mut BookingState) {
        state.status = RequestStatus::Loading;
        state.error = None;
    }

    fn fail(state: &mut BookingState, error: String) {
        state.status = RequestStatus::Failed;
        state.error = Some(error);
    }

    fn validate_cancel(
        state: &BookingState,
        booking_id: &str,
        env: &EventEaseEnvironment,
    ) -> Result<(), &'static str> {
        let Some(booking) = state.get(booking_id) else {
            return Err(UNKNOWN_BOOKING);
        };
        if !booking.is_cancellable(env.clock.now()) {
            return Err(NOT_CANCELLABLE);
        }
        Ok(())
    }

    /// Start a list fetch under a fresh sequence number
    fn fetch_list(
        state: &mut BookingState,
        env: &EventEaseEnvironment,
        list: BookingList,
    ) -> Effect<BookingAction> {
        Self::begin(state);
        let seq = state.seq.issue();
        let api = Arc::clone(&env.api);
        Effect::future(async move {
            let fallback = list.fallback();
            let result = match list {
                BookingList::Mine => api.my_bookings().await,
                BookingList::All { page } => api.all_bookings(page).await,
                BookingList::ByEvent { event_id } => {
                    api.bookings_by_event(event_id).await.map(|bookings| BookingPage {
                        bookings,
                        pagination: None,
                    })
                },
            };
            match result {
                Ok(page) => Some(BookingAction::BookingsLoaded { seq, page }),
                Err(error) => Some(BookingAction::BookingsFailed {
                    seq,
                    error: error.user_message(fallback),
                }),
            }
        })
    }
}

/// The booking lists the slice can show
#[derive(Debug)]
enum BookingList {
    Mine,
    All { page: u32 },
    ByEvent { event_id: String },
}

impl BookingList {
    const fn fallback(&self) -> &'static str {
        match self {
            Self::Mine => FETCH_MINE_FAILED,
            Self::All { .. } => FETCH_ALL_FAILED,
            Self::ByEvent { .. } => FETCH_BY_EVENT_FAILED,
        }
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
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
            BookingAction::BookEvent { event_id, seats } => {
                let request = BookingRequest { event_id, seats };
                if let Err(error) = request.validate() {
                    Self::fail(state, error.to_string());
                    return smallvec![Effect::None];
                }
                Self::begin(state);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.book_event(request).await {
                        Ok(booking) => Some(BookingAction::BookingCreated(booking)),
                        Err(error) => Some(BookingAction::BookEventFailed {
                            error: error.user_message(BOOK_FAILED),
                        }),
                    }
                })]
            },

            BookingAction::FetchMyBookings => {
                smallvec![Self::fetch_list(state, env, BookingList::Mine)]
            },

            BookingAction::FetchAllBookings { page } => {
                smallvec![Self::fetch_list(state, env, BookingList::All { page })]
            },

            BookingAction::FetchBookingsByEvent { event_id } => {
                smallvec![Self::fetch_list(state, env, BookingList::ByEvent { event_id })]
            },

            BookingAction::CancelBooking { booking_id } => {
                if let Err(error) = Self::validate_cancel(state, &booking_id, env) {
                    tracing::debug!(%booking_id, error, "Cancellation refused locally");
                    Self::fail(state, error.to_string());
                    return smallvec![Effect::None];
                }
                Self::begin(state);
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    match api.cancel_booking(booking_id.clone()).await {
                        Ok(booking) => Some(BookingAction::BookingCancelled { booking_id, booking }),
                        Err(error) => Some(BookingAction::CancelBookingFailed {
                            error: error.user_message(CANCEL_FAILED),
                        }),
                    }
                })]
            },

            BookingAction::ClearError => {
                state.error = None;
                smallvec![Effect::None]
            },

            // ========== Results ==========
            BookingAction::BookingCreated(booking) => {
                tracing::info!(id = %booking.id, seats = booking.seats, "Booking confirmed");
                collection::upsert(&mut state.bookings, booking, Placement::Back, |b| b.id.as_str());
                state.status = RequestStatus::Succeeded;
                state.error = None;
                smallvec![Effect::None]
            },

            BookingAction::BookingsLoaded { seq, page } => {
                if state.seq.accepts(seq, "booking") {
                    state.bookings = collection::dedup_by_key(page.bookings, |b| b.id.as_str());
                    state.pagination = page.pagination;
                    state.status = RequestStatus::Succeeded;
                }
                smallvec![Effect::None]
            },

            BookingAction::BookingsFailed { seq, error } => {
                if state.seq.accepts(seq, "booking") {
                    Self::fail(state, error);
                }
                smallvec![Effect::None]
            },

            BookingAction::BookingCancelled { booking_id, booking } => {
                tracing::info!(%booking_id, "Booking cancelled");
                match booking {
                    Some(updated) if updated.id == booking_id => {
                        collection::replace(&mut state.bookings, updated, |b| b.id.as_str());
                    },
                    _ => {
                        if let Some(local) = state.bookings.iter_mut().find(|b| b.id == booking_id) {
                            local.status = BookingStatus::Cancelled;
                        }
                    },
                }
                state.status = RequestStatus::Succeeded;
                smallvec![Effect::None]
            },

            BookingAction::BookEventFailed { error }
            | BookingAction::CancelBookingFailed { error } => {
                Self::fail(state, error);
                smallvec![Effect::None]
            },
        }
    }
}
