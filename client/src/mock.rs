//! Scriptable in-memory [`EventEaseApi`] for tests.
//!
//! Replies are queued per [`Route`] and handed out in FIFO order. Every call
//! is recorded with its arguments so tests can assert on what was sent.
//!
//! ```
//! use eventease_client::mock::{MockApi, Reply};
//! use eventease_client::{EventEaseApi, Route};
//!
//! # tokio_test::block_on(async {
//! let api = MockApi::new();
//! api.push(Route::ListCategories, Reply::Categories(vec![]));
//!
//! assert_eq!(api.list_categories().await, Ok(vec![]));
//! assert_eq!(api.calls_to(Route::ListCategories), 1);
//! # });
//! ```

use crate::api::{ApiFuture, EventEaseApi, Route};
use crate::error::ApiError;
use crate::forms::{BookingRequest, Credentials, EventForm, NewCategory, Registration};
use crate::query::EventQuery;
use crate::types::{AuthUser, Booking, BookingPage, Category, Event, EventPage};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A scripted outcome for one call
#[derive(Debug, Clone)]
pub enum Reply {
    /// Success without a payload (login, logout, deletes)
    Unit,
    /// `current_user`
    User(AuthUser),
    /// `list_categories`
    Categories(Vec<Category>),
    /// `create_category`
    Category(Category),
    /// `list_events`
    Events(EventPage),
    /// `get_event`, `create_event`, `update_event`
    Event(Event),
    /// `my_bookings`, `all_bookings`
    Bookings(BookingPage),
    /// `bookings_by_event`
    BookingList(Vec<Booking>),
    /// `book_event`
    Booking(Booking),
    /// `cancel_booking`
    Cancelled(Option<Booking>),
    /// Any call failing with this error
    Failure(ApiError),
}

/// A recorded call with its arguments
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    /// `current_user`
    CurrentUser,
    /// `login`
    Login(Credentials),
    /// `register`
    Register(Registration),
    /// `logout`
    Logout,
    /// `list_categories`
    ListCategories,
    /// `create_category`
    CreateCategory(NewCategory),
    /// `delete_category`
    DeleteCategory(String),
    /// `list_events`
    ListEvents(EventQuery),
    /// `get_event`
    GetEvent(String),
    /// `create_event`
    CreateEvent(EventForm),
    /// `update_event`
    UpdateEvent {
        /// Event id
        id: String,
        /// Submitted form
        form: EventForm,
    },
    /// `delete_event`
    DeleteEvent(String),
    /// `book_event`
    BookEvent(BookingRequest),
    /// `my_bookings`
    MyBookings,
    /// `all_bookings`
    AllBookings(u32),
    /// `bookings_by_event`
    BookingsByEvent(String),
    /// `cancel_booking`
    CancelBooking(String),
}

impl ApiCall {
    /// The route this call hits
    #[must_use]
    pub const fn route(&self) -> Route {
        match self {
            Self::CurrentUser => Route::CurrentUser,
            Self::Login(_) => Route::Login,
            Self::Register(_) => Route::Register,
            Self::Logout => Route::Logout,
            Self::ListCategories => Route::ListCategories,
            Self::CreateCategory(_) => Route::CreateCategory,
            Self::DeleteCategory(_) => Route::DeleteCategory,
            Self::ListEvents(_) => Route::ListEvents,
            Self::GetEvent(_) => Route::GetEvent,
            Self::CreateEvent(_) => Route::CreateEvent,
            Self::UpdateEvent { .. } => Route::UpdateEvent,
            Self::DeleteEvent(_) => Route::DeleteEvent,
            Self::BookEvent(_) => Route::BookEvent,
            Self::MyBookings => Route::MyBookings,
            Self::AllBookings(_) => Route::AllBookings,
            Self::BookingsByEvent(_) => Route::BookingsByEvent,
            Self::CancelBooking(_) => Route::CancelBooking,
        }
    }
}

#[derive(Debug)]
struct Scripted {
    reply: Reply,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct MockInner {
    replies: HashMap<Route, VecDeque<Scripted>>,
    calls: Vec<ApiCall>,
}

/// In-memory API double
///
/// Cloning shares the script and the call log.
#[derive(Debug, Clone, Default)]
pub struct MockApi {
    inner: Arc<Mutex<MockInner>>,
}

impl MockApi {
    /// Create a mock with nothing scripted
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a reply for the next unanswered call to `route`
    pub fn push(&self, route: Route, reply: Reply) -> &Self {
        self.enqueue(route, reply, None)
    }

    /// Queue a reply that resolves only after `delay`
    pub fn push_delayed(&self, route: Route, reply: Reply, delay: Duration) -> &Self {
        self.enqueue(route, reply, Some(delay))
    }

    fn enqueue(&self, route: Route, reply: Reply, delay: Option<Duration>) -> &Self {
        self.lock()
            .replies
            .entry(route)
            .or_default()
            .push_back(Scripted { reply, delay });
        self
    }

    /// Every call made so far, in order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of calls made to `route`
    #[must_use]
    pub fn calls_to(&self, route: Route) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.route() == route)
            .count()
    }

    /// Number of calls made to any route
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn respond<T>(&self, call: ApiCall, extract: fn(Reply) -> Option<T>) -> ApiFuture<'_, T>
    where
        T: Send + 'static,
    {
        let route = call.route();
        let scripted = {
            let mut inner = self.lock();
            inner.calls.push(call);
            inner.replies.get_mut(&route).and_then(VecDeque::pop_front)
        };

        Box::pin(async move {
            let Some(Scripted { reply, delay }) = scripted else {
                return Err(ApiError::Request(format!("no reply scripted for {route}")));
            };
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match reply {
                Reply::Failure(error) => Err(error),
                other => extract(other)
                    .ok_or_else(|| ApiError::Decode(format!("scripted reply does not fit {route}"))),
            }
        })
    }
}

impl EventEaseApi for MockApi {
    fn current_user(&self) -> ApiFuture<'_, AuthUser> {
        self.respond(ApiCall::CurrentUser, |reply| match reply {
            Reply::User(user) => Some(user),
            _ => None,
        })
    }

    fn login(&self, credentials: Credentials) -> ApiFuture<'_, ()> {
        self.respond(ApiCall::Login(credentials), unit)
    }

    fn register(&self, registration: Registration) -> ApiFuture<'_, ()> {
        self.respond(ApiCall::Register(registration), unit)
    }

    fn logout(&self) -> ApiFuture<'_, ()> {
        self.respond(ApiCall::Logout, unit)
    }

    fn list_categories(&self) -> ApiFuture<'_, Vec<Category>> {
        self.respond(ApiCall::ListCategories, |reply| match reply {
            Reply::Categories(categories) => Some(categories),
            _ => None,
        })
    }

    fn create_category(&self, category: NewCategory) -> ApiFuture<'_, Category> {
        self.respond(ApiCall::CreateCategory(category), |reply| match reply {
            Reply::Category(category) => Some(category),
            _ => None,
        })
    }

    fn delete_category(&self, id: String) -> ApiFuture<'_, ()> {
        self.respond(ApiCall::DeleteCategory(id), unit)
    }

    fn list_events(&self, query: EventQuery) -> ApiFuture<'_, EventPage> {
        self.respond(ApiCall::ListEvents(query), |reply| match reply {
            Reply::Events(page) => Some(page),
            _ => None,
        })
    }

    fn get_event(&self, id: String) -> ApiFuture<'_, Event> {
        self.respond(ApiCall::GetEvent(id), event)
    }

    fn create_event(&self, form: EventForm) -> ApiFuture<'_, Event> {
        self.respond(ApiCall::CreateEvent(form), event)
    }

    fn update_event(&self, id: String, form: EventForm) -> ApiFuture<'_, Event> {
        self.respond(ApiCall::UpdateEvent { id, form }, event)
    }

    fn delete_event(&self, id: String) -> ApiFuture<'_, ()> {
        self.respond(ApiCall::DeleteEvent(id), unit)
    }

    fn book_event(&self, request: BookingRequest) -> ApiFuture<'_, Booking> {
        self.respond(ApiCall::BookEvent(request), |reply| match reply {
            Reply::Booking(booking) => Some(booking),
            _ => None,
        })
    }

    fn my_bookings(&self) -> ApiFuture<'_, BookingPage> {
        self.respond(ApiCall::MyBookings, booking_page)
    }

    fn all_bookings(&self, page: u32) -> ApiFuture<'_, BookingPage> {
        self.respond(ApiCall::AllBookings(page), booking_page)
    }

    fn bookings_by_event(&self, event_id: String) -> ApiFuture<'_, Vec<Booking>> {
        self.respond(ApiCall::BookingsByEvent(event_id), |reply| match reply {
            Reply::BookingList(bookings) => Some(bookings),
            _ => None,
        })
    }

    fn cancel_booking(&self, booking_id: String) -> ApiFuture<'_, Option<Booking>> {
        self.respond(ApiCall::CancelBooking(booking_id), |reply| match reply {
            Reply::Cancelled(booking) => Some(booking),
            Reply::Unit => Some(None),
            _ => None,
        })
    }
}

#[allow(clippy::needless_pass_by_value)]
fn unit(reply: Reply) -> Option<()> {
    matches!(reply, Reply::Unit).then_some(())
}

fn event(reply: Reply) -> Option<Event> {
    match reply {
        Reply::Event(event) => Some(event),
        _ => None,
    }
}

fn booking_page(reply: Reply) -> Option<BookingPage> {
    match reply {
        Reply::Bookings(page) => Some(page),
        _ => None,
    }
}
