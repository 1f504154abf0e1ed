//! The `EventEaseApi` trait: every backend call the state layer makes.
//!
//! Reducers only ever see `Arc<dyn EventEaseApi>`, so the HTTP client can be
//! swapped for [`crate::mock::MockApi`] in tests.

use crate::error::ApiError;
use crate::forms::{BookingRequest, Credentials, EventForm, NewCategory, Registration};
use crate::query::EventQuery;
use crate::types::{AuthUser, Booking, BookingPage, Category, Event, EventPage};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by every [`EventEaseApi`] method
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Backend routes, used to label metrics and to script mocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `GET /auth/me`
    CurrentUser,
    /// `POST /auth/login`
    Login,
    /// `POST /auth/register`
    Register,
    /// `POST /auth/logout`
    Logout,
    /// `GET /categories`
    ListCategories,
    /// `POST /categories`
    CreateCategory,
    /// `DELETE /categories/:id`
    DeleteCategory,
    /// `GET /events`
    ListEvents,
    /// `GET /events/:id`
    GetEvent,
    /// `POST /events`
    CreateEvent,
    /// `PUT /events/:id`
    UpdateEvent,
    /// `DELETE /events/:id`
    DeleteEvent,
    /// `POST /bookings`
    BookEvent,
    /// `GET /bookings/me`
    MyBookings,
    /// `GET /bookings/admin`
    AllBookings,
    /// `GET /bookings/admin/event/:id`
    BookingsByEvent,
    /// `PATCH /bookings/:id/cancel`
    CancelBooking,
}

impl Route {
    /// Stable label for metrics and logs
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CurrentUser => "auth.me",
            Self::Login => "auth.login",
            Self::Register => "auth.register",
            Self::Logout => "auth.logout",
            Self::ListCategories => "categories.list",
            Self::CreateCategory => "categories.create",
            Self::DeleteCategory => "categories.delete",
            Self::ListEvents => "events.list",
            Self::GetEvent => "events.get",
            Self::CreateEvent => "events.create",
            Self::UpdateEvent => "events.update",
            Self::DeleteEvent => "events.delete",
            Self::BookEvent => "bookings.create",
            Self::MyBookings => "bookings.mine",
            Self::AllBookings => "bookings.admin",
            Self::BookingsByEvent => "bookings.by_event",
            Self::CancelBooking => "bookings.cancel",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every call the state layer makes against the EventEase backend
///
/// Methods return boxed futures so the trait stays object-safe.
///
/// # Example
///
/// ```ignore
/// let api: Arc<dyn EventEaseApi> = Arc::new(ApiClient::new(&ClientConfig::default())?);
/// let categories = api.list_categories().await?;
/// ```
pub trait EventEaseApi: Send + Sync {
    /// `GET /auth/me`: the user owning the session cookie
    fn current_user(&self) -> ApiFuture<'_, AuthUser>;

    /// `POST /auth/login`: establishes the session cookie
    fn login(&self, credentials: Credentials) -> ApiFuture<'_, ()>;

    /// `POST /auth/register`: creates the account and signs it in
    fn register(&self, registration: Registration) -> ApiFuture<'_, ()>;

    /// `POST /auth/logout`: ends the session
    fn logout(&self) -> ApiFuture<'_, ()>;

    /// `GET /categories`
    fn list_categories(&self) -> ApiFuture<'_, Vec<Category>>;

    /// `POST /categories` (multipart)
    fn create_category(&self, category: NewCategory) -> ApiFuture<'_, Category>;

    /// `DELETE /categories/:id`
    fn delete_category(&self, id: String) -> ApiFuture<'_, ()>;

    /// `GET /events?…`
    fn list_events(&self, query: EventQuery) -> ApiFuture<'_, EventPage>;

    /// `GET /events/:id`
    fn get_event(&self, id: String) -> ApiFuture<'_, Event>;

    /// `POST /events` (multipart)
    fn create_event(&self, form: EventForm) -> ApiFuture<'_, Event>;

    /// `PUT /events/:id` (multipart)
    fn update_event(&self, id: String, form: EventForm) -> ApiFuture<'_, Event>;

    /// `DELETE /events/:id`
    fn delete_event(&self, id: String) -> ApiFuture<'_, ()>;

    /// `POST /bookings`
    fn book_event(&self, request: BookingRequest) -> ApiFuture<'_, Booking>;

    /// `GET /bookings/me`
    fn my_bookings(&self) -> ApiFuture<'_, BookingPage>;

    /// `GET /bookings/admin?page=N`
    fn all_bookings(&self, page: u32) -> ApiFuture<'_, BookingPage>;

    /// `GET /bookings/admin/event/:id`
    fn bookings_by_event(&self, event_id: String) -> ApiFuture<'_, Vec<Booking>>;

    /// `PATCH /bookings/:id/cancel`; the updated booking when the server returns one
    fn cancel_booking(&self, booking_id: String) -> ApiFuture<'_, Option<Booking>>;
}
