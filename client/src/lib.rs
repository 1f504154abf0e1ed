//! # EventEase Client
//!
//! REST client and wire types for the EventEase backend.
//!
//! ## Overview
//!
//! - [`EventEaseApi`]: the object-safe trait reducers call through
//! - [`ApiClient`]: the `reqwest` implementation, with a cookie store so the
//!   session cookie issued at login rides along on every later call
//! - [`mock::MockApi`]: a scriptable in-memory implementation for tests
//! - [`types`]: domain entities, tolerant of the backend's envelope and
//!   reference variations
//! - [`forms`]: multipart / JSON request bodies and their validation
//!
//! ## Example
//!
//! ```ignore
//! use eventease_client::{ApiClient, ClientConfig, EventEaseApi, EventQuery};
//!
//! let client = ApiClient::new(&ClientConfig::default())?;
//! let page = client.list_events(EventQuery::new().search("music")).await?;
//! println!("{} events", page.events.len());
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod forms;
pub mod mock;
pub mod query;
pub mod types;

pub use api::{ApiFuture, EventEaseApi, Route};
pub use client::{ApiClient, ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use forms::{
    BookingRequest, Credentials, EventForm, FormError, ImageUpload, NewCategory, Registration,
};
pub use mock::MockApi;
pub use query::{EventQuery, EventStatusFilter};
pub use types::{
    AuthUser, Booking, BookingPage, BookingStatus, Category, CategoryRef, Event, EventPage,
    EventRef, Pagination, Role, UserRef,
};
