//! Wire and domain types shared by the client and the state slices.
//!
//! The backend uses MongoDB-style `_id` keys and camelCase fields. Where the
//! backend is inconsistent (populated vs. bare references, wrapped vs. raw
//! entities, two pagination shapes) the types here accept every observed
//! form and normalise it.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user who books events
    User,
    /// Administrator who manages categories and events
    Admin,
}

/// The signed-in user as reported by `/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Account role
    pub role: Role,
}

/// Event category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Category name
    pub name: String,
    /// Thumbnail image
    #[serde(
        rename = "thumbnailUrl",
        alias = "thumbnail",
        alias = "image",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_url: Option<String>,
}

/// An event's category: a bare id or the populated category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    /// Bare category id
    Id(String),
    /// Populated category
    Populated(Category),
}

impl CategoryRef {
    /// Category id regardless of population
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated(category) => &category.id,
        }
    }

    /// Category name when populated
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated(category) => Some(&category.name),
        }
    }
}

/// A bookable event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Human-facing identifier shown in admin tables
    #[serde(default)]
    pub event_id: String,
    /// Title
    pub title: String,
    /// Description
    #[serde(default)]
    pub description: Option<String>,
    /// Venue, or a meeting link for online events
    #[serde(default)]
    pub location: Option<String>,
    /// Start date
    pub date: DateTime<Utc>,
    /// Whether the event happens online
    #[serde(default)]
    pub is_online: bool,
    /// Seat capacity
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Category reference
    #[serde(default)]
    pub category: Option<CategoryRef>,
    /// Creation timestamp
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Event {
    /// Whether `key` names this event by internal id or by `eventId`
    #[must_use]
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || (!self.event_id.is_empty() && self.event_id == key)
    }
}

/// Booking status
///
/// Parsed case-insensitively; values the client does not know are kept
/// verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    /// Seats are held
    Confirmed,
    /// Booking was cancelled
    Cancelled,
    /// Awaiting confirmation
    Pending,
    /// Any other server value
    Other(String),
}

impl BookingStatus {
    /// Parse a wire value
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "CONFIRMED" => Self::Confirmed,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            "PENDING" => Self::Pending,
            _ => Self::Other(value.to_string()),
        }
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Pending => "Pending",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BookingStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::parse(&value))
    }
}

/// The user a booking belongs to, as populated by admin listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingUser {
    /// User id
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Email
    #[serde(default)]
    pub email: String,
}

/// A booking's user: a bare id or the populated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    /// Bare user id
    Id(String),
    /// Populated user
    Populated(BookingUser),
}

impl UserRef {
    /// User id regardless of population
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated(user) => &user.id,
        }
    }
}

/// The event a booking is for, as populated by booking listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingEvent {
    /// Event id
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Event title
    #[serde(default)]
    pub title: String,
    /// Event start date, absent or unparseable dates become `None`
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub date: Option<DateTime<Utc>>,
}

/// A booking's event: a bare id or the populated event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventRef {
    /// Bare event id
    Id(String),
    /// Populated event
    Populated(BookingEvent),
}

impl EventRef {
    /// Event id regardless of population
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Populated(event) => &event.id,
        }
    }

    /// Event date when populated and valid
    #[must_use]
    pub fn date(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Id(_) => None,
            Self::Populated(event) => event.date,
        }
    }

    /// Event title when populated
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Id(_) => None,
            Self::Populated(event) => Some(&event.title),
        }
    }
}

/// A seat reservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Who booked
    pub user: UserRef,
    /// What was booked
    pub event: EventRef,
    /// Number of seats
    pub seats: u32,
    /// Current status
    pub status: BookingStatus,
    /// When the booking was made
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub booked_at: Option<DateTime<Utc>>,
    /// Record creation time, used when `bookedAt` is missing
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Whether the booking can be cancelled at `now`
    ///
    /// Only confirmed bookings for events that start strictly after `now`
    /// qualify. A booking whose event date is unknown cannot be cancelled.
    #[must_use]
    pub fn is_cancellable(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Confirmed
            && self.event.date().is_some_and(|date| date > now)
    }

    /// Date to show in the "Booked On" column
    #[must_use]
    pub fn display_date(&self) -> Option<DateTime<Utc>> {
        self.booked_at.or(self.created_at)
    }
}

/// Pagination metadata of a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-based)
    pub page: u32,
    /// Total number of items across all pages
    pub total: u64,
    /// Number of pages
    #[serde(alias = "totalPages")]
    pub pages: u32,
    /// Page size when the server reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// One page of events
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventPage {
    /// Events on this page
    pub events: Vec<Event>,
    /// Pagination metadata
    pub pagination: Option<Pagination>,
}

/// One page of bookings
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingPage {
    /// Bookings on this page
    pub bookings: Vec<Booking>,
    /// Pagination metadata
    pub pagination: Option<Pagination>,
}

/// Single entity responses come either as `{ data: T }` or as `T`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MaybeWrapped<T> {
    Wrapped { data: T },
    Raw(T),
}

impl<T> MaybeWrapped<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Raw(data) => data,
        }
    }
}

/// `GET /events` response
#[derive(Debug, Deserialize)]
pub(crate) struct EventListResponse {
    pub(crate) data: Vec<Event>,
    #[serde(default)]
    pub(crate) pagination: Option<Pagination>,
}

impl From<EventListResponse> for EventPage {
    fn from(response: EventListResponse) -> Self {
        Self {
            events: response.data,
            pagination: response.pagination,
        }
    }
}

/// Booking list responses: the paged shape or a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum BookingListResponse {
    #[serde(rename_all = "camelCase")]
    Paged {
        bookings: Vec<Booking>,
        total: u64,
        page: u32,
        total_pages: u32,
    },
    Wrapped {
        data: Vec<Booking>,
    },
    Bare(Vec<Booking>),
}

impl From<BookingListResponse> for BookingPage {
    fn from(response: BookingListResponse) -> Self {
        match response {
            BookingListResponse::Paged {
                bookings,
                total,
                page,
                total_pages,
            } => Self {
                bookings,
                pagination: Some(Pagination {
                    page,
                    total,
                    pages: total_pages,
                    limit: None,
                }),
            },
            BookingListResponse::Wrapped { data: bookings } | BookingListResponse::Bare(bookings) => {
                Self {
                    bookings,
                    pagination: None,
                }
            },
        }
    }
}

/// `PATCH /bookings/:id/cancel` response: the updated booking under one of
/// several keys, or something else entirely
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum CancelResponse {
    Keyed { booking: Booking },
    Wrapped { data: Booking },
    Raw(Booking),
    Other(serde_json::Value),
}

impl CancelResponse {
    pub(crate) fn into_booking(self) -> Option<Booking> {
        match self {
            Self::Keyed { booking } | Self::Wrapped { data: booking } | Self::Raw(booking) => {
                Some(booking)
            },
            Self::Other(_) => None,
        }
    }
}

/// Error body `{ message }`
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub(crate) message: Option<String>,
}

/// Parse a timestamp the way the backend and HTML date inputs emit them
///
/// Accepts RFC 3339 and timezone-less `YYYY-MM-DDTHH:MM[:SS]` (read as UTC).
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_timestamp))
}
