//! Query parameters for `GET /events`

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Event status filter offered by the events page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStatusFilter {
    /// Not started yet
    Upcoming,
    /// Happening now
    Ongoing,
    /// Already over
    Completed,
}

impl EventStatusFilter {
    /// All filters in display order
    pub const ALL: [Self; 3] = [Self::Upcoming, Self::Ongoing, Self::Completed];

    /// Wire value sent as `status=`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "UPCOMING",
            Self::Ongoing => "ONGOING",
            Self::Completed => "COMPLETED",
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "Upcoming",
            Self::Ongoing => "Ongoing",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for EventStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "UPCOMING" => Ok(Self::Upcoming),
            "ONGOING" => Ok(Self::Ongoing),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(format!("unknown event status filter: {other}")),
        }
    }
}

/// Filters and page selection for the event list
///
/// ```
/// use eventease_client::EventQuery;
///
/// let query = EventQuery::new().search("music").category("cat1");
/// assert_eq!(query.to_query_string(), "page=1&search=music&category=cat1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Page to fetch (1-based)
    pub page: u32,
    /// Free-text search
    pub search: Option<String>,
    /// Category id
    pub category: Option<String>,
    /// Only online events
    pub is_online: bool,
    /// Status filter
    pub status: Option<EventStatusFilter>,
    /// Earliest event date
    pub start_date: Option<NaiveDate>,
    /// Latest event date
    pub end_date: Option<NaiveDate>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: None,
            category: None,
            is_online: false,
            status: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl EventQuery {
    /// First page, no filters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a page
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Filter by free text
    #[must_use]
    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Filter by category id
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Only online events
    #[must_use]
    pub fn online_only(mut self) -> Self {
        self.is_online = true;
        self
    }

    /// Filter by status
    #[must_use]
    pub fn status(mut self, status: EventStatusFilter) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to events between two dates (inclusive)
    #[must_use]
    pub fn between(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Encode as a URL query string, without the leading `?`
    ///
    /// `page` is always present; every other parameter appears only when
    /// set, in the order `search`, `category`, `isOnline`, `status`,
    /// `startDate`, `endDate`. Empty strings count as unset.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs = vec![("page", self.page.max(1).to_string())];

        let mut push_text = |key: &'static str, value: Option<&String>| {
            if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
                pairs.push((key, value.clone()));
            }
        };
        push_text("search", self.search.as_ref());
        push_text("category", self.category.as_ref());

        if self.is_online {
            pairs.push(("isOnline", "true".to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(start) = self.start_date {
            pairs.push(("startDate", start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            pairs.push(("endDate", end.format("%Y-%m-%d").to_string()));
        }

        pairs
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
