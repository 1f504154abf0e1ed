//! View-model selectors over [`AppState`](crate::store::AppState).
//!
//! Everything here is a pure function of slice state (plus the clock for
//! cancellation). Presentation code reads these instead of inspecting the
//! slices directly, so role checks and paging math live in one place.

use crate::auth::AuthState;
use chrono::{DateTime, Utc};
use eventease_client::{Booking, Pagination, Role};

/// Rows per page in the locally paged "My Bookings" table
pub const LOCAL_PAGE_SIZE: usize = 5;

/// Message shown when an anonymous visitor tries to book
pub const LOGIN_TO_BOOK: &str = "Please login to book this event.";

// ========== Session ==========

/// Who is looking at the page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthView {
    /// A user is signed in
    pub is_authenticated: bool,
    /// The user is an administrator
    pub is_admin: bool,
    /// The user is a regular user
    pub is_user: bool,
}

impl AuthView {
    /// Derive from the auth slice
    #[must_use]
    pub fn from_state(auth: &AuthState) -> Self {
        let role = auth.user.as_ref().map(|user| user.role);
        Self {
            is_authenticated: role.is_some(),
            is_admin: role == Some(Role::Admin),
            is_user: role == Some(Role::User),
        }
    }
}

/// Entries of the top navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    /// Landing page
    Home,
    /// Event list
    Events,
    /// The user's bookings (users only)
    MyBookings,
    /// Admin area (admins only)
    AdminDashboard,
    /// Sign in (anonymous only)
    Login,
    /// Create an account (anonymous only)
    Signup,
    /// Sign out (signed in only)
    Logout,
}

impl NavLink {
    /// Text of the link
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Events => "Events",
            Self::MyBookings => "My Bookings",
            Self::AdminDashboard => "Admin Dashboard",
            Self::Login => "Login",
            Self::Signup => "Signup",
            Self::Logout => "Logout",
        }
    }

    /// Route the link points at; `None` for [`NavLink::Logout`], which is an action
    #[must_use]
    pub const fn href(self) -> Option<&'static str> {
        match self {
            Self::Home => Some("/"),
            Self::Events => Some("/events"),
            Self::MyBookings => Some("/bookings"),
            Self::AdminDashboard => Some("/admin"),
            Self::Login => Some("/login"),
            Self::Signup => Some("/register"),
            Self::Logout => None,
        }
    }
}

/// Navigation entries for the current session, in display order
#[must_use]
pub fn nav_links(auth: &AuthState) -> Vec<NavLink> {
    let view = AuthView::from_state(auth);
    let mut links = vec![NavLink::Home, NavLink::Events];
    if view.is_user {
        links.push(NavLink::MyBookings);
    }
    if view.is_admin {
        links.push(NavLink::AdminDashboard);
    }
    if view.is_authenticated {
        links.push(NavLink::Logout);
    } else {
        links.extend([NavLink::Login, NavLink::Signup]);
    }
    links
}

/// What a page requires of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Any signed-in user
    Authenticated,
    /// An administrator
    Admin,
}

/// Outcome of checking a page's [`Access`] requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGuard {
    /// Render the page
    Allowed,
    /// Nobody is signed in
    Unauthenticated,
    /// Signed in with the wrong role; render "Unauthorized"
    Unauthorized,
}

impl AccessGuard {
    /// Check `access` against the auth slice
    #[must_use]
    pub fn check(auth: &AuthState, access: Access) -> Self {
        let view = AuthView::from_state(auth);
        match access {
            _ if !view.is_authenticated => Self::Unauthenticated,
            Access::Admin if !view.is_admin => Self::Unauthorized,
            Access::Authenticated | Access::Admin => Self::Allowed,
        }
    }

    /// Whether the page may render
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

// ========== Booking affordances ==========

/// Gate the "Book now" button; only signed-in visitors may book
///
/// # Errors
///
/// Returns [`LOGIN_TO_BOOK`] when nobody is signed in.
pub fn can_book(auth: &AuthState) -> Result<(), &'static str> {
    if auth.is_authenticated() {
        Ok(())
    } else {
        Err(LOGIN_TO_BOOK)
    }
}

/// What the action column of a booking row shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelAffordance {
    /// A "Cancel" button
    Cancel,
    /// "Not allowed"
    NotAllowed,
}

/// Cancel affordance for one booking at `now`
#[must_use]
pub fn cancel_affordance(booking: &Booking, now: DateTime<Utc>) -> CancelAffordance {
    if booking.is_cancellable(now) {
        CancelAffordance::Cancel
    } else {
        CancelAffordance::NotAllowed
    }
}

// ========== Paging ==========

/// Previous/next controls under a paginated table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    /// Current page (1-based)
    pub page: u32,
    /// Number of pages; zero for an empty result
    pub total_pages: u32,
}

impl PageControls {
    /// Controls for `page` of `total_pages`, with `page` clamped into range
    #[must_use]
    pub fn new(page: u32, total_pages: u32) -> Self {
        Self {
            page: page.clamp(1, total_pages.max(1)),
            total_pages,
        }
    }

    /// Controls for server-side pagination; absent metadata means a single page
    #[must_use]
    pub fn from_pagination(pagination: Option<&Pagination>) -> Self {
        pagination.map_or_else(|| Self::new(1, 1), |meta| Self::new(meta.page, meta.pages))
    }

    /// "Previous" is enabled
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// "Next" is enabled
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page "Previous" navigates to
    #[must_use]
    pub const fn previous(&self) -> u32 {
        if self.has_previous() {
            self.page - 1
        } else {
            self.page
        }
    }

    /// Page "Next" navigates to
    #[must_use]
    pub const fn next(&self) -> u32 {
        if self.has_next() {
            self.page + 1
        } else {
            self.page
        }
    }

    /// Controls are only rendered when there is more than one page
    #[must_use]
    pub const fn visible(&self) -> bool {
        self.total_pages > 1
    }
}

/// Slice out `page` of `items` at [`LOCAL_PAGE_SIZE`] rows per page
///
/// ```
/// use eventease::view::paginate_local;
///
/// let rows: Vec<u32> = (1..=12).collect();
/// let (page, controls) = paginate_local(&rows, 3);
/// assert_eq!(page, &[11, 12]);
/// assert!(!controls.has_next());
/// ```
#[must_use]
pub fn paginate_local<T>(items: &[T], page: u32) -> (&[T], PageControls) {
    let total_pages = u32::try_from(items.len().div_ceil(LOCAL_PAGE_SIZE)).unwrap_or(u32::MAX);
    let controls = PageControls::new(page, total_pages);
    let start = usize::try_from(controls.page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(LOCAL_PAGE_SIZE)
        .min(items.len());
    let end = start.saturating_add(LOCAL_PAGE_SIZE).min(items.len());
    (&items[start..end], controls)
}
