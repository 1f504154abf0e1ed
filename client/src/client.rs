//! EventEase REST client implementation

use crate::api::{ApiFuture, EventEaseApi, Route};
use crate::error::ApiError;
use crate::forms::{BookingRequest, Credentials, EventForm, NewCategory, Registration};
use crate::query::EventQuery;
use crate::types::{
    AuthUser, Booking, BookingListResponse, BookingPage, CancelResponse, Category, ErrorBody,
    Event, EventListResponse, EventPage, MaybeWrapped,
};
use metrics::{counter, histogram};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};

/// Base URL used when none is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Connection settings for [`ApiClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:5000/api`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Optional `User-Agent` header
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

/// HTTP client for the EventEase backend
///
/// Keeps a cookie store, so the session cookie set by `/auth/login` is sent
/// with every later request. No retries and no caching: each call maps to
/// exactly one HTTP request.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from `config`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the base URL does not parse and
    /// [`ApiError::Request`] if the TLS backend cannot be initialised.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;

        let mut builder = Client::builder().cookie_store(true).timeout(config.timeout);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    /// The normalised base URL (no trailing slash)
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request, turning non-success statuses into [`ApiError::Server`]
    #[tracing::instrument(skip(self, request), fields(route = %route))]
    async fn send(&self, route: Route, request: RequestBuilder) -> Result<Response, ApiError> {
        counter!("api.requests.total", "route" => route.as_str()).increment(1);

        let start = Instant::now();
        let result = request.send().await;
        histogram!("api.request.duration_seconds", "route" => route.as_str())
            .record(start.elapsed().as_secs_f64());

        let response = match result {
            Ok(response) => response,
            Err(error) => {
                counter!("api.requests.failed", "route" => route.as_str()).increment(1);
                tracing::warn!(%error, "Request failed");
                return Err(ApiError::Request(error.to_string()));
            },
        };

        let status = response.status();
        if status.is_success() {
            tracing::debug!(status = status.as_u16(), "Request succeeded");
            return Ok(response);
        }

        counter!("api.requests.failed", "route" => route.as_str()).increment(1);
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|body| body.message);
        tracing::warn!(
            status = status.as_u16(),
            message = message.as_deref().unwrap_or_default(),
            "API returned an error"
        );

        Err(ApiError::Server {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, route: Route, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(route, request).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn execute(&self, route: Route, request: RequestBuilder) -> Result<(), ApiError> {
        self.send(route, request).await.map(|_| ())
    }
}

fn encode(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

impl EventEaseApi for ApiClient {
    fn current_user(&self) -> ApiFuture<'_, AuthUser> {
        Box::pin(async move {
            let request = self.client.get(self.url("/auth/me"));
            self.fetch::<MaybeWrapped<AuthUser>>(Route::CurrentUser, request)
                .await
                .map(MaybeWrapped::into_inner)
        })
    }

    fn login(&self, credentials: Credentials) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.client.post(self.url("/auth/login")).json(&credentials);
            self.execute(Route::Login, request).await
        })
    }

    fn register(&self, registration: Registration) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.client.post(self.url("/auth/register")).json(&registration);
            self.execute(Route::Register, request).await
        })
    }

    fn logout(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.client.post(self.url("/auth/logout"));
            self.execute(Route::Logout, request).await
        })
    }

    fn list_categories(&self) -> ApiFuture<'_, Vec<Category>> {
        Box::pin(async move {
            let request = self.client.get(self.url("/categories"));
            self.fetch::<MaybeWrapped<Vec<Category>>>(Route::ListCategories, request)
                .await
                .map(MaybeWrapped::into_inner)
        })
    }

    fn create_category(&self, category: NewCategory) -> ApiFuture<'_, Category> {
        Box::pin(async move {
            let form = category.to_multipart()?;
            let request = self.client.post(self.url("/categories")).multipart(form);
            self.fetch::<MaybeWrapped<Category>>(Route::CreateCategory, request)
                .await
                .map(MaybeWrapped::into_inner)
        })
    }

    fn delete_category(&self, id: String) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.client.delete(self.url(&format!("/categories/{}", encode(&id))));
            self.execute(Route::DeleteCategory, request).await
        })
    }

    fn list_events(&self, query: EventQuery) -> ApiFuture<'_, EventPage> {
        Box::pin(async move {
            let url = self.url(&format!("/events?{}", query.to_query_string()));
            let request = self.client.get(url);
            self.fetch::<EventListResponse>(Route::ListEvents, request)
                .await
                .map(EventPage::from)
        })
    }

    fn get_event(&self, id: String) -> ApiFuture<'_, Event> {
        Box::pin(async move {
            let request = self.client.get(self.url(&format!("/events/{}", encode(&id))));
            self.fetch::<MaybeWrapped<Event>>(Route::GetEvent, request)
                .await
                .map(MaybeWrapped::into_inner)
        })
    }

    fn create_event(&self, form: EventForm) -> ApiFuture<'_, Event> {
        Box::pin(async move {
            let multipart = form.to_multipart()?;
            let request = self.client.post(self.url("/events")).multipart(multipart);
            self.fetch::<MaybeWrapped<Event>>(Route::CreateEvent, request)
                .await
                .map(MaybeWrapped::into_inner)
        })
    }

    fn update_event(&self, id: String, form: EventForm) -> ApiFuture<'_, Event> {
        Box::pin(async move {
            let multipart = form.to_multipart()?;
            let request = self
                .client
                .put(self.url(&format!("/events/{}", encode(&id))))
                .multipart(multipart);
            self.fetch::<MaybeWrapped<Event>>(Route::UpdateEvent, request)
                .await
                .map(MaybeWrapped::into_inner)
        })
    }

    fn delete_event(&self, id: String) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let request = self.client.delete(self.url(&format!("/events/{}", encode(&id))));
            self.execute(Route::DeleteEvent, request).await
        })
    }

    fn book_event(&self, request: BookingRequest) -> ApiFuture<'_, Booking> {
        Box::pin(async move {
            let http = self.client.post(self.url("/bookings")).json(&request);
            self.fetch::<MaybeWrapped<Booking>>(Route::BookEvent, http)
                .await
                .map(MaybeWrapped::into_inner)
        })
    }

    fn my_bookings(&self) -> ApiFuture<'_, BookingPage> {
        Box::pin(async move {
            let request = self.client.get(self.url("/bookings/me"));
            self.fetch::<BookingListResponse>(Route::MyBookings, request)
                .await
                .map(BookingPage::from)
        })
    }

    fn all_bookings(&self, page: u32) -> ApiFuture<'_, BookingPage> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.url(&format!("/bookings/admin?page={}", page.max(1))));
            self.fetch::<BookingListResponse>(Route::AllBookings, request)
                .await
                .map(BookingPage::from)
        })
    }

    fn bookings_by_event(&self, event_id: String) -> ApiFuture<'_, Vec<Booking>> {
        Box::pin(async move {
            let url = self.url(&format!("/bookings/admin/event/{}", encode(&event_id)));
            let request = self.client.get(url);
            self.fetch::<BookingListResponse>(Route::BookingsByEvent, request)
                .await
                .map(|response| BookingPage::from(response).bookings)
        })
    }

    fn cancel_booking(&self, booking_id: String) -> ApiFuture<'_, Option<Booking>> {
        Box::pin(async move {
            let url = self.url(&format!("/bookings/{}/cancel", encode(&booking_id)));
            let response = self.send(Route::CancelBooking, self.client.patch(url)).await?;
            let body = response.text().await.unwrap_or_default();
            if body.trim().is_empty() {
                return Ok(None);
            }
            Ok(serde_json::from_str::<CancelResponse>(&body)
                .ok()
                .and_then(CancelResponse::into_booking))
        })
    }
}
