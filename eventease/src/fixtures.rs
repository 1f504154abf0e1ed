//! Shared builders for unit tests

#![allow(clippy::unwrap_used)] // Test code

use crate::environment::EventEaseEnvironment;
use chrono::{DateTime, Utc};
use eventease_client::types::BookingEvent;
use eventease_client::{
    AuthUser, Booking, BookingStatus, Category, CategoryRef, Event, EventForm, EventRef,
    ImageUpload, MockApi, Role, UserRef,
};
use eventease_testing::test_clock;
use std::sync::Arc;

pub fn environment(api: MockApi) -> EventEaseEnvironment {
    EventEaseEnvironment::new(Arc::new(api), Arc::new(test_clock()))
}

pub fn at(timestamp: &str) -> DateTime<Utc> {
    timestamp.parse().unwrap()
}

pub fn user() -> AuthUser {
    AuthUser {
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role: Role::User,
    }
}

pub fn admin() -> AuthUser {
    AuthUser {
        name: "Grace".to_string(),
        email: "grace@example.com".to_string(),
        role: Role::Admin,
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: id.to_string(),
        name: name.to_string(),
        thumbnail_url: Some(format!("https://cdn.example.com/{id}.jpg")),
    }
}

pub fn event(id: &str, title: &str) -> Event {
    Event {
        id: id.to_string(),
        event_id: format!("EV-{id}"),
        title: title.to_string(),
        description: Some("Live music".to_string()),
        location: Some("Main Hall".to_string()),
        date: at("2025-06-01T19:00:00Z"),
        is_online: false,
        capacity: Some(100),
        category: Some(CategoryRef::Id("cat1".to_string())),
        created_at: None,
        updated_at: None,
    }
}

pub fn booking(id: &str, status: BookingStatus, event_date: &str) -> Booking {
    Booking {
        id: id.to_string(),
        user: UserRef::Id("u1".to_string()),
        event: EventRef::Populated(BookingEvent {
            id: "e1".to_string(),
            title: "Jazz Night".to_string(),
            date: Some(at(event_date)),
        }),
        seats: 2,
        status,
        booked_at: Some(at("2024-12-01T10:00:00Z")),
        created_at: None,
    }
}

pub fn image() -> ImageUpload {
    ImageUpload::new("poster.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

pub fn event_form(title: &str) -> EventForm {
    EventForm {
        title: title.to_string(),
        description: "Live quartet".to_string(),
        location: "Blue Room".to_string(),
        date: at("2025-06-01T19:00:00Z"),
        is_online: false,
        capacity: 80,
        category: "cat1".to_string(),
        image: Some(image()),
    }
}
