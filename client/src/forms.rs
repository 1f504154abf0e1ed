//! Form payloads for the multipart endpoints and their validation

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Client-side validation failure, reported before any request is sent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// A required text field is blank
    #[error("{0} is required")]
    Required(&'static str),

    /// Capacity must allow at least one seat
    #[error("Capacity must be greater than zero")]
    InvalidCapacity,

    /// Seat count must be at least one
    #[error("At least one seat must be booked")]
    InvalidSeats,

    /// The image upload is missing
    #[error("Thumbnail image is required")]
    MissingImage,
}

/// An image file to upload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// File name reported to the server
    pub file_name: String,
    /// MIME type, e.g. `image/jpeg`
    pub content_type: String,
    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Create an upload
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    fn to_part(&self) -> Result<Part, ApiError> {
        Ok(Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.content_type)?)
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Fields of the create / update event form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventForm {
    /// Title
    pub title: String,
    /// Description
    pub description: String,
    /// Venue or meeting link
    pub location: String,
    /// Start date
    pub date: DateTime<Utc>,
    /// Online event
    pub is_online: bool,
    /// Seat capacity
    pub capacity: u32,
    /// Category id
    pub category: String,
    /// Thumbnail; required on create, optional on update
    pub image: Option<ImageUpload>,
}

impl EventForm {
    /// Check the form before submitting
    ///
    /// # Errors
    ///
    /// Returns the first [`FormError`] found, checking fields in form order.
    pub fn validate(&self, require_image: bool) -> Result<(), FormError> {
        let required = [
            ("Title", &self.title),
            ("Description", &self.description),
            ("Location", &self.location),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(FormError::Required(*field));
        }
        if self.capacity == 0 {
            return Err(FormError::InvalidCapacity);
        }
        if self.category.trim().is_empty() {
            return Err(FormError::Required("Category"));
        }
        if require_image && self.image.is_none() {
            return Err(FormError::MissingImage);
        }
        Ok(())
    }

    /// Encode as `multipart/form-data`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the image MIME type is invalid.
    pub fn to_multipart(&self) -> Result<Form, ApiError> {
        let form = Form::new()
            .text("title", self.title.clone())
            .text("description", self.description.clone())
            .text("location", self.location.clone())
            .text("date", self.date.to_rfc3339())
            .text("isOnline", self.is_online.to_string())
            .text("capacity", self.capacity.to_string())
            .text("category", self.category.clone());

        match &self.image {
            Some(image) => Ok(form.part("image", image.to_part()?)),
            None => Ok(form),
        }
    }
}

/// Fields of the create category form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// Category name
    pub name: String,
    /// Thumbnail image
    pub image: Option<ImageUpload>,
}

impl NewCategory {
    /// Check the form before submitting
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Required`] for a blank name and
    /// [`FormError::MissingImage`] without an image.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::Required("Name"));
        }
        if self.image.is_none() {
            return Err(FormError::MissingImage);
        }
        Ok(())
    }

    /// Encode as `multipart/form-data`
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Request`] if the image MIME type is invalid.
    pub fn to_multipart(&self) -> Result<Form, ApiError> {
        let form = Form::new().text("name", self.name.clone());
        match &self.image {
            Some(image) => Ok(form.part("image", image.to_part()?)),
            None => Ok(form),
        }
    }
}

/// JSON body of `POST /bookings`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Event to book
    pub event_id: String,
    /// Number of seats
    pub seats: u32,
}

impl BookingRequest {
    /// Check the request before submitting
    ///
    /// # Errors
    ///
    /// Returns [`FormError::InvalidSeats`] for zero seats.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.event_id.trim().is_empty() {
            return Err(FormError::Required("Event"));
        }
        if self.seats == 0 {
            return Err(FormError::InvalidSeats);
        }
        Ok(())
    }
}

/// JSON body of `POST /auth/login`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// JSON body of `POST /auth/register`
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Password
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    fn form() -> EventForm {
        EventForm {
            title: "Jazz Night".to_string(),
            description: "Live quartet".to_string(),
            location: "Blue Room".to_string(),
            date: "2025-06-01T19:00:00Z".parse().unwrap(),
            is_online: false,
            capacity: 80,
            category: "cat1".to_string(),
            image: Some(ImageUpload::new("poster.jpg", "image/jpeg", vec![0xFF, 0xD8])),
        }
    }

    #[test]
    fn complete_event_form_is_valid() {
        assert_eq!(form().validate(true), Ok(()));
    }

    #[test]
    fn event_form_reports_first_problem() {
        let mut missing_title = form();
        missing_title.title = "  ".to_string();
        assert_eq!(missing_title.validate(true), Err(FormError::Required("Title")));

        let mut no_seats = form();
        no_seats.capacity = 0;
        assert_eq!(no_seats.validate(true), Err(FormError::InvalidCapacity));

        let mut no_image = form();
        no_image.image = None;
        assert_eq!(no_image.validate(true), Err(FormError::MissingImage));
        assert_eq!(no_image.validate(false), Ok(()));
    }

    #[test]
    fn category_form_requires_name_and_image() {
        let category = NewCategory {
            name: String::new(),
            image: None,
        };
        assert_eq!(category.validate(), Err(FormError::Required("Name")));
        assert_eq!(
            NewCategory { name: "Tech".into(), image: None }.validate(),
            Err(FormError::MissingImage)
        );
        assert_eq!(FormError::MissingImage.to_string(), "Thumbnail image is required");
    }

    #[test]
    fn booking_request_serialises_camel_case() {
        let request = BookingRequest {
            event_id: "e1".to_string(),
            seats: 2,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"eventId": "e1", "seats": 2})
        );
        assert_eq!(
            BookingRequest { seats: 0, ..request }.validate(),
            Err(FormError::InvalidSeats)
        );
    }

    #[test]
    fn image_debug_hides_bytes() {
        let image = ImageUpload::new("a.png", "image/png", vec![1, 2, 3]);
        assert!(format!("{image:?}").contains("len: 3"));
    }
}
