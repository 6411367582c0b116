//! The guided booking flow's request contract.
//!
//! A [`BookingRequest`] is what the step-by-step form produces once a room, a
//! time range, a frequency and the booker's details are chosen. [`submit`]
//! routes it to a single insert or to recurrence expansion plus a batch insert.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::booking::{Booking, NewBooking, RecurringBase, TimeRange};
use crate::error::{BookingError, FieldError, Result};
use crate::recurrence::{generate_recurring_dates, RecurrenceConfig};
use crate::room::Room;
use crate::store::{BookingStore, RecurringOutcome};

static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Who is booking and for how many people.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub full_name: String,
    pub email: String,
    pub people_count: u32,
}

impl BookingDetails {
    /// Check every field against `room`, reporting all failures at once.
    ///
    /// Name and email are trimmed in the returned value.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidDetails` listing each failed field.
    pub fn validate(&self, room: &Room) -> Result<BookingDetails> {
        let full_name = self.full_name.trim();
        let email = self.email.trim();
        let mut errors = Vec::new();

        if full_name.is_empty() {
            errors.push(field("fullName", "Name is required."));
        }
        if email.is_empty() {
            errors.push(field("email", "Email is required."));
        } else if !is_valid_email(email) {
            errors.push(field("email", "Enter a valid email address."));
        }
        if self.people_count < 1 {
            errors.push(field("peopleCount", "At least 1 person required."));
        } else if self.people_count > room.capacity_max {
            errors.push(FieldError {
                field: "peopleCount",
                message: format!("Maximum {} people for this room.", room.capacity_max),
            });
        }

        if errors.is_empty() {
            Ok(BookingDetails {
                full_name: full_name.to_string(),
                email: email.to_string(),
                people_count: self.people_count,
            })
        } else {
            Err(BookingError::InvalidDetails(errors))
        }
    }
}

fn field(name: &'static str, message: &str) -> FieldError {
    FieldError {
        field: name,
        message: message.to_string(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// A completed guided-form request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub room_id: String,
    pub date: NaiveDate,
    pub range: TimeRange,
    pub details: BookingDetails,
    /// `None` books the single date.
    #[serde(default)]
    pub recurrence: Option<RecurrenceConfig>,
}

/// What a submitted request produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Submission {
    Single(Booking),
    Recurring(RecurringOutcome),
}

/// Validate and commit a guided-form request.
///
/// One-time requests go through [`BookingStore::add_booking`]. Recurring ones
/// are expanded with [`generate_recurring_dates`] and batch-inserted; partial
/// success is a success.
///
/// # Errors
/// - `UnknownRoom` / `InvalidDetails` / `InvalidRecurrence` for bad input.
/// - Any error from the store's insert operations.
/// - `AllDatesBooked` when a recurring request committed nothing.
pub fn submit(store: &BookingStore, request: &BookingRequest) -> Result<Submission> {
    let room = store
        .get_room_by_id(&request.room_id)
        .ok_or_else(|| BookingError::UnknownRoom(request.room_id.clone()))?;
    let details = request.details.validate(room)?;

    match request.recurrence.as_ref().filter(|r| r.is_recurring()) {
        None => {
            let booking = store.add_booking(NewBooking {
                room_id: request.room_id.clone(),
                date: request.date,
                start_time: request.range.start,
                end_time: request.range.end,
                full_name: details.full_name,
                email: details.email,
                people_count: details.people_count,
                recurrence_group_id: None,
            })?;
            Ok(Submission::Single(booking))
        }
        Some(config) => {
            config.validate()?;
            let dates = generate_recurring_dates(request.date, config);
            let base = RecurringBase {
                room_id: request.room_id.clone(),
                start_time: request.range.start,
                end_time: request.range.end,
                full_name: details.full_name,
                email: details.email,
                people_count: details.people_count,
            };
            let outcome = store.add_recurring_bookings(&base, &dates)?;
            if !outcome.success {
                return Err(BookingError::AllDatesBooked);
            }
            Ok(Submission::Recurring(outcome))
        }
    }
}
