//! Error types for room-booking operations.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::slots::ClockTime;

/// A single failed field check from the booking details form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    /// The requested range overlaps an existing booking for that room and date.
    #[error("This time slot is no longer available. Please choose another time.")]
    SlotUnavailable,

    #[error("This room can hold a maximum of {max} people.")]
    CapacityExceeded { max: u32 },

    #[error("Unknown room: {0}")]
    UnknownRoom(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time range: {start} must be before {end}")]
    InvalidTimeRange { start: ClockTime, end: ClockTime },

    /// Bookings start and end on the half-hour grid between 08:00 and 18:00.
    #[error("Bookings must fit 08:00-18:00 in half-hour steps, got {start}-{end}")]
    OutsideBookableHours { start: ClockTime, end: ClockTime },

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Invalid booking details: {}", join_fields(.0))]
    InvalidDetails(Vec<FieldError>),

    /// A preloaded booking overlaps one loaded before it.
    #[error("Booking {0} overlaps an earlier booking for the same room and date")]
    OverlappingBooking(String),

    /// Every date of a recurring request conflicted.
    #[error("All requested dates are already booked. Please try different times.")]
    AllDatesBooked,
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, BookingError>;
