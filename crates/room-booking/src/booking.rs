//! Bookings and the half-open time ranges they occupy.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::slots::{ClockTime, DAY_END, DAY_START};

/// A half-open interval `[start, end)` within one day.
///
/// Back-to-back ranges (one ends exactly where the next starts) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

/// The bookable window of a day, 08:00 to 18:00.
pub const BOOKABLE_DAY: TimeRange = TimeRange::unchecked(DAY_START, DAY_END);

impl TimeRange {
    /// Build a range, rejecting empty or inverted ones.
    pub fn new(start: ClockTime, end: ClockTime) -> Result<Self> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(BookingError::InvalidTimeRange { start, end })
        }
    }

    /// Build a range that can be booked: non-empty, inside [`BOOKABLE_DAY`] and
    /// with both ends on the half-hour grid.
    ///
    /// # Errors
    /// `InvalidTimeRange` if `start >= end`, `OutsideBookableHours` otherwise.
    pub fn bookable(start: ClockTime, end: ClockTime) -> Result<Self> {
        let range = Self::new(start, end)?;
        if BOOKABLE_DAY.contains(&range) && start.is_on_grid() && end.is_on_grid() {
            Ok(range)
        } else {
            Err(BookingError::OutsideBookableHours { start, end })
        }
    }

    /// Build a range without checking `start < end`.
    pub const fn unchecked(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(start.parse()?, end.parse()?)
    }

    /// `self.start < other.end && other.start < self.end`.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &TimeRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        let end = i64::from(self.end.minutes_since_midnight());
        end - i64::from(self.start.minutes_since_midnight())
    }
}

/// A committed reservation of one room for one range on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub room_id: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub full_name: String,
    pub email: String,
    pub people_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_group_id: Option<String>,
}

impl Booking {
    pub fn range(&self) -> TimeRange {
        TimeRange::unchecked(self.start_time, self.end_time)
    }

    pub fn is_for(&self, room_id: &str, date: NaiveDate) -> bool {
        self.room_id == room_id && self.date == date
    }
}

/// Everything needed to create a booking except its id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub room_id: String,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub full_name: String,
    pub email: String,
    pub people_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_group_id: Option<String>,
}

impl NewBooking {
    pub fn range(&self) -> TimeRange {
        TimeRange::unchecked(self.start_time, self.end_time)
    }

    pub(crate) fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            room_id: self.room_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            full_name: self.full_name,
            email: self.email,
            people_count: self.people_count,
            recurrence_group_id: self.recurrence_group_id,
        }
    }
}

/// The shared fields of a recurring request: a booking without id, date or group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringBase {
    pub room_id: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub full_name: String,
    pub email: String,
    pub people_count: u32,
}

impl RecurringBase {
    pub fn range(&self) -> TimeRange {
        TimeRange::unchecked(self.start_time, self.end_time)
    }

    /// The concrete booking for one expanded date of a recurrence group.
    pub fn on(&self, date: NaiveDate, group_id: &str) -> NewBooking {
        NewBooking {
            room_id: self.room_id.clone(),
            date,
            start_time: self.start_time,
            end_time: self.end_time,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            people_count: self.people_count,
            recurrence_group_id: Some(group_id.to_string()),
        }
    }
}
