//! Detect bookings that overlap a requested range.
//!
//! Ranges are half-open, so a booking that ends exactly when the request starts
//! (or starts exactly when it ends) is NOT a conflict.

use chrono::NaiveDate;

use crate::booking::{Booking, TimeRange};

/// An existing booking that overlaps a requested range.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict<'a> {
    pub booking: &'a Booking,
    pub overlap_minutes: i64,
}

/// Find every booking for `(room_id, date)` that overlaps `range`.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts<'a>(
    bookings: &'a [Booking],
    room_id: &str,
    date: NaiveDate,
    range: TimeRange,
) -> Vec<Conflict<'a>> {
    bookings
        .iter()
        .filter(|b| b.is_for(room_id, date))
        .filter(|b| range.overlaps(&b.range()))
        .map(|b| {
            let existing = b.range();
            let overlap = TimeRange::unchecked(
                range.start.max(existing.start),
                range.end.min(existing.end),
            );
            Conflict {
                booking: b,
                overlap_minutes: overlap.duration_minutes(),
            }
        })
        .collect()
}

/// True when no booking for `(room_id, date)` overlaps `range`.
///
/// Performs no validation of `range`: an empty or inverted range overlaps
/// nothing and is reported free.
pub fn is_range_free(
    bookings: &[Booking],
    room_id: &str,
    date: NaiveDate,
    range: TimeRange,
) -> bool {
    !bookings
        .iter()
        .any(|b| b.is_for(room_id, date) && range.overlaps(&b.range()))
}
