//! Free/busy views of a single room-day on the half-hour grid.
//!
//! Sorts bookings by start time, merges overlapping busy periods, then computes
//! the gaps between merged periods within the bookable window. Also derives the
//! per-block status a slot picker shows.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

pub use crate::booking::BOOKABLE_DAY;
use crate::booking::{Booking, TimeRange};
use crate::error::{BookingError, Result};
use crate::slots::{selectable_blocks, ClockTime, TIME_SLOTS};

/// A free gap between bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FreeRange {
    pub start: ClockTime,
    pub end: ClockTime,
    pub duration_minutes: i64,
}

impl FreeRange {
    fn between(start: ClockTime, end: ClockTime) -> Self {
        Self {
            start,
            end,
            duration_minutes: TimeRange::unchecked(start, end).duration_minutes(),
        }
    }
}

/// State of one selectable half-hour block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Free,
    Booked,
    /// Already started or elapsed on the current day.
    Past,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub start: ClockTime,
    pub end: ClockTime,
    pub state: SlotState,
}

impl SlotStatus {
    pub fn is_free(&self) -> bool {
        self.state == SlotState::Free
    }
}

/// Merge overlapping or adjacent busy periods, clipped to the given window.
///
/// Returns a sorted, non-overlapping list of ranges.
pub(crate) fn merge_busy_periods(
    ranges: impl IntoIterator<Item = TimeRange>,
    window: TimeRange,
) -> Vec<TimeRange> {
    let mut intervals: Vec<TimeRange> = ranges
        .into_iter()
        .filter(|r| r.overlaps(&window))
        .map(|r| TimeRange::unchecked(r.start.max(window.start), r.end.min(window.end)))
        .collect();

    intervals.sort_by_key(|r| (r.start, r.end));

    let mut merged: Vec<TimeRange> = Vec::new();
    for range in intervals {
        if let Some(last) = merged.last_mut() {
            if range.start <= last.end {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        merged.push(range);
    }

    merged
}

/// Free gaps within `window` given one room-day's bookings.
///
/// Bookings for other rooms or dates must already be filtered out.
pub fn free_ranges(bookings: &[Booking], window: TimeRange) -> Vec<FreeRange> {
    let merged = merge_busy_periods(bookings.iter().map(Booking::range), window);

    let mut free = Vec::new();
    let mut cursor = window.start;

    for busy in &merged {
        if cursor < busy.start {
            free.push(FreeRange::between(cursor, busy.start));
        }
        cursor = cursor.max(busy.end);
    }

    if cursor < window.end {
        free.push(FreeRange::between(cursor, window.end));
    }

    free
}

/// Status of each of the 20 selectable blocks for one room-day.
///
/// When `now` falls on `date`, blocks whose start is at or before the current
/// hour:minute are [`SlotState::Past`].
pub fn slot_statuses(
    bookings: &[Booking],
    date: NaiveDate,
    now: Option<NaiveDateTime>,
) -> Vec<SlotStatus> {
    let cutoff = now
        .filter(|n| n.date() == date)
        .and_then(|n| ClockTime::from_hm(n.hour() as u16, n.minute() as u16));

    selectable_blocks()
        .map(|(start, end)| {
            let block = TimeRange::unchecked(start, end);
            let state = if cutoff.is_some_and(|c| start <= c) {
                SlotState::Past
            } else if bookings.iter().any(|b| block.overlaps(&b.range())) {
                SlotState::Booked
            } else {
                SlotState::Free
            };
            SlotStatus { start, end, state }
        })
        .collect()
}

/// Validate a picker selection from block `start_idx` to `end_idx` inclusive.
///
/// Every block in between must be free. The resulting range runs from the start
/// block's start mark to grid mark `end_idx`, so the end index names a mark
/// rather than the block after it.
pub fn selection_range(
    statuses: &[SlotStatus],
    start_idx: usize,
    end_idx: usize,
) -> Result<TimeRange> {
    if end_idx <= start_idx || end_idx >= statuses.len() {
        return Err(BookingError::InvalidTime(format!(
            "selection {}..={} is outside the grid or empty",
            start_idx, end_idx
        )));
    }
    if !statuses[start_idx..=end_idx].iter().all(SlotStatus::is_free) {
        return Err(BookingError::SlotUnavailable);
    }
    TimeRange::new(TIME_SLOTS[start_idx], TIME_SLOTS[end_idx])
}
