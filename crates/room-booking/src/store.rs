//! The authoritative in-memory booking collection.
//!
//! A [`BookingStore`] owns the bookings behind a single lock; rooms are
//! immutable reference data held alongside. Every insert re-checks availability
//! inside the same critical section as the append, so concurrent callers can
//! never double-book a room. The collection only grows: nothing is updated or
//! removed once committed.

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::booking::{Booking, NewBooking, RecurringBase, TimeRange};
use crate::conflict;
use crate::error::{BookingError, Result};
use crate::freebusy::{self, FreeRange, SlotStatus, BOOKABLE_DAY};
use crate::room::{Room, RoomCatalog};
use crate::slots::ClockTime;

/// Result of a recurring batch insert.
///
/// `success` is true iff at least one date was booked. Dates that conflicted are
/// listed but are not errors; booked dates stay committed regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringOutcome {
    pub success: bool,
    pub booked_dates: Vec<NaiveDate>,
    pub conflict_dates: Vec<NaiveDate>,
    pub group_id: String,
}

/// A room that can host a request as asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSuggestion {
    pub room: Room,
    pub date: NaiveDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
}

/// Initial store state, as loaded from a JSON seed file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreSeed {
    /// Falls back to [`RoomCatalog::default_rooms`] when absent.
    #[serde(default)]
    pub rooms: Option<RoomCatalog>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl StoreSeed {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[derive(Debug)]
pub struct BookingStore {
    rooms: RoomCatalog,
    bookings: Mutex<Vec<Booking>>,
}

impl BookingStore {
    /// An empty store over `rooms`.
    pub fn new(rooms: RoomCatalog) -> Self {
        Self {
            rooms,
            bookings: Mutex::new(Vec::new()),
        }
    }

    /// The default catalog plus the two demo bookings on `today`.
    pub fn with_demo_data(today: NaiveDate) -> Self {
        let alice = ("Alice Johnson", "alice@company.com");
        let bob = ("Bob Smith", "bob@company.com");
        Self {
            rooms: RoomCatalog::default_rooms(),
            bookings: Mutex::new(vec![
                demo_booking("b-1", "room-3", today, (9, 0), (10, 0), alice, 4),
                demo_booking("b-2", "room-5", today, (14, 0), (15, 30), bob, 10),
            ]),
        }
    }

    /// Load a seed, holding every booking to the same rules as [`Self::add_booking`].
    ///
    /// Seeded bookings keep their ids and groups and are checked in file order.
    ///
    /// # Errors
    /// - `UnknownRoom`, `InvalidTimeRange`, `OutsideBookableHours` or
    ///   `CapacityExceeded` for a booking that could never have been made.
    /// - `OverlappingBooking` for a booking that overlaps an earlier one.
    pub fn from_seed(seed: StoreSeed) -> Result<Self> {
        let store = Self::new(seed.rooms.unwrap_or_else(RoomCatalog::default_rooms));
        {
            let mut bookings = store.bookings.lock();
            for booking in seed.bookings {
                let range = booking.range();
                store.checked_room(&booking.room_id, range, booking.people_count)?;
                if !conflict::is_range_free(&bookings, &booking.room_id, booking.date, range) {
                    return Err(BookingError::OverlappingBooking(booking.id));
                }
                bookings.push(booking);
            }
            debug!(bookings = bookings.len(), "seed loaded");
        }
        Ok(store)
    }

    pub fn rooms(&self) -> &RoomCatalog {
        &self.rooms
    }

    pub fn list_rooms(&self) -> &[Room] {
        self.rooms.list_rooms()
    }

    pub fn get_room_by_id(&self, id: &str) -> Option<&Room> {
        self.rooms.get_room_by_id(id)
    }

    /// Snapshot of every booking in insertion order.
    pub fn get_bookings(&self) -> Vec<Booking> {
        self.bookings.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.bookings.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.lock().is_empty()
    }

    /// Snapshot of the bookings for one room on one date.
    pub fn get_bookings_for_room(&self, room_id: &str, date: NaiveDate) -> Vec<Booking> {
        self.bookings
            .lock()
            .iter()
            .filter(|b| b.is_for(room_id, date))
            .cloned()
            .collect()
    }

    /// Every booking created by one recurring request.
    pub fn get_bookings_in_group(&self, group_id: &str) -> Vec<Booking> {
        self.bookings
            .lock()
            .iter()
            .filter(|b| b.recurrence_group_id.as_deref() == Some(group_id))
            .cloned()
            .collect()
    }

    /// Whether `range` is free of bookings for `(room_id, date)`.
    ///
    /// Room existence and range validity are the caller's concern; an empty
    /// range is reported available.
    pub fn is_slot_available(&self, room_id: &str, date: NaiveDate, range: TimeRange) -> bool {
        conflict::is_range_free(&self.bookings.lock(), room_id, date, range)
    }

    /// Insert one booking after re-checking it against the current state.
    ///
    /// # Errors
    /// - `UnknownRoom` if the room is not in the catalog.
    /// - `InvalidTimeRange` if the end is not after the start.
    /// - `OutsideBookableHours` if the range leaves the 08:00-18:00 half-hour grid.
    /// - `CapacityExceeded` if `people_count` is above the room's maximum.
    /// - `SlotUnavailable` if the range overlaps an existing booking.
    ///
    /// The store is unchanged on any error.
    pub fn add_booking(&self, candidate: NewBooking) -> Result<Booking> {
        let room =
            self.checked_room(&candidate.room_id, candidate.range(), candidate.people_count)?;

        let mut bookings = self.bookings.lock();
        if !conflict::is_range_free(&bookings, &room.id, candidate.date, candidate.range()) {
            debug!(
                room = %room.id,
                date = %candidate.date,
                start = %candidate.start_time,
                end = %candidate.end_time,
                "slot no longer available"
            );
            return Err(BookingError::SlotUnavailable);
        }

        let booking = candidate.into_booking(new_id("b"));
        info!(
            id = %booking.id,
            room = %booking.room_id,
            date = %booking.date,
            start = %booking.start_time,
            end = %booking.end_time,
            "booking created"
        );
        bookings.push(booking.clone());
        Ok(booking)
    }

    /// Book `base` on each of `dates` in order, sharing one recurrence group.
    ///
    /// Each date is checked and committed independently: conflicting dates are
    /// reported in `conflict_dates`, and earlier successes are never rolled back.
    ///
    /// # Errors
    /// Request-level problems that would fail every date identically
    /// (`UnknownRoom`, `InvalidTimeRange`, `OutsideBookableHours`,
    /// `CapacityExceeded`) are rejected before anything is inserted.
    pub fn add_recurring_bookings(
        &self,
        base: &RecurringBase,
        dates: &[NaiveDate],
    ) -> Result<RecurringOutcome> {
        let room = self.checked_room(&base.room_id, base.range(), base.people_count)?;
        let group_id = new_id("rg");
        let mut booked_dates = Vec::new();
        let mut conflict_dates = Vec::new();

        let mut bookings = self.bookings.lock();
        for &date in dates {
            if conflict::is_range_free(&bookings, &room.id, date, base.range()) {
                bookings.push(base.on(date, &group_id).into_booking(new_id("b")));
                booked_dates.push(date);
            } else {
                debug!(room = %room.id, %date, group = %group_id, "recurring date conflicts");
                conflict_dates.push(date);
            }
        }
        drop(bookings);

        info!(
            group = %group_id,
            room = %room.id,
            booked = booked_dates.len(),
            conflicts = conflict_dates.len(),
            "recurring booking batch finished"
        );

        Ok(RecurringOutcome {
            success: !booked_dates.is_empty(),
            booked_dates,
            conflict_dates,
            group_id,
        })
    }

    /// Rooms that fit `people` and are free for `range` on `date`, in catalog order.
    ///
    /// A room fits when `capacity_max >= people` and `capacity_min <= people + 2`,
    /// which keeps large rooms out of small-meeting suggestions.
    pub fn find_available_rooms(
        &self,
        people: u32,
        date: NaiveDate,
        range: TimeRange,
    ) -> Vec<RoomSuggestion> {
        let bookings = self.bookings.lock();
        self.rooms
            .list_rooms()
            .iter()
            .filter(|room| {
                room.capacity_max >= people && room.capacity_min <= people.saturating_add(2)
            })
            .filter(|room| conflict::is_range_free(&bookings, &room.id, date, range))
            .map(|room| RoomSuggestion {
                room: room.clone(),
                date,
                start_time: range.start,
                end_time: range.end,
            })
            .collect()
    }

    /// Per-block status of the slot grid for one room-day.
    pub fn slot_statuses(
        &self,
        room_id: &str,
        date: NaiveDate,
        now: Option<NaiveDateTime>,
    ) -> Vec<SlotStatus> {
        freebusy::slot_statuses(&self.get_bookings_for_room(room_id, date), date, now)
    }

    /// Free gaps in the bookable day for one room.
    pub fn free_ranges(&self, room_id: &str, date: NaiveDate) -> Vec<FreeRange> {
        freebusy::free_ranges(&self.get_bookings_for_room(room_id, date), BOOKABLE_DAY)
    }

    fn checked_room(&self, room_id: &str, range: TimeRange, people: u32) -> Result<&Room> {
        let room = self
            .rooms
            .get_room_by_id(room_id)
            .ok_or_else(|| BookingError::UnknownRoom(room_id.to_string()))?;
        TimeRange::bookable(range.start, range.end)?;
        if !room.fits(people) {
            return Err(BookingError::CapacityExceeded { max: room.capacity_max });
        }
        Ok(room)
    }
}

fn demo_booking(
    id: &str,
    room_id: &str,
    date: NaiveDate,
    start: (u16, u16),
    end: (u16, u16),
    who: (&str, &str),
    people_count: u32,
) -> Booking {
    Booking {
        id: id.to_string(),
        room_id: room_id.to_string(),
        date,
        start_time: ClockTime::mark(start.0, start.1),
        end_time: ClockTime::mark(end.0, end.1),
        full_name: who.0.to_string(),
        email: who.1.to_string(),
        people_count,
        recurrence_group_id: None,
    }
}

fn new_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7())
}
