//! # room-booking
//!
//! Availability, conflict detection and recurring reservations for shared
//! meeting rooms.
//!
//! The engine guarantees that no room is ever double-booked: every insert
//! re-checks the requested half-open range `[start, end)` against the room's
//! existing bookings inside the same critical section as the append.
//! Back-to-back bookings are allowed.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use room_booking::{generate_recurring_dates, BookingStore, RecurrenceConfig, TimeRange};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let store = BookingStore::with_demo_data(today);
//!
//! // The demo data holds room-3 from 09:00 to 10:00.
//! let busy = TimeRange::parse("09:30", "10:30").unwrap();
//! let after = TimeRange::parse("10:00", "11:00").unwrap();
//! assert!(!store.is_slot_available("room-3", today, busy));
//! assert!(store.is_slot_available("room-3", today, after));
//!
//! let dates = generate_recurring_dates(today, &RecurrenceConfig::weekly(4));
//! assert_eq!(dates.len(), 4);
//! ```
//!
//! ## Modules
//!
//! - [`slots`] — `HH:MM` clock times, the 08:00–18:00 half-hour grid, display formatting
//! - [`weekday`] — Sunday-based weekday indices
//! - [`room`] — Room reference data and people-count filters
//! - [`booking`] — Bookings and half-open time ranges
//! - [`conflict`] — Overlap detection against existing bookings
//! - [`freebusy`] — Free ranges and per-slot status for one room-day
//! - [`recurrence`] — Recurrence pattern → concrete dates
//! - [`store`] — The booking store: single and recurring inserts, room suggestions
//! - [`request`] — Guided-form validation and submission
//! - [`intent`] — Free-text → partial booking request
//! - [`intake`] — Chat field-collection flow on top of the store
//! - [`error`] — Error types

pub mod booking;
pub mod conflict;
pub mod error;
pub mod freebusy;
pub mod intake;
pub mod intent;
pub mod recurrence;
pub mod request;
pub mod room;
pub mod slots;
pub mod store;
pub mod weekday;

pub use booking::{Booking, NewBooking, RecurringBase, TimeRange};
pub use conflict::find_conflicts;
pub use error::BookingError;
pub use intake::{Conversation, FlowState, Reply};
pub use intent::{parse_intent, BookingIntent};
pub use recurrence::{generate_recurring_dates, RecurrenceConfig, RecurrenceKind};
pub use request::{submit, BookingDetails, BookingRequest, Submission};
pub use room::{PeopleFilter, Room, RoomCatalog};
pub use slots::{format_time, ClockTime, TIME_SLOTS};
pub use store::{BookingStore, RecurringOutcome, RoomSuggestion, StoreSeed};
