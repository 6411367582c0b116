//! Tests for recurring batch inserts.

use chrono::NaiveDate;
use room_booking::{
    generate_recurring_dates, BookingError, BookingStore, NewBooking, RecurrenceConfig,
    RecurringBase, RoomCatalog, TimeRange,
};

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn base(room: &str, start: &str, end: &str, people: u32) -> RecurringBase {
    RecurringBase {
        room_id: room.to_string(),
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        full_name: "Jane Doe".to_string(),
        email: "jane@company.com".to_string(),
        people_count: people,
    }
}

fn single(room: &str, day: &str, start: &str, end: &str) -> NewBooking {
    NewBooking {
        room_id: room.to_string(),
        date: date(day),
        start_time: start.parse().unwrap(),
        end_time: end.parse().unwrap(),
        full_name: "Sam Lee".to_string(),
        email: "sam@company.com".to_string(),
        people_count: 2,
        recurrence_group_id: None,
    }
}

fn store() -> BookingStore {
    BookingStore::new(RoomCatalog::default_rooms())
}

#[test]
fn one_conflicting_date_is_partitioned_out() {
    let store = store();
    store.add_booking(single("room-2", "2024-01-15", "10:30", "11:30")).unwrap();
    let dates = generate_recurring_dates(date("2024-01-01"), &RecurrenceConfig::weekly(4));

    let outcome = store
        .add_recurring_bookings(&base("room-2", "10:00", "11:00", 2), &dates)
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.booked_dates, [date("2024-01-01"), date("2024-01-08"), date("2024-01-22")]);
    assert_eq!(outcome.conflict_dates, [date("2024-01-15")]);
    assert!(outcome.group_id.starts_with("rg-"));

    let group = store.get_bookings_in_group(&outcome.group_id);
    assert_eq!(group.len(), 3);
    assert!(group
        .iter()
        .all(|b| b.recurrence_group_id.as_deref() == Some(outcome.group_id.as_str())));
    let mut ids: Vec<&str> = group.iter().map(|b| b.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3, "every booking in a group gets its own id");
}

#[test]
fn every_date_conflicting_reports_failure_without_inserting() {
    let store = store();
    let dates = [date("2024-01-01"), date("2024-01-02")];
    for d in ["2024-01-01", "2024-01-02"] {
        store.add_booking(single("room-1", d, "09:00", "12:00")).unwrap();
    }

    let outcome = store
        .add_recurring_bookings(&base("room-1", "10:00", "11:00", 1), &dates)
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.booked_dates.is_empty());
    assert_eq!(outcome.conflict_dates, dates);
    assert_eq!(store.len(), 2);
}

#[test]
fn earlier_successes_are_not_rolled_back() {
    let store = store();
    store.add_booking(single("room-3", "2024-01-03", "09:00", "10:00")).unwrap();
    let dates = generate_recurring_dates(date("2024-01-01"), &RecurrenceConfig::daily(1));

    let outcome = store
        .add_recurring_bookings(&base("room-3", "09:00", "10:00", 4), &dates)
        .unwrap();

    assert_eq!(outcome.booked_dates.len(), 4);
    assert_eq!(outcome.conflict_dates, [date("2024-01-03")]);
    // 1 pre-existing + 4 from the batch
    assert_eq!(store.len(), 5);
    let range = TimeRange::parse("09:00", "10:00").unwrap();
    for d in &outcome.booked_dates {
        assert!(!store.is_slot_available("room-3", *d, range));
    }
}

#[test]
fn repeated_dates_in_input_conflict_with_the_batch_itself() {
    let store = store();
    let d = date("2024-01-01");

    let outcome = store
        .add_recurring_bookings(&base("room-1", "09:00", "10:00", 1), &[d, d])
        .unwrap();

    assert_eq!(outcome.booked_dates, [d]);
    assert_eq!(outcome.conflict_dates, [d]);
}

#[test]
fn separate_batches_get_distinct_groups() {
    let store = store();
    let a = store
        .add_recurring_bookings(&base("room-1", "09:00", "10:00", 1), &[date("2024-01-01")])
        .unwrap();
    let b = store
        .add_recurring_bookings(&base("room-1", "10:00", "11:00", 1), &[date("2024-01-01")])
        .unwrap();

    assert_ne!(a.group_id, b.group_id);
}

#[test]
fn empty_date_list_books_nothing() {
    let store = store();
    let outcome = store
        .add_recurring_bookings(&base("room-1", "09:00", "10:00", 1), &[])
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.booked_dates.is_empty() && outcome.conflict_dates.is_empty());
}

#[test]
fn capacity_is_enforced_once_for_the_whole_batch() {
    let store = store();
    let dates = generate_recurring_dates(date("2024-01-01"), &RecurrenceConfig::weekly(3));

    let err = store
        .add_recurring_bookings(&base("room-2", "09:00", "10:00", 4), &dates)
        .unwrap_err();

    assert_eq!(err, BookingError::CapacityExceeded { max: 3 });
    assert!(store.is_empty(), "no date may be booked when the room is too small");
}

#[test]
fn unknown_room_rejects_the_batch() {
    let store = store();
    assert_eq!(
        store.add_recurring_bookings(&base("nope", "09:00", "10:00", 1), &[date("2024-01-01")]),
        Err(BookingError::UnknownRoom("nope".to_string()))
    );
}
