//! The bookable half-hour grid and wall-clock times.
//!
//! Times are stored as minutes since midnight so that ordering is numeric, but
//! they parse from and print as zero-padded 24-hour `HH:MM`, the wire format
//! used everywhere else. Comparing two `ClockTime`s therefore agrees with
//! comparing their zero-padded strings.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::BookingError;

/// Length of one bookable block in minutes.
pub const SLOT_MINUTES: u16 = 30;

/// A wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    /// Build a time from hour and minute. Returns `None` outside 00:00..=23:59.
    pub const fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(ClockTime(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Const constructor for known-valid literal times.
    pub(crate) const fn mark(hour: u16, minute: u16) -> Self {
        ClockTime(hour * 60 + minute)
    }

    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    pub const fn minute(self) -> u16 {
        self.0 % 60
    }

    pub const fn minutes_since_midnight(self) -> u16 {
        self.0
    }

    /// Whether this time sits on a half-hour boundary.
    pub const fn is_on_grid(self) -> bool {
        self.0 % SLOT_MINUTES == 0
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidTime(s.to_string());
        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        ClockTime::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Grid marks from 08:00 to 18:00 inclusive at 30-minute steps (21 marks).
pub const TIME_SLOTS: [ClockTime; 21] = [
    ClockTime::mark(8, 0),
    ClockTime::mark(8, 30),
    ClockTime::mark(9, 0),
    ClockTime::mark(9, 30),
    ClockTime::mark(10, 0),
    ClockTime::mark(10, 30),
    ClockTime::mark(11, 0),
    ClockTime::mark(11, 30),
    ClockTime::mark(12, 0),
    ClockTime::mark(12, 30),
    ClockTime::mark(13, 0),
    ClockTime::mark(13, 30),
    ClockTime::mark(14, 0),
    ClockTime::mark(14, 30),
    ClockTime::mark(15, 0),
    ClockTime::mark(15, 30),
    ClockTime::mark(16, 0),
    ClockTime::mark(16, 30),
    ClockTime::mark(17, 0),
    ClockTime::mark(17, 30),
    ClockTime::mark(18, 0),
];

/// First bookable mark of the day.
pub const DAY_START: ClockTime = TIME_SLOTS[0];

/// Last mark of the day; no block starts here.
pub const DAY_END: ClockTime = TIME_SLOTS[TIME_SLOTS.len() - 1];

/// The 20 selectable half-hour blocks as `(start, end)` pairs, where each
/// block's end is the next grid mark.
pub fn selectable_blocks() -> impl Iterator<Item = (ClockTime, ClockTime)> {
    TIME_SLOTS.windows(2).map(|pair| (pair[0], pair[1]))
}

/// Format a time for display: `"13:30"` becomes `"1:30 PM"`.
///
/// 00:xx is shown as 12:xx AM and 12:xx as 12:xx PM.
pub fn format_time(time: ClockTime) -> String {
    let hour = time.hour();
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let h12 = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{}:{:02} {}", h12, time.minute(), meridiem)
}

/// Format a calendar day for display, e.g. `"Mon, Jan 1"`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// Parse an ISO `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| BookingError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_has_21_marks_and_20_blocks() {
        assert_eq!(TIME_SLOTS.len(), 21);
        assert_eq!(selectable_blocks().count(), 20);
        assert_eq!(DAY_START.to_string(), "08:00");
        assert_eq!(DAY_END.to_string(), "18:00");
        assert!(TIME_SLOTS.iter().all(|t| t.is_on_grid()));
    }

    #[test]
    fn format_time_uses_twelve_hour_clock() {
        let fmt = |s: &str| format_time(s.parse().unwrap());
        assert_eq!(fmt("00:00"), "12:00 AM");
        assert_eq!(fmt("08:30"), "8:30 AM");
        assert_eq!(fmt("12:00"), "12:00 PM");
        assert_eq!(fmt("13:30"), "1:30 PM");
        assert_eq!(fmt("23:59"), "11:59 PM");
    }

    #[test]
    fn format_date_is_short_weekday_month_day() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_date(monday), "Mon, Jan 1");
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn parse_rejects_malformed_times() {
        for bad in ["", "8", "24:00", "12:60", "12:5", "ab:cd", "123:00"] {
            assert!(bad.parse::<ClockTime>().is_err(), "{bad:?} should not parse");
        }
        assert_eq!("9:30".parse::<ClockTime>().unwrap().to_string(), "09:30");
    }
}
