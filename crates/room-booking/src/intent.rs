//! Best-effort extraction of booking fields from free text.
//!
//! The extractor never fails: anything it cannot recognise is left as `None`,
//! and its output is only a partial request. Callers fill in the rest and hand
//! the completed request to the store, which performs every real check.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::slots::ClockTime;

static PEOPLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*(?:people|person|attendee|seat|pax)").expect("valid regex")
});

static FOR_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"for\s+(\d+)").expect("valid regex"));

static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\s*[-–to]+\s*(\d{1,2})(?::(\d{2}))?\s*(am|pm)?")
        .expect("valid regex")
});

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w.-]+@[\w.-]+\.\w+").expect("valid regex"));

/// Fields recognised in one message. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingIntent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub people_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<ClockTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl BookingIntent {
    /// Overlay `newer` on `self`; fields present in `newer` win.
    pub fn merge(&mut self, newer: BookingIntent) {
        self.people_count = newer.people_count.or(self.people_count);
        self.date = newer.date.or(self.date);
        self.start_time = newer.start_time.or(self.start_time);
        self.end_time = newer.end_time.or(self.end_time);
        self.email = newer.email.or(self.email.take());
    }

    pub fn is_empty(&self) -> bool {
        *self == BookingIntent::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "am" => Some(Meridiem::Am),
            "pm" => Some(Meridiem::Pm),
            _ => None,
        }
    }

    /// Convert a 12-hour clock hour to 24-hour.
    fn apply(self, hour: u16) -> u16 {
        match self {
            Meridiem::Pm if hour < 12 => hour + 12,
            Meridiem::Am if hour == 12 => 0,
            _ => hour,
        }
    }
}

/// Extract whatever booking fields `text` mentions.
///
/// `today` anchors the "today"/"tomorrow" keywords.
pub fn parse_intent(text: &str, today: NaiveDate) -> BookingIntent {
    let lower = text.to_lowercase();

    let people_count =
        capture_number(&PEOPLE, &lower).or_else(|| capture_number(&FOR_COUNT, &lower));

    let date = if lower.contains("today") {
        Some(today)
    } else if lower.contains("tomorrow") {
        today.checked_add_days(Days::new(1))
    } else {
        None
    };

    let (start_time, end_time) = parse_time_range(&lower).unzip();

    let email = EMAIL.find(text).map(|m| m.as_str().to_string());

    BookingIntent {
        people_count,
        date,
        start_time,
        end_time,
        email,
    }
}

/// Parse the first time range in lowercase `text`, e.g. `3-4pm`,
/// `10am to 11:30am` or `15:00-16:00`.
///
/// A meridiem given only on the end applies to both ends. A bare range whose
/// start hour is 1 through 6 is taken as afternoon. Ranges naming an impossible
/// time are ignored.
pub fn parse_time_range(text: &str) -> Option<(ClockTime, ClockTime)> {
    let caps = TIME_RANGE.captures(text)?;
    let num = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u16>().ok());
    let meridiem = |i: usize| caps.get(i).and_then(|m| Meridiem::parse(m.as_str()));

    let mut start_h = num(1)?;
    let start_m = num(2).unwrap_or(0);
    let start_mer = meridiem(3);
    let mut end_h = num(4)?;
    let end_m = num(5).unwrap_or(0);
    let end_mer = meridiem(6).or(start_mer);

    if let Some(m) = end_mer {
        end_h = m.apply(end_h);
    }
    if let Some(m) = start_mer {
        start_h = m.apply(start_h);
    }

    match (start_mer, end_mer) {
        // "3-4pm": the end's meridiem carries back to a bare start.
        (None, Some(Meridiem::Pm)) if start_h < 12 && start_h + 12 < end_h => start_h += 12,
        (None, None) if start_h < end_h && (1..=6).contains(&start_h) => {
            start_h += 12;
            end_h += 12;
        }
        _ => {}
    }

    Some((ClockTime::from_hm(start_h, start_m)?, ClockTime::from_hm(end_h, end_m)?))
}

fn capture_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(text: &str) -> Option<(String, String)> {
        parse_time_range(text).map(|(s, e)| (s.to_string(), e.to_string()))
    }

    fn pair(s: &str, e: &str) -> Option<(String, String)> {
        Some((s.to_string(), e.to_string()))
    }

    #[test]
    fn end_meridiem_carries_to_start() {
        assert_eq!(range("3-4pm"), pair("15:00", "16:00"));
        assert_eq!(range("11-1pm"), pair("11:00", "13:00"));
        assert_eq!(range("10-11am"), pair("10:00", "11:00"));
    }

    #[test]
    fn explicit_meridiems_on_both_ends() {
        assert_eq!(range("10am to 11:30am"), pair("10:00", "11:30"));
        assert_eq!(range("11am - 1pm"), pair("11:00", "13:00"));
        assert_eq!(range("12am-1am"), pair("00:00", "01:00"));
    }

    #[test]
    fn start_meridiem_is_inherited_by_bare_end() {
        assert_eq!(range("2pm-3"), pair("14:00", "15:00"));
    }

    #[test]
    fn bare_afternoon_hours_default_to_pm() {
        assert_eq!(range("2-3"), pair("14:00", "15:00"));
        assert_eq!(range("9-10"), pair("09:00", "10:00"));
        assert_eq!(range("15:00-16:00"), pair("15:00", "16:00"));
    }

    #[test]
    fn impossible_times_are_dropped() {
        assert_eq!(range("25-26"), None);
        assert_eq!(range("no times here"), None);
    }
}
