//! Weekday index convention: 0 = Sunday through 6 = Saturday.
//!
//! Internally weekdays are `chrono::Weekday`; the numeric index only appears
//! at the serialization boundary and in these helpers.

use chrono::{Datelike, NaiveDate, Weekday};

pub const SUNDAY: u8 = 0;
pub const SATURDAY: u8 = 6;

/// Sunday-based index of a weekday.
pub fn weekday_index(day: Weekday) -> u8 {
    // num_days_from_sunday() is 0..=6, always fits.
    day.num_days_from_sunday() as u8
}

/// Inverse of [`weekday_index`]. `None` for indices above 6.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Monday through Friday.
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Serde adapter for `Vec<Weekday>` as a list of Sunday-based indices.
pub mod index_list {
    use chrono::Weekday;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{weekday_from_index, weekday_index};

    pub fn serialize<S: Serializer>(days: &[Weekday], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(days.iter().map(|d| weekday_index(*d)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Weekday>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Vec<u8> = Vec::deserialize(deserializer)?;
        raw.into_iter()
            .map(|i| {
                weekday_from_index(i).ok_or_else(|| {
                    de::Error::custom(format!("weekday index {} out of range 0..=6", i))
                })
            })
            .collect()
    }
}
