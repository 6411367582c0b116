//! Recurrence expansion: converts a pattern and an anchor date into concrete dates.
//!
//! Expansion is pure and deterministic. Dates come out in ascending order because
//! every pattern walks forward from the anchor.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{BookingError, Result};
use crate::weekday::{self, is_business_day};

/// Upper bound on `repeat_weeks` accepted by [`RecurrenceConfig::validate`].
pub const MAX_REPEAT_WEEKS: u32 = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    /// One-time booking; never expanded.
    #[default]
    None,
    /// Every weekday, Monday through Friday.
    Daily,
    /// Same weekday as the anchor, once per week.
    Weekly,
    /// Chosen weekdays of every week.
    Custom,
}

/// A recurrence pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceConfig {
    #[serde(rename = "type")]
    pub kind: RecurrenceKind,
    /// Span of the pattern in weeks.
    pub repeat_weeks: u32,
    /// Weekdays kept by [`RecurrenceKind::Custom`]; ignored otherwise.
    #[serde(default, with = "weekday::index_list")]
    pub custom_days: Vec<Weekday>,
}

impl RecurrenceConfig {
    pub fn once() -> Self {
        Self {
            kind: RecurrenceKind::None,
            repeat_weeks: 1,
            custom_days: Vec::new(),
        }
    }

    pub fn daily(repeat_weeks: u32) -> Self {
        Self {
            kind: RecurrenceKind::Daily,
            repeat_weeks,
            custom_days: Vec::new(),
        }
    }

    pub fn weekly(repeat_weeks: u32) -> Self {
        Self {
            kind: RecurrenceKind::Weekly,
            repeat_weeks,
            custom_days: Vec::new(),
        }
    }

    pub fn custom(days: &[Weekday], repeat_weeks: u32) -> Self {
        Self {
            kind: RecurrenceKind::Custom,
            repeat_weeks,
            custom_days: days.to_vec(),
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.kind != RecurrenceKind::None
    }

    /// Input validation the expander itself does not perform.
    ///
    /// # Errors
    /// Returns `BookingError::InvalidRecurrence` when a recurring pattern has a
    /// zero or oversized week span, or a custom pattern has no days.
    pub fn validate(&self) -> Result<()> {
        if !self.is_recurring() {
            return Ok(());
        }
        if self.repeat_weeks == 0 || self.repeat_weeks > MAX_REPEAT_WEEKS {
            return Err(BookingError::InvalidRecurrence(format!(
                "repeatWeeks must be between 1 and {}, got {}",
                MAX_REPEAT_WEEKS, self.repeat_weeks
            )));
        }
        if self.kind == RecurrenceKind::Custom && self.custom_days.is_empty() {
            return Err(BookingError::InvalidRecurrence(
                "custom recurrence needs at least one day".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expand a recurrence pattern anchored at `start` into concrete dates.
///
/// - `Daily`: every Monday–Friday within `repeat_weeks * 7` days from `start`.
/// - `Weekly`: `start + 7*w` for `w` in `0..repeat_weeks`.
/// - `Custom`: every day within `repeat_weeks * 7` days whose weekday is listed.
/// - `None`: nothing; callers book the single date directly.
///
/// A custom pattern with no days yields an empty list. Dates that would fall
/// beyond chrono's calendar range are dropped.
pub fn generate_recurring_dates(start: NaiveDate, config: &RecurrenceConfig) -> Vec<NaiveDate> {
    let total_days = u64::from(config.repeat_weeks) * 7;

    match config.kind {
        RecurrenceKind::None => Vec::new(),
        RecurrenceKind::Daily => days_from(start, total_days)
            .filter(|d| is_business_day(*d))
            .collect(),
        RecurrenceKind::Weekly => (0..u64::from(config.repeat_weeks))
            .map_while(|w| start.checked_add_days(Days::new(w * 7)))
            .collect(),
        RecurrenceKind::Custom => {
            if config.custom_days.is_empty() {
                return Vec::new();
            }
            days_from(start, total_days)
                .filter(|d| config.custom_days.contains(&d.weekday()))
                .collect()
        }
    }
}

/// `count` consecutive calendar days starting at `start`.
fn days_from(start: NaiveDate, count: u64) -> impl Iterator<Item = NaiveDate> {
    (0..count).map_while(move |i| start.checked_add_days(Days::new(i)))
}
