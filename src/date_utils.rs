use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;

/// Weekdays in display order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn from_dates(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The range a date picker may offer for data spanning `min..=max`.
    ///
    /// A single-day dataset gets its upper bound pushed one day forward so
    /// the picker never collapses to an empty interval.
    pub fn selectable(min: NaiveDate, max: NaiveDate) -> Self {
        let to = if min == max {
            max.succ_opt().unwrap_or(max)
        } else {
            max
        };
        Self { from: min, to }
    }

    /// The `days`-long window starting at `from` (both ends inclusive),
    /// cut short at the last representable date.
    pub fn starting_at(from: NaiveDate, days: i64) -> Self {
        Self {
            from,
            to: from
                .checked_add_signed(Duration::days(days))
                .unwrap_or(NaiveDate::MAX),
        }
    }

    /// The `days`-long window ending at `to` (both ends inclusive), cut
    /// short at the first representable date.
    pub fn ending_at(to: NaiveDate, days: i64) -> Self {
        Self {
            from: to
                .checked_sub_signed(Duration::days(days))
                .unwrap_or(NaiveDate::MIN),
            to,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }

    /// Narrow `self` so that both ends fall inside `bounds`.
    pub fn clamp_to(&self, bounds: &DateRange) -> Self {
        let from = self.from.clamp(bounds.from, bounds.to);
        let to = self.to.clamp(bounds.from, bounds.to);
        Self { from, to }
    }

    pub fn from_iso(&self) -> String {
        self.from.format("%Y-%m-%d").to_string()
    }

    pub fn to_iso(&self) -> String {
        self.to.format("%Y-%m-%d").to_string()
    }

    pub fn display_label(&self) -> String {
        format!(
            "{} – {}",
            self.from.format("%b %-d, %Y"),
            self.to.format("%b %-d, %Y")
        )
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse a stored date value into a timestamp.
///
/// Offsets are converted to UTC. A bare date becomes midnight of that day.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    for format in [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt);
        }
    }
    parse_date(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Month bucket key, e.g. `2024-01`.
pub fn month_key(day: NaiveDate) -> String {
    day.format("%Y-%m").to_string()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
