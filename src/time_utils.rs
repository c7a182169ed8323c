// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time handling.
//!
//! Weekly plans are bucketed into Monday-aligned windows in local time.
//! A window is stored by its Monday date; the wall-clock bounds are
//! Monday 00:00 (inclusive) and the following Monday 00:00 (exclusive).

use chrono::{
    DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc, Weekday,
};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time formatted for document timestamps.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Today's date in local time.
pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// All weekdays in plan order.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Parse a weekday from a path segment (`mon`, `Monday`, ...).
pub fn parse_weekday(raw: &str) -> Option<Weekday> {
    raw.trim().parse::<Weekday>().ok()
}

/// Monday-aligned 7-day window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    /// Monday of the week
    pub start: NaiveDate,
    /// Monday of the following week (exclusive)
    pub end: NaiveDate,
}

impl WeekWindow {
    /// Window containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        let start = date.week(Weekday::Mon).first_day();
        Self {
            start,
            end: start + Duration::days(7),
        }
    }

    /// Window containing today's local date.
    pub fn current() -> Self {
        Self::containing(today_local())
    }

    /// Monday 00:00 local time.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Next Monday 00:00 local time.
    pub fn ends_at(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Calendar date of `weekday` within this window.
    pub fn date_of(&self, weekday: Weekday) -> NaiveDate {
        self.start + Duration::days(weekday.num_days_from_monday() as i64)
    }

    pub fn days(&self) -> impl Iterator<Item = (Weekday, NaiveDate)> + '_ {
        WEEKDAYS.iter().map(move |&day| (day, self.date_of(day)))
    }
}
