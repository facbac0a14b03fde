//! Capture dates encoded in file names.
//!
//! Cameras and phones commonly name files after the moment they were taken,
//! e.g. `IMG_20230401_120000.jpg` or `VID-20191224-WA0003.mp4`. This module
//! recovers the `YYYYMMDD` part of such names.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Eight ASCII digits read as year, month and day.
static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{4})([0-9]{2})([0-9]{2})").expect("Invalid date pattern")
});

/// A real Gregorian calendar date.
///
/// Values can only be built for dates that exist, so `2023-02-30` or a month
/// of `13` are rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Builds a date, returning `None` if it does not exist in the calendar.
    ///
    /// ```
    /// use mediatidy::date_extractor::CalendarDate;
    ///
    /// assert!(CalendarDate::new(2024, 2, 29).is_some());
    /// assert!(CalendarDate::new(2023, 2, 29).is_none());
    /// assert!(CalendarDate::new(2023, 0, 10).is_none());
    /// assert!(CalendarDate::new(0, 1, 1).is_none());
    /// ```
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        // The Gregorian calendar starts at year 1.
        if year < 1 {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Returns the date as a `(year, month, day)` triple.
    pub fn ymd(&self) -> (i32, u32, u32) {
        (self.year(), self.month(), self.day())
    }

    /// Returns the underlying `chrono` date.
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Extracts the date encoded as `YYYYMMDD` in a path's file name.
///
/// Only the file name is inspected, never the directories above it. The first
/// run of eight digits found scanning left to right is used; if it is not a
/// real date the result is `None` and later runs are not tried.
///
/// # Examples
///
/// ```
/// use mediatidy::date_extractor::date_from_name;
/// use std::path::Path;
///
/// let date = date_from_name(Path::new("IMG_20230401_1200.jpg")).unwrap();
/// assert_eq!(date.ymd(), (2023, 4, 1));
///
/// assert_eq!(date_from_name(Path::new("20231332_party.png")), None);
/// assert_eq!(date_from_name(Path::new("no_date_here.png")), None);
/// ```
pub fn date_from_name(path: &Path) -> Option<CalendarDate> {
    let file_name = path.file_name()?.to_string_lossy();
    let captures = DATE_PATTERN.captures(&file_name)?;

    let year = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    let day = captures[3].parse().ok()?;

    CalendarDate::new(year, month, day)
}
