//! Date ranges and calendar helpers.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date window. A missing bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Unbounded on both sides.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self::new(Some(start), Some(end))
    }

    pub fn day(date: NaiveDate) -> Self {
        Self::between(date, date)
    }

    /// From the first day of `date`'s month through `date`.
    pub fn month_to_date(date: NaiveDate) -> Self {
        Self::between(first_day_of(date), date)
    }

    /// Returns `None` when `month` is outside `1..=12` or the year is out of range.
    pub fn month(year: i32, month: u32) -> Option<Self> {
        Some(Self::between(
            first_day_of_month(year, month)?,
            last_day_of_month(year, month)?,
        ))
    }

    pub fn year(year: i32) -> Option<Self> {
        Some(Self::between(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if matches!(self.start, Some(start) if date < start) {
            return false;
        }
        if matches!(self.end, Some(end) if date > end) {
            return false;
        }
        true
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.start, self.end) {
            (Some(start), Some(end)) if start == end => write!(f, "{start}"),
            (Some(start), Some(end)) => write!(f, "{start}..={end}"),
            (Some(start), None) => write!(f, "{start}.."),
            (None, Some(end)) => write!(f, "..={end}"),
            (None, None) => f.write_str(".."),
        }
    }
}

pub fn first_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// The day before the first day of the following month.
pub fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    if !(1..=12).contains(&month) {
        return None;
    }
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    Some(first_next - Duration::days(1))
}

pub fn first_day_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// English month name for `1..=12`.
pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_day_handles_leap_years_and_december() {
        assert_eq!(last_day_of_month(2024, 2), Some(ymd(2024, 2, 29)));
        assert_eq!(last_day_of_month(2023, 2), Some(ymd(2023, 2, 28)));
        assert_eq!(last_day_of_month(2024, 4), Some(ymd(2024, 4, 30)));
        assert_eq!(last_day_of_month(2024, 12), Some(ymd(2024, 12, 31)));
        assert_eq!(last_day_of_month(2024, 13), None);
        assert_eq!(last_day_of_month(2024, 0), None);
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = DateRange::between(ymd(2024, 3, 1), ymd(2024, 3, 2));
        assert!(range.contains(ymd(2024, 3, 1)));
        assert!(range.contains(ymd(2024, 3, 2)));
        assert!(!range.contains(ymd(2024, 2, 29)));
        assert!(!range.contains(ymd(2024, 3, 3)));
    }

    #[test]
    fn open_bounds_accept_everything_on_that_side() {
        let from = DateRange::new(Some(ymd(2024, 1, 1)), None);
        assert!(from.contains(ymd(2999, 1, 1)));
        assert!(!from.contains(ymd(2023, 12, 31)));
        assert!(DateRange::all().contains(ymd(1900, 1, 1)));
    }

    #[test]
    fn month_to_date_starts_on_the_first() {
        let range = DateRange::month_to_date(ymd(2024, 3, 17));
        assert_eq!(range.start, Some(ymd(2024, 3, 1)));
        assert_eq!(range.end, Some(ymd(2024, 3, 17)));
    }

    #[test]
    fn display_collapses_single_day() {
        assert_eq!(DateRange::day(ymd(2024, 3, 1)).to_string(), "2024-03-01");
        assert_eq!(
            DateRange::month(2024, 2).unwrap().to_string(),
            "2024-02-01..=2024-02-29"
        );
    }
}
