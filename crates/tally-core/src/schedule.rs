//! Calendar triggers for the periodic reports.
//!
//! A trigger fires at a fixed local time in one configured timezone. Fire
//! instants are always computed forward from "now": an instant that passed
//! while the process was down is never replayed.

use std::fmt;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use tally_domain::DateRange;

use crate::report::ReportPeriod;

// Longest gap between two fire instants is a month plus a skipped DST day.
const SEARCH_HORIZON_DAYS: i64 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Once a day; reports today's activity.
    EndOfDay,
    /// On the first day of each month; reports month-start to today.
    StartOfMonth,
}

impl Trigger {
    pub const ALL: [Trigger; 2] = [Trigger::EndOfDay, Trigger::StartOfMonth];

    pub fn period(self) -> ReportPeriod {
        match self {
            Trigger::EndOfDay => ReportPeriod::Today,
            Trigger::StartOfMonth => ReportPeriod::ThisMonth,
        }
    }

    pub fn range(self, today: NaiveDate) -> DateRange {
        self.period().range(today)
    }

    fn fires_on(self, date: NaiveDate) -> bool {
        match self {
            Trigger::EndOfDay => true,
            Trigger::StartOfMonth => date.day() == 1,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trigger::EndOfDay => "end-of-day",
            Trigger::StartOfMonth => "start-of-month",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    timezone: Tz,
    end_of_day: NaiveTime,
    start_of_month: NaiveTime,
}

impl Schedule {
    pub fn new(timezone: Tz, end_of_day: NaiveTime, start_of_month: NaiveTime) -> Self {
        Self {
            timezone,
            end_of_day,
            start_of_month,
        }
    }

    pub fn time_of(&self, trigger: Trigger) -> NaiveTime {
        match trigger {
            Trigger::EndOfDay => self.end_of_day,
            Trigger::StartOfMonth => self.start_of_month,
        }
    }

    /// Calendar date of `instant` in the schedule's timezone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// First fire instant of `trigger` strictly after `after`.
    ///
    /// Local times that do not exist (DST gap) skip that day; ambiguous ones
    /// fire at the earlier instant.
    pub fn next_fire(&self, trigger: Trigger, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let time = self.time_of(trigger);
        let mut date = self.local_date(after) - Duration::days(1);
        for _ in 0..SEARCH_HORIZON_DAYS {
            date = date.succ_opt()?;
            if !trigger.fires_on(date) {
                continue;
            }
            let Some(local) = self
                .timezone
                .from_local_datetime(&date.and_time(time))
                .earliest()
            else {
                continue;
            };
            let instant = local.with_timezone(&Utc);
            if instant > after {
                return Some(instant);
            }
        }
        None
    }

    /// Next fire instant of every trigger, earliest first.
    pub fn upcoming(&self, after: DateTime<Utc>) -> Vec<(DateTime<Utc>, Trigger)> {
        let mut events: Vec<_> = Trigger::ALL
            .iter()
            .filter_map(|&trigger| self.next_fire(trigger, after).map(|at| (at, trigger)))
            .collect();
        events.sort_by_key(|(at, _)| *at);
        events
    }
}
