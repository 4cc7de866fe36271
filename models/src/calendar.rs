// models/src/calendar.rs
//
// Weekday handling for appointment dates. Dates are pure (year, month, day)
// values with no time-of-day or timezone component, so weekday computation
// must not depend on locale or environment. chrono's `NaiveDate::weekday`
// is a plain Gregorian calendar calculation, which is exactly that.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::ClinicError;

/// The seven weekday names a `TimeSlot` can be defined on. Serialized with
/// the capitalized English names the store and the API use ("Monday", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Monday" => Ok(DayOfWeek::Monday),
            "Tuesday" => Ok(DayOfWeek::Tuesday),
            "Wednesday" => Ok(DayOfWeek::Wednesday),
            "Thursday" => Ok(DayOfWeek::Thursday),
            "Friday" => Ok(DayOfWeek::Friday),
            "Saturday" => Ok(DayOfWeek::Saturday),
            "Sunday" => Ok(DayOfWeek::Sunday),
            other => Err(ClinicError::Validation(format!(
                "invalid day of week: {other}"
            ))),
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(w: Weekday) -> Self {
        match w {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

/// Weekday of a calendar date.
pub fn day_of_week(date: NaiveDate) -> DayOfWeek {
    DayOfWeek::from(date.weekday())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_dates_map_to_expected_weekdays() {
        // 2024-03-18 is the Monday used throughout the booking tests.
        let monday = NaiveDate::from_ymd_opt(2024, 3, 18).unwrap();
        assert_eq!(day_of_week(monday), DayOfWeek::Monday);

        let sunday = NaiveDate::from_ymd_opt(2024, 3, 24).unwrap();
        assert_eq!(day_of_week(sunday), DayOfWeek::Sunday);

        // Leap day.
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(day_of_week(leap), DayOfWeek::Thursday);
    }

    #[test]
    fn round_trips_through_display_and_from_str() {
        for day in DayOfWeek::ALL {
            assert_eq!(day.to_string().parse::<DayOfWeek>().unwrap(), day);
        }
        assert!("monday".parse::<DayOfWeek>().is_err());
    }

    #[test]
    fn serializes_as_capitalized_name() {
        let json = serde_json::to_string(&DayOfWeek::Wednesday).unwrap();
        assert_eq!(json, "\"Wednesday\"");
    }
}
