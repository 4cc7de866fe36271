// models/src/clinic/time_slot.rs

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::DayOfWeek;
use crate::errors::{ClinicError, ClinicResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTimeSlot {
    pub doctor_id: u64,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// A recurring weekly availability window for one doctor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: u64,
    pub doctor_id: u64,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    pub fn from_new(id: u64, new: NewTimeSlot) -> ClinicResult<Self> {
        if new.start_time >= new.end_time {
            return Err(ClinicError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(TimeSlot {
            id,
            doctor_id: new.doctor_id,
            day_of_week: new.day_of_week,
            start_time: new.start_time,
            end_time: new.end_time,
            created_at: now,
            updated_at: now,
        })
    }

    /// Half-open interval intersection: `[start, end)` windows that merely
    /// touch (one's end equals the other's start) do not overlap.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        self.start_time < end && self.end_time > start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn slot(start: NaiveTime, end: NaiveTime) -> TimeSlot {
        TimeSlot::from_new(
            1,
            NewTimeSlot {
                doctor_id: 1,
                day_of_week: DayOfWeek::Monday,
                start_time: start,
                end_time: end,
            },
        )
        .unwrap()
    }

    #[test]
    fn rejects_inverted_window() {
        assert!(
            TimeSlot::from_new(
                1,
                NewTimeSlot {
                    doctor_id: 1,
                    day_of_week: DayOfWeek::Monday,
                    start_time: t(17, 0),
                    end_time: t(9, 0),
                },
            )
            .is_err()
        );
    }

    #[test]
    fn overlap_is_half_open() {
        let s = slot(t(9, 0), t(12, 0));
        assert!(s.overlaps(t(11, 0), t(13, 0)));
        assert!(s.overlaps(t(8, 0), t(9, 30)));
        assert!(s.overlaps(t(10, 0), t(11, 0)));
        // Adjacent windows are fine.
        assert!(!s.overlaps(t(12, 0), t(14, 0)));
        assert!(!s.overlaps(t(7, 0), t(9, 0)));
    }
}
