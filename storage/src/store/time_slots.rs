// storage/src/store/time_slots.rs

use chrono::{NaiveTime, Utc};
use models::calendar::DayOfWeek;
use models::clinic::{NewTimeSlot, TimeSlot};

use super::{ClinicStore, fetch, put, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    /// Creates a slot after checking the per-(doctor, day) overlap
    /// invariant. Adjacent slots (end == other start) are allowed.
    pub fn create_time_slot(&self, new: NewTimeSlot) -> StoreResult<TimeSlot> {
        if super::read_opt::<models::clinic::Doctor>(&self.doctors, new.doctor_id)?.is_none() {
            return Err(StoreError::NotFound("Doctor"));
        }
        self.check_slot_overlap(new.doctor_id, new.day_of_week, new.start_time, new.end_time, None)?;

        let id = self.next_id()?;
        let slot = TimeSlot::from_new(id, new).map_err(|e| StoreError::Invalid(e.to_string()))?;
        put(&self.time_slots, id, &slot)?;
        Ok(slot)
    }

    pub fn time_slot(&self, id: u64) -> StoreResult<TimeSlot> {
        fetch(&self.time_slots, id, "Time slot")
    }

    pub fn time_slots(&self) -> StoreResult<Vec<TimeSlot>> {
        let mut slots: Vec<TimeSlot> = scan(&self.time_slots)?;
        slots.sort_by_key(|s| (s.day_of_week.as_str(), s.start_time));
        Ok(slots)
    }

    pub fn time_slots_for_doctor(&self, doctor_id: u64) -> StoreResult<Vec<TimeSlot>> {
        let mut slots: Vec<TimeSlot> = scan::<TimeSlot>(&self.time_slots)?
            .into_iter()
            .filter(|s| s.doctor_id == doctor_id)
            .collect();
        slots.sort_by_key(|s| (s.day_of_week.as_str(), s.start_time));
        Ok(slots)
    }

    /// Slots defined for one doctor on one weekday, ordered by start time.
    pub fn time_slots_for_doctor_on_day(
        &self,
        doctor_id: u64,
        day: DayOfWeek,
    ) -> StoreResult<Vec<TimeSlot>> {
        let mut slots: Vec<TimeSlot> = scan::<TimeSlot>(&self.time_slots)?
            .into_iter()
            .filter(|s| s.doctor_id == doctor_id && s.day_of_week == day)
            .collect();
        slots.sort_by_key(|s| s.start_time);
        Ok(slots)
    }

    /// Mutation is blocked while any non-cancelled appointment references
    /// the slot.
    pub fn update_time_slot(
        &self,
        id: u64,
        day_of_week: DayOfWeek,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> StoreResult<TimeSlot> {
        let mut slot = self.time_slot(id)?;
        if self.slot_has_active_appointments(id)? {
            return Err(StoreError::Invalid(
                "Cannot update time slot with active appointments".to_string(),
            ));
        }
        if start_time >= end_time {
            return Err(StoreError::Invalid(
                "start_time must be before end_time".to_string(),
            ));
        }
        self.check_slot_overlap(slot.doctor_id, day_of_week, start_time, end_time, Some(id))?;

        slot.day_of_week = day_of_week;
        slot.start_time = start_time;
        slot.end_time = end_time;
        slot.updated_at = Utc::now();
        put(&self.time_slots, id, &slot)?;
        Ok(slot)
    }

    pub fn delete_time_slot(&self, id: u64) -> StoreResult<()> {
        let _ = self.time_slot(id)?;
        if self.slot_has_active_appointments(id)? {
            return Err(StoreError::Invalid(
                "Cannot delete time slot with active appointments".to_string(),
            ));
        }
        self.time_slots.remove(super::id_key(id))?;
        Ok(())
    }

    pub fn slot_has_active_appointments(&self, time_slot_id: u64) -> StoreResult<bool> {
        Ok(self
            .appointments()?
            .iter()
            .any(|a| a.time_slot_id == time_slot_id && a.status.is_active()))
    }

    fn check_slot_overlap(
        &self,
        doctor_id: u64,
        day: DayOfWeek,
        start: NaiveTime,
        end: NaiveTime,
        exclude: Option<u64>,
    ) -> StoreResult<()> {
        let overlapping = self
            .time_slots_for_doctor_on_day(doctor_id, day)?
            .into_iter()
            .any(|s| Some(s.id) != exclude && s.overlaps(start, end));
        if overlapping {
            Err(StoreError::Conflict(
                "Time slot overlaps with existing slot".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
