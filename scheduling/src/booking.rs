// scheduling/src/booking.rs
//
// Admissibility checks for a booking request, evaluated in a fixed order
// so a request failing several of them always gets the same answer. The
// caller supplies the current wall-clock instant; nothing in here reads
// the system clock, which keeps the past-slot rule testable.

use chrono::NaiveDateTime;
use models::calendar::{DayOfWeek, day_of_week};
use models::clinic::TimeSlot;
use storage::{ClinicStore, StoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Time slot not found or does not belong to the specified doctor")]
    SlotMismatch,
    #[error("Appointment date must be on a {expected}")]
    WrongWeekday { expected: DayOfWeek },
    #[error("Cannot book a time slot that has already passed.")]
    SlotInPast,
    #[error("This time slot is already booked")]
    DoctorConflict,
    #[error("You already have an appointment at this time")]
    PatientConflict,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy)]
pub struct BookingRequest {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub time_slot_id: u64,
    pub appointment_date: chrono::NaiveDate,
    /// Set when rescheduling: the appointment being moved does not
    /// conflict with itself.
    pub exclude_appointment_id: Option<u64>,
}

/// Runs the admissibility checks in order and returns the slot being
/// booked. Order matters: ownership, weekday alignment, the same-day
/// past-slot rule, then the two conflict checks (doctor side first).
/// A slot counts as passed only once its end time is behind the clock,
/// so an in-progress slot is still bookable. Future-dated requests never
/// hit the rule; past *dates* are accepted so back-dated records can be
/// entered.
pub fn validate_booking(
    store: &ClinicStore,
    req: &BookingRequest,
    now: NaiveDateTime,
) -> Result<TimeSlot, BookingError> {
    let slot = match store.time_slot(req.time_slot_id) {
        Ok(slot) => slot,
        Err(StoreError::NotFound(_)) => return Err(BookingError::SlotMismatch),
        Err(e) => return Err(e.into()),
    };
    if slot.doctor_id != req.doctor_id {
        return Err(BookingError::SlotMismatch);
    }

    let requested_day = day_of_week(req.appointment_date);
    if requested_day != slot.day_of_week {
        return Err(BookingError::WrongWeekday {
            expected: slot.day_of_week,
        });
    }

    if req.appointment_date == now.date() && now.time() > slot.end_time {
        return Err(BookingError::SlotInPast);
    }

    let holder = store.active_doctor_booking(req.doctor_id, slot.id, req.appointment_date)?;
    if holder.is_some() && holder != req.exclude_appointment_id {
        return Err(BookingError::DoctorConflict);
    }
    let holder = store.active_patient_booking(req.patient_id, slot.id, req.appointment_date)?;
    if holder.is_some() && holder != req.exclude_appointment_id {
        return Err(BookingError::PatientConflict);
    }

    Ok(slot)
}
