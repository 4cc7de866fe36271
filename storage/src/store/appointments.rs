// storage/src/store/appointments.rs
//
// Appointment rows plus the two booking index trees that enforce the
// uniqueness invariants: at most one non-cancelled appointment per
// (doctor, slot, date) and per (patient, slot, date). Index keys are
// claimed with compare_and_swap before the row is written, so two racing
// creates resolve to one success and one conflict.

use std::collections::HashSet;

use chrono::{NaiveDate, Utc};
use models::clinic::{Appointment, AppointmentStatus, NewAppointment};

use super::{ClinicStore, booking_key, fetch, index_holder, put, read_opt, release_unique,
            reserve_unique, scan};
use crate::errors::{StoreError, StoreResult};

const DOCTOR_BOOKED: &str = "This time slot is already booked";
const PATIENT_BOOKED: &str = "You already have an appointment at this time";

impl ClinicStore {
    pub fn create_appointment(&self, new: NewAppointment) -> StoreResult<Appointment> {
        if read_opt::<models::clinic::Patient>(&self.patients, new.patient_id)?.is_none() {
            return Err(StoreError::Reference("patient".to_string()));
        }
        if read_opt::<models::clinic::Doctor>(&self.doctors, new.doctor_id)?.is_none() {
            return Err(StoreError::Reference("doctor".to_string()));
        }
        if read_opt::<models::clinic::TimeSlot>(&self.time_slots, new.time_slot_id)?.is_none() {
            return Err(StoreError::Reference("time slot".to_string()));
        }

        let id = self.next_id()?;
        let appointment = Appointment::from_new(id, new);

        if appointment.status.is_active() {
            let dk = booking_key(
                appointment.doctor_id,
                appointment.time_slot_id,
                appointment.appointment_date,
            );
            let pk = booking_key(
                appointment.patient_id,
                appointment.time_slot_id,
                appointment.appointment_date,
            );
            reserve_unique(&self.idx_doctor_bookings, &dk, id, DOCTOR_BOOKED)?;
            if let Err(e) = reserve_unique(&self.idx_patient_bookings, &pk, id, PATIENT_BOOKED) {
                release_unique(&self.idx_doctor_bookings, &dk, id)?;
                return Err(e);
            }
        }

        put(&self.appointments, id, &appointment)?;
        Ok(appointment)
    }

    pub fn appointment(&self, id: u64) -> StoreResult<Appointment> {
        fetch(&self.appointments, id, "Appointment")
    }

    pub fn appointments(&self) -> StoreResult<Vec<Appointment>> {
        let mut list: Vec<Appointment> = scan(&self.appointments)?;
        list.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
        Ok(list)
    }

    pub fn appointments_for_doctor(&self, doctor_id: u64) -> StoreResult<Vec<Appointment>> {
        let mut list: Vec<Appointment> = scan::<Appointment>(&self.appointments)?
            .into_iter()
            .filter(|a| a.doctor_id == doctor_id)
            .collect();
        list.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
        Ok(list)
    }

    pub fn appointments_for_patient(&self, patient_id: u64) -> StoreResult<Vec<Appointment>> {
        let mut list: Vec<Appointment> = scan::<Appointment>(&self.appointments)?
            .into_iter()
            .filter(|a| a.patient_id == patient_id)
            .collect();
        list.sort_by(|a, b| b.appointment_date.cmp(&a.appointment_date));
        Ok(list)
    }

    pub fn appointments_on_date(&self, date: NaiveDate) -> StoreResult<Vec<Appointment>> {
        let mut list: Vec<Appointment> = scan::<Appointment>(&self.appointments)?
            .into_iter()
            .filter(|a| a.appointment_date == date)
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    /// Id of the non-cancelled appointment holding (doctor, slot, date),
    /// if any. Reads the booking index, not the row tree.
    pub fn active_doctor_booking(
        &self,
        doctor_id: u64,
        time_slot_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<u64>> {
        index_holder(
            &self.idx_doctor_bookings,
            &booking_key(doctor_id, time_slot_id, date),
        )
    }

    pub fn active_patient_booking(
        &self,
        patient_id: u64,
        time_slot_id: u64,
        date: NaiveDate,
    ) -> StoreResult<Option<u64>> {
        index_holder(
            &self.idx_patient_bookings,
            &booking_key(patient_id, time_slot_id, date),
        )
    }

    /// Slot ids holding a non-cancelled appointment for this doctor on
    /// this date. Input to the availability set difference.
    pub fn booked_slot_ids(&self, doctor_id: u64, date: NaiveDate) -> StoreResult<HashSet<u64>> {
        Ok(scan::<Appointment>(&self.appointments)?
            .into_iter()
            .filter(|a| {
                a.doctor_id == doctor_id && a.appointment_date == date && a.status.is_active()
            })
            .map(|a| a.time_slot_id)
            .collect())
    }

    /// Applies slot/date/status changes, moving the booking index entries
    /// with the row. Returns the pre-update row alongside the result so
    /// callers can detect what actually changed.
    pub fn update_appointment(
        &self,
        id: u64,
        time_slot_id: Option<u64>,
        appointment_date: Option<NaiveDate>,
        status: Option<AppointmentStatus>,
    ) -> StoreResult<(Appointment, Appointment)> {
        let old = self.appointment(id)?;
        let mut updated = old.clone();
        if let Some(slot_id) = time_slot_id {
            if read_opt::<models::clinic::TimeSlot>(&self.time_slots, slot_id)?.is_none() {
                return Err(StoreError::Reference("time slot".to_string()));
            }
            updated.time_slot_id = slot_id;
        }
        if let Some(date) = appointment_date {
            updated.appointment_date = date;
        }
        if let Some(status) = status {
            updated.status = status;
        }
        updated.updated_at = Utc::now();

        self.move_booking_index(&old, &updated)?;
        put(&self.appointments, id, &updated)?;
        Ok((old, updated))
    }

    pub fn delete_appointment(&self, id: u64) -> StoreResult<()> {
        let appointment = self.appointment(id)?;

        if appointment.status.is_active() {
            self.release_booking_keys(&appointment)?;
        }

        // Cascades: payments and feedback go with the appointment, medical
        // records keep the row but lose the reference.
        for payment in self.payments_for_appointment(id)? {
            self.payments.remove(super::id_key(payment.id))?;
        }
        if let Some(feedback_id) = index_holder(&self.idx_feedback_appointment, &super::id_key(id))? {
            self.feedback.remove(super::id_key(feedback_id))?;
            self.idx_feedback_appointment.remove(super::id_key(id))?;
        }
        for mut record in self.medical_records()? {
            if record.appointment_id == Some(id) {
                record.appointment_id = None;
                record.updated_at = Utc::now();
                put(&self.medical_records, record.id, &record)?;
            }
        }

        self.appointments.remove(super::id_key(id))?;
        Ok(())
    }

    fn release_booking_keys(&self, appointment: &Appointment) -> StoreResult<()> {
        release_unique(
            &self.idx_doctor_bookings,
            &booking_key(
                appointment.doctor_id,
                appointment.time_slot_id,
                appointment.appointment_date,
            ),
            appointment.id,
        )?;
        release_unique(
            &self.idx_patient_bookings,
            &booking_key(
                appointment.patient_id,
                appointment.time_slot_id,
                appointment.appointment_date,
            ),
            appointment.id,
        )
    }

    /// Moves the uniqueness reservations from the old row state to the new
    /// one. Claims before it releases, so a conflicting holder is detected
    /// without ever dropping a reservation the row still needs. Covers
    /// reschedules, cancellation (keys released) and un-cancellation (keys
    /// re-claimed, which can legitimately fail with a conflict).
    fn move_booking_index(&self, old: &Appointment, new: &Appointment) -> StoreResult<()> {
        let id = old.id;
        let old_dk = booking_key(old.doctor_id, old.time_slot_id, old.appointment_date);
        let old_pk = booking_key(old.patient_id, old.time_slot_id, old.appointment_date);
        let new_dk = booking_key(new.doctor_id, new.time_slot_id, new.appointment_date);
        let new_pk = booking_key(new.patient_id, new.time_slot_id, new.appointment_date);

        if new.status.is_active() {
            reserve_unique(&self.idx_doctor_bookings, &new_dk, id, DOCTOR_BOOKED)?;
            if let Err(e) = reserve_unique(&self.idx_patient_bookings, &new_pk, id, PATIENT_BOOKED)
            {
                // Only drop the doctor key if it was freshly claimed here.
                if !(old.status.is_active() && new_dk == old_dk) {
                    release_unique(&self.idx_doctor_bookings, &new_dk, id)?;
                }
                return Err(e);
            }
        }

        if old.status.is_active() {
            if !(new.status.is_active() && new_dk == old_dk) {
                release_unique(&self.idx_doctor_bookings, &old_dk, id)?;
            }
            if !(new.status.is_active() && new_pk == old_pk) {
                release_unique(&self.idx_patient_bookings, &old_pk, id)?;
            }
        }
        Ok(())
    }
}
