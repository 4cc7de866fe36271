// storage/src/store/doctors.rs

use chrono::Utc;
use models::clinic::{Doctor, NewDoctor, Patient};

use super::{ClinicStore, fetch, put, read_opt, release_unique, reserve_unique, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    pub fn create_doctor(&self, new: NewDoctor) -> StoreResult<Doctor> {
        let id = self.next_id()?;
        reserve_unique(
            &self.idx_doctor_email,
            new.email.as_bytes(),
            id,
            "Doctor with this email already exists",
        )?;
        let doctor = Doctor::from_new(id, new)
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        put(&self.doctors, id, &doctor)?;
        Ok(doctor)
    }

    pub fn doctor(&self, id: u64) -> StoreResult<Doctor> {
        fetch(&self.doctors, id, "Doctor")
    }

    pub fn doctor_by_email(&self, email: &str) -> StoreResult<Option<Doctor>> {
        match super::index_holder(&self.idx_doctor_email, email.as_bytes())? {
            Some(id) => read_opt(&self.doctors, id),
            None => Ok(None),
        }
    }

    pub fn doctors(&self) -> StoreResult<Vec<Doctor>> {
        scan(&self.doctors)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn update_doctor(
        &self,
        id: u64,
        name: Option<String>,
        email: Option<String>,
        password: Option<String>,
        specialization: Option<String>,
        phone: Option<String>,
        address: Option<String>,
    ) -> StoreResult<Doctor> {
        let mut doctor = self.doctor(id)?;
        if let Some(email) = email {
            if email != doctor.email {
                reserve_unique(
                    &self.idx_doctor_email,
                    email.as_bytes(),
                    id,
                    "Doctor with this email already exists",
                )?;
                release_unique(&self.idx_doctor_email, doctor.email.as_bytes(), id)?;
                doctor.email = email;
            }
        }
        if let Some(name) = name {
            doctor.name = name;
        }
        if let Some(password) = password {
            doctor.password_hash = Patient::hash_password(&password)
                .map_err(|e| StoreError::Invalid(e.to_string()))?;
        }
        if let Some(specialization) = specialization {
            doctor.specialization = specialization;
        }
        if let Some(phone) = phone {
            doctor.phone = Some(phone);
        }
        if let Some(address) = address {
            doctor.address = Some(address);
        }
        doctor.updated_at = Utc::now();
        put(&self.doctors, id, &doctor)?;
        Ok(doctor)
    }

    /// Removes the doctor with their time slots, appointments, medical
    /// records and feedback.
    pub fn delete_doctor(&self, id: u64) -> StoreResult<()> {
        let doctor = self.doctor(id)?;

        for appointment in self.appointments_for_doctor(id)? {
            self.delete_appointment(appointment.id)?;
        }
        for slot in self.time_slots_for_doctor(id)? {
            self.time_slots.remove(super::id_key(slot.id))?;
        }
        for record in self.medical_records_for_doctor(id)? {
            self.delete_medical_record(record.id)?;
        }

        release_unique(&self.idx_doctor_email, doctor.email.as_bytes(), id)?;
        self.doctors.remove(super::id_key(id))?;
        tracing::debug!(doctor_id = id, "doctor deleted with dependents");
        Ok(())
    }
}
