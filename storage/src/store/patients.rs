// storage/src/store/patients.rs

use chrono::{NaiveDate, Utc};
use models::clinic::{NewPatient, Patient};

use super::{ClinicStore, fetch, put, read_opt, release_unique, reserve_unique, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    pub fn create_patient(&self, new: NewPatient) -> StoreResult<Patient> {
        let id = self.next_id()?;
        reserve_unique(
            &self.idx_patient_phone,
            new.phone.as_bytes(),
            id,
            "Patient with this phone number already exists",
        )?;
        let patient = Patient::from_new(id, new)
            .map_err(|e| StoreError::Invalid(e.to_string()))?;
        put(&self.patients, id, &patient)?;
        Ok(patient)
    }

    pub fn patient(&self, id: u64) -> StoreResult<Patient> {
        fetch(&self.patients, id, "Patient")
    }

    pub fn patient_by_phone(&self, phone: &str) -> StoreResult<Option<Patient>> {
        match super::index_holder(&self.idx_patient_phone, phone.as_bytes())? {
            Some(id) => read_opt(&self.patients, id),
            None => Ok(None),
        }
    }

    pub fn patients(&self) -> StoreResult<Vec<Patient>> {
        scan(&self.patients)
    }

    pub fn update_patient(
        &self,
        id: u64,
        name: Option<String>,
        phone: Option<String>,
        password: Option<String>,
        gender: Option<String>,
        date_of_birth: Option<NaiveDate>,
    ) -> StoreResult<Patient> {
        let mut patient = self.patient(id)?;
        if let Some(phone) = phone {
            if phone != patient.phone {
                reserve_unique(
                    &self.idx_patient_phone,
                    phone.as_bytes(),
                    id,
                    "Patient with this phone number already exists",
                )?;
                release_unique(&self.idx_patient_phone, patient.phone.as_bytes(), id)?;
                patient.phone = phone;
            }
        }
        if let Some(name) = name {
            patient.name = name;
        }
        if let Some(password) = password {
            patient.password_hash = Patient::hash_password(&password)
                .map_err(|e| StoreError::Invalid(e.to_string()))?;
        }
        if let Some(gender) = gender {
            patient.gender = Some(gender);
        }
        if let Some(dob) = date_of_birth {
            patient.date_of_birth = Some(dob);
        }
        patient.updated_at = Utc::now();
        put(&self.patients, id, &patient)?;
        Ok(patient)
    }

    /// Removes the patient and everything hanging off them (appointments,
    /// payments, medical records, eye tests, feedback, notifications).
    pub fn delete_patient(&self, id: u64) -> StoreResult<()> {
        let patient = self.patient(id)?;

        for appointment in self.appointments_for_patient(id)? {
            self.delete_appointment(appointment.id)?;
        }
        for record in self.medical_records_for_patient(id)? {
            self.delete_medical_record(record.id)?;
        }
        for test in self.eye_tests_for_patient(id)? {
            self.eye_tests.remove(super::id_key(test.id))?;
        }
        for note in self.notifications_for_patient(id)? {
            self.notifications.remove(super::id_key(note.id))?;
        }

        release_unique(&self.idx_patient_phone, patient.phone.as_bytes(), id)?;
        self.patients.remove(super::id_key(id))?;
        tracing::debug!(patient_id = id, "patient deleted with dependents");
        Ok(())
    }
}
