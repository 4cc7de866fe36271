// storage/src/store/medical_records.rs

use chrono::Utc;
use models::clinic::{
    MedicalRecord, NewMedicalRecord, NewPrescriptionItem, PrescriptionItem, RecordType,
};

use super::{ClinicStore, fetch, put, read_opt, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    pub fn create_medical_record(
        &self,
        doctor_id: u64,
        new: NewMedicalRecord,
        items: Vec<NewPrescriptionItem>,
    ) -> StoreResult<MedicalRecord> {
        if read_opt::<models::clinic::Patient>(&self.patients, new.patient_id)?.is_none() {
            return Err(StoreError::Reference("patient".to_string()));
        }
        if let Some(appointment_id) = new.appointment_id {
            if read_opt::<models::clinic::Appointment>(&self.appointments, appointment_id)?
                .is_none()
            {
                return Err(StoreError::Reference("appointment".to_string()));
            }
        }

        let id = self.next_id()?;
        let record = MedicalRecord::from_new(id, doctor_id, new);
        put(&self.medical_records, id, &record)?;

        if record.record_type == RecordType::Prescription {
            self.replace_prescription_items(id, items)?;
        }
        Ok(record)
    }

    pub fn medical_record(&self, id: u64) -> StoreResult<MedicalRecord> {
        fetch(&self.medical_records, id, "Medical record")
    }

    pub fn medical_records(&self) -> StoreResult<Vec<MedicalRecord>> {
        let mut list: Vec<MedicalRecord> = scan(&self.medical_records)?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn medical_records_for_patient(&self, patient_id: u64) -> StoreResult<Vec<MedicalRecord>> {
        Ok(self
            .medical_records()?
            .into_iter()
            .filter(|r| r.patient_id == patient_id)
            .collect())
    }

    pub fn medical_records_for_doctor(&self, doctor_id: u64) -> StoreResult<Vec<MedicalRecord>> {
        Ok(self
            .medical_records()?
            .into_iter()
            .filter(|r| r.doctor_id == doctor_id)
            .collect())
    }

    pub fn update_medical_record(
        &self,
        id: u64,
        record_type: Option<RecordType>,
        description: Option<String>,
        file_url: Option<String>,
        items: Option<Vec<NewPrescriptionItem>>,
    ) -> StoreResult<MedicalRecord> {
        let mut record = self.medical_record(id)?;
        if let Some(record_type) = record_type {
            record.record_type = record_type;
        }
        if let Some(description) = description {
            record.description = Some(description);
        }
        if let Some(file_url) = file_url {
            record.file_url = Some(file_url);
        }
        record.updated_at = Utc::now();
        put(&self.medical_records, id, &record)?;

        // Prescription items are fully replaced, never merged.
        if record.record_type == RecordType::Prescription {
            if let Some(items) = items {
                self.replace_prescription_items(id, items)?;
            }
        } else {
            self.replace_prescription_items(id, Vec::new())?;
        }
        Ok(record)
    }

    pub fn delete_medical_record(&self, id: u64) -> StoreResult<()> {
        let _ = self.medical_record(id)?;
        self.replace_prescription_items(id, Vec::new())?;
        self.medical_records.remove(super::id_key(id))?;
        Ok(())
    }

    pub fn prescription_items_for_record(
        &self,
        medical_record_id: u64,
    ) -> StoreResult<Vec<PrescriptionItem>> {
        let mut list: Vec<PrescriptionItem> = scan::<PrescriptionItem>(&self.prescription_items)?
            .into_iter()
            .filter(|i| i.medical_record_id == medical_record_id)
            .collect();
        list.sort_by_key(|i| i.id);
        Ok(list)
    }

    /// Delete-all-then-recreate. Items naming an unknown medication are
    /// skipped, as the original backend does.
    fn replace_prescription_items(
        &self,
        medical_record_id: u64,
        items: Vec<NewPrescriptionItem>,
    ) -> StoreResult<()> {
        for existing in self.prescription_items_for_record(medical_record_id)? {
            self.prescription_items.remove(super::id_key(existing.id))?;
        }
        for item in items {
            if read_opt::<models::clinic::Medication>(&self.medications, item.medication_id)?
                .is_none()
            {
                continue;
            }
            let id = self.next_id()?;
            let row = PrescriptionItem::from_new(id, medical_record_id, item);
            put(&self.prescription_items, id, &row)?;
        }
        Ok(())
    }
}
