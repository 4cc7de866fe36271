// storage/src/store/medications.rs

use chrono::Utc;
use models::clinic::{Medication, NewMedication};

use super::{ClinicStore, fetch, put, scan};
use crate::errors::StoreResult;

impl ClinicStore {
    pub fn create_medication(&self, new: NewMedication) -> StoreResult<Medication> {
        let id = self.next_id()?;
        let medication = Medication::from_new(id, new);
        put(&self.medications, id, &medication)?;
        Ok(medication)
    }

    pub fn medication(&self, id: u64) -> StoreResult<Medication> {
        fetch(&self.medications, id, "Medication")
    }

    pub fn medications(&self) -> StoreResult<Vec<Medication>> {
        let mut list: Vec<Medication> = scan(&self.medications)?;
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }

    pub fn update_medication(
        &self,
        id: u64,
        name: Option<String>,
        description: Option<String>,
    ) -> StoreResult<Medication> {
        let mut medication = self.medication(id)?;
        if let Some(name) = name {
            medication.name = name;
        }
        if let Some(description) = description {
            medication.description = Some(description);
        }
        medication.updated_at = Utc::now();
        put(&self.medications, id, &medication)?;
        Ok(medication)
    }

    pub fn delete_medication(&self, id: u64) -> StoreResult<()> {
        let _ = self.medication(id)?;
        self.medications.remove(super::id_key(id))?;
        Ok(())
    }
}
