// models/src/clinic/prescription_item.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrescriptionItem {
    pub medication_id: u64,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

// Owned by a prescription-type MedicalRecord; the whole set is replaced
// (delete-all-then-recreate) when the record is updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionItem {
    pub id: u64,
    pub medical_record_id: u64,
    pub medication_id: u64,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PrescriptionItem {
    pub fn from_new(id: u64, medical_record_id: u64, new: NewPrescriptionItem) -> Self {
        let now = Utc::now();
        PrescriptionItem {
            id,
            medical_record_id,
            medication_id: new.medication_id,
            dosage: new.dosage,
            frequency: new.frequency,
            duration: new.duration,
            instructions: new.instructions,
            created_at: now,
            updated_at: now,
        }
    }
}
