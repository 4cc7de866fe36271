// models/src/clinic/medical_record.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordType {
    Diagnosis,
    Prescription,
    TestResult,
    ExternalUpload,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordType::Diagnosis => "diagnosis",
            RecordType::Prescription => "prescription",
            RecordType::TestResult => "test_result",
            RecordType::ExternalUpload => "external_upload",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMedicalRecord {
    pub patient_id: u64,
    pub doctor_id: Option<u64>, // ignored for doctor callers, required for admin
    pub appointment_id: Option<u64>,
    pub record_type: RecordType,
    pub description: Option<String>,
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecord {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    // Nulled when the referenced appointment is deleted.
    pub appointment_id: Option<u64>,
    pub record_type: RecordType,
    pub description: Option<String>,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MedicalRecord {
    pub fn from_new(id: u64, doctor_id: u64, new: NewMedicalRecord) -> Self {
        let now = Utc::now();
        MedicalRecord {
            id,
            patient_id: new.patient_id,
            doctor_id,
            appointment_id: new.appointment_id,
            record_type: new.record_type,
            description: new.description,
            file_url: new.file_url,
            created_at: now,
            updated_at: now,
        }
    }
}
