// models/src/clinic/eye_test.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeTestType {
    ColorBlindness,
    VisualAcuity,
    ContrastSensitivity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEyeTest {
    pub patient_id: u64,
    pub test_type: EyeTestType,
    pub result: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EyeTest {
    pub id: u64,
    pub patient_id: u64,
    pub test_type: EyeTestType,
    pub result: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EyeTest {
    pub fn from_new(id: u64, new: NewEyeTest) -> Self {
        let now = Utc::now();
        EyeTest {
            id,
            patient_id: new.patient_id,
            test_type: new.test_type,
            result: new.result,
            created_at: now,
            updated_at: now,
        }
    }
}
