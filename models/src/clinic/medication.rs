// models/src/clinic/medication.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMedication {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Medication {
    pub fn from_new(id: u64, new: NewMedication) -> Self {
        let now = Utc::now();
        Medication {
            id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        }
    }
}
