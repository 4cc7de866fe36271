// models/src/clinic/patient.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ClinicResult;

// Registration DTO. Temporarily holds the plaintext password for hashing;
// the stored Patient only ever carries the bcrypt hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatient {
    pub name: String,
    pub phone: String,
    pub password: String,
    pub gender: Option<String>, // "male" | "female"
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: u64,
    pub name: String,
    pub phone: String, // unique; identity for patient login
    pub password_hash: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn hash_password(password: &str) -> ClinicResult<String> {
        Ok(bcrypt::hash(password, bcrypt::DEFAULT_COST)?)
    }

    pub fn verify_password(password: &str, hash: &str) -> ClinicResult<bool> {
        Ok(bcrypt::verify(password, hash)?)
    }

    /// Builds a storable `Patient` from the registration DTO, hashing the
    /// password. The id is assigned by the store.
    pub fn from_new(id: u64, new: NewPatient) -> ClinicResult<Self> {
        let now = Utc::now();
        Ok(Patient {
            id,
            name: new.name,
            phone: new.phone,
            password_hash: Self::hash_password(&new.password)?,
            gender: new.gender,
            date_of_birth: new.date_of_birth,
            created_at: now,
            updated_at: now,
        })
    }

    /// JSON view with the password hash stripped. The hash is what the
    /// store keeps, never what the API returns.
    pub fn public(&self) -> serde_json::Value {
        let mut v = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = v.as_object_mut() {
            obj.remove("password_hash");
        }
        v
    }
}
