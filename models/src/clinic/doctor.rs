// models/src/clinic/doctor.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clinic::patient::Patient;
use crate::errors::ClinicResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub name: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u64,
    pub name: String,
    pub email: String, // unique; identity for doctor login
    pub password_hash: String,
    pub specialization: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn from_new(id: u64, new: NewDoctor) -> ClinicResult<Self> {
        let now = Utc::now();
        Ok(Doctor {
            id,
            name: new.name,
            email: new.email,
            password_hash: Patient::hash_password(&new.password)?,
            specialization: new.specialization,
            phone: new.phone,
            address: new.address,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn public(&self) -> serde_json::Value {
        let mut v = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = v.as_object_mut() {
            obj.remove("password_hash");
        }
        v
    }
}
