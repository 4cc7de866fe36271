// models/src/clinic/payment.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentType {
    InitialConsultation,
    Followup,
    Test,
    Prescription,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPayment {
    pub appointment_id: u64,
    pub patient_id: Option<u64>, // ignored for patient callers, required for admin
    pub amount: f64,
    pub payment_type: PaymentType,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: u64,
    pub patient_id: u64, // derived from the appointment, never from the body
    pub appointment_id: u64,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_type: PaymentType,
    pub note: String,
    pub transaction_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    pub fn from_new(id: u64, patient_id: u64, new: NewPayment) -> Self {
        let now = Utc::now();
        Payment {
            id,
            patient_id,
            appointment_id: new.appointment_id,
            amount: new.amount,
            status: PaymentStatus::Pending,
            payment_type: new.payment_type,
            note: new.note.unwrap_or_else(|| "Initial payment".to_string()),
            transaction_ref: None,
            created_at: now,
            updated_at: now,
        }
    }
}
