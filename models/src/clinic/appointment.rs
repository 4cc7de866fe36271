// models/src/clinic/appointment.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Cancelled appointments release their slot; everything else holds it.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_id: u64,
    pub doctor_id: u64,
    pub time_slot_id: u64,
    pub appointment_date: NaiveDate,
    pub status: Option<AppointmentStatus>,
}

/// A patient's booking against one doctor's slot on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub time_slot_id: u64,
    pub appointment_date: NaiveDate,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn from_new(id: u64, new: NewAppointment) -> Self {
        let now = Utc::now();
        Appointment {
            id,
            patient_id: new.patient_id,
            doctor_id: new.doctor_id,
            time_slot_id: new.time_slot_id,
            appointment_date: new.appointment_date,
            status: new.status.unwrap_or(AppointmentStatus::Scheduled),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        let back: AppointmentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, AppointmentStatus::Cancelled);
    }

    #[test]
    fn only_cancelled_is_inactive() {
        assert!(AppointmentStatus::Scheduled.is_active());
        assert!(AppointmentStatus::Completed.is_active());
        assert!(!AppointmentStatus::Cancelled.is_active());
    }
}
