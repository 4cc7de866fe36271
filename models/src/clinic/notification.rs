// models/src/clinic/notification.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Appointment,
    Medication,
    General,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub patient_id: u64,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: Option<bool>,
}

/// Purely informational; never participates in business invariants. A
/// failure to create one must not fail the triggering operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub patient_id: u64,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn from_new(id: u64, new: NewNotification) -> Self {
        let now = Utc::now();
        Notification {
            id,
            patient_id: new.patient_id,
            message: new.message,
            kind: new.kind,
            is_read: new.is_read.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }
}
