// models/src/clinic/feedback.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{ClinicError, ClinicResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub appointment_id: u64,
    pub rating: u8,
    pub comment: Option<String>,
}

/// One feedback per appointment, creatable only by the owning patient once
/// the appointment is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: u64,
    pub patient_id: u64,
    pub doctor_id: u64,
    pub appointment_id: u64,
    pub rating: u8, // 1..=5
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Feedback {
    pub fn from_new(
        id: u64,
        patient_id: u64,
        doctor_id: u64,
        new: NewFeedback,
    ) -> ClinicResult<Self> {
        if !(1..=5).contains(&new.rating) {
            return Err(ClinicError::Validation(
                "rating must be between 1 and 5".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Feedback {
            id,
            patient_id,
            doctor_id,
            appointment_id: new.appointment_id,
            rating: new.rating,
            comment: new.comment,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_bounds_enforced() {
        for rating in [0u8, 6] {
            let new = NewFeedback {
                appointment_id: 1,
                rating,
                comment: None,
            };
            assert!(Feedback::from_new(1, 1, 1, new).is_err());
        }
        let ok = NewFeedback {
            appointment_id: 1,
            rating: 5,
            comment: Some("great".to_string()),
        };
        assert!(Feedback::from_new(1, 1, 1, ok).is_ok());
    }
}
