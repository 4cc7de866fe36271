// storage/src/store/feedback.rs

use models::clinic::{Feedback, NewFeedback};

use super::{ClinicStore, fetch, id_key, put, reserve_unique, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    /// One feedback per appointment, enforced with a unique index keyed by
    /// appointment id. Business gating (completed status, patient
    /// ownership) happens in the handler before this is called.
    pub fn create_feedback(
        &self,
        patient_id: u64,
        doctor_id: u64,
        new: NewFeedback,
    ) -> StoreResult<Feedback> {
        let appointment_key = id_key(new.appointment_id);
        let id = self.next_id()?;
        reserve_unique(
            &self.idx_feedback_appointment,
            &appointment_key,
            id,
            "Feedback already exists for this appointment",
        )?;
        let feedback = match Feedback::from_new(id, patient_id, doctor_id, new) {
            Ok(f) => f,
            Err(e) => {
                self.idx_feedback_appointment.remove(appointment_key)?;
                return Err(StoreError::Invalid(e.to_string()));
            }
        };
        put(&self.feedback, id, &feedback)?;
        Ok(feedback)
    }

    pub fn feedback(&self, id: u64) -> StoreResult<Feedback> {
        fetch(&self.feedback, id, "Feedback")
    }

    pub fn feedbacks(&self) -> StoreResult<Vec<Feedback>> {
        let mut list: Vec<Feedback> = scan(&self.feedback)?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn feedback_for_doctor(&self, doctor_id: u64) -> StoreResult<Vec<Feedback>> {
        Ok(self
            .feedbacks()?
            .into_iter()
            .filter(|f| f.doctor_id == doctor_id)
            .collect())
    }

    pub fn update_feedback(
        &self,
        id: u64,
        rating: Option<u8>,
        comment: Option<String>,
    ) -> StoreResult<Feedback> {
        let mut feedback = self.feedback(id)?;
        if let Some(rating) = rating {
            if !(1..=5).contains(&rating) {
                return Err(StoreError::Invalid(
                    "rating must be between 1 and 5".to_string(),
                ));
            }
            feedback.rating = rating;
        }
        if let Some(comment) = comment {
            feedback.comment = Some(comment);
        }
        feedback.updated_at = chrono::Utc::now();
        put(&self.feedback, id, &feedback)?;
        Ok(feedback)
    }

    pub fn delete_feedback(&self, id: u64) -> StoreResult<()> {
        let feedback = self.feedback(id)?;
        self.idx_feedback_appointment
            .remove(id_key(feedback.appointment_id))?;
        self.feedback.remove(id_key(id))?;
        Ok(())
    }
}
