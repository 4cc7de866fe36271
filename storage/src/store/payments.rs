// storage/src/store/payments.rs

use chrono::Utc;
use models::clinic::{NewPayment, Payment, PaymentStatus, PaymentType};

use super::{ClinicStore, fetch, put, read_opt, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    /// `patient_id` is taken from the appointment, never from the request
    /// body; the caller resolves the appointment first.
    pub fn create_payment(&self, patient_id: u64, new: NewPayment) -> StoreResult<Payment> {
        if read_opt::<models::clinic::Appointment>(&self.appointments, new.appointment_id)?
            .is_none()
        {
            return Err(StoreError::Reference("appointment".to_string()));
        }
        if new.amount <= 0.0 {
            return Err(StoreError::Invalid("amount must be positive".to_string()));
        }
        let id = self.next_id()?;
        let payment = Payment::from_new(id, patient_id, new);
        put(&self.payments, id, &payment)?;
        Ok(payment)
    }

    pub fn payment(&self, id: u64) -> StoreResult<Payment> {
        fetch(&self.payments, id, "Payment")
    }

    pub fn payments(&self) -> StoreResult<Vec<Payment>> {
        let mut list: Vec<Payment> = scan(&self.payments)?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn payments_for_appointment(&self, appointment_id: u64) -> StoreResult<Vec<Payment>> {
        let mut list: Vec<Payment> = scan::<Payment>(&self.payments)?
            .into_iter()
            .filter(|p| p.appointment_id == appointment_id)
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn payments_for_patient(&self, patient_id: u64) -> StoreResult<Vec<Payment>> {
        let mut list: Vec<Payment> = scan::<Payment>(&self.payments)?
            .into_iter()
            .filter(|p| p.patient_id == patient_id)
            .collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn payments_with_status(&self, status: PaymentStatus) -> StoreResult<Vec<Payment>> {
        Ok(self
            .payments()?
            .into_iter()
            .filter(|p| p.status == status)
            .collect())
    }

    pub fn update_payment(
        &self,
        id: u64,
        amount: Option<f64>,
        status: Option<PaymentStatus>,
        payment_type: Option<PaymentType>,
        note: Option<String>,
    ) -> StoreResult<Payment> {
        let mut payment = self.payment(id)?;
        if let Some(amount) = amount {
            if amount <= 0.0 {
                return Err(StoreError::Invalid("amount must be positive".to_string()));
            }
            payment.amount = amount;
        }
        if let Some(status) = status {
            payment.status = status;
        }
        if let Some(payment_type) = payment_type {
            payment.payment_type = payment_type;
        }
        if let Some(note) = note {
            payment.note = note;
        }
        payment.updated_at = Utc::now();
        put(&self.payments, id, &payment)?;
        Ok(payment)
    }

    /// Status-only transition; returns the previous status so the caller
    /// can decide whether a notification is due.
    pub fn set_payment_status(
        &self,
        id: u64,
        status: PaymentStatus,
        transaction_ref: Option<String>,
    ) -> StoreResult<(PaymentStatus, Payment)> {
        let mut payment = self.payment(id)?;
        let old = payment.status;
        payment.status = status;
        if transaction_ref.is_some() {
            payment.transaction_ref = transaction_ref;
        }
        payment.updated_at = Utc::now();
        put(&self.payments, id, &payment)?;
        Ok((old, payment))
    }

    pub fn delete_payment(&self, id: u64) -> StoreResult<()> {
        let _ = self.payment(id)?;
        self.payments.remove(super::id_key(id))?;
        Ok(())
    }
}
