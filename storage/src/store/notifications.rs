// storage/src/store/notifications.rs

use chrono::Utc;
use models::clinic::{NewNotification, Notification};

use super::{ClinicStore, fetch, put, read_opt, scan};
use crate::errors::{StoreError, StoreResult};

impl ClinicStore {
    pub fn create_notification(&self, new: NewNotification) -> StoreResult<Notification> {
        if read_opt::<models::clinic::Patient>(&self.patients, new.patient_id)?.is_none() {
            return Err(StoreError::Reference("patient".to_string()));
        }
        let id = self.next_id()?;
        let notification = Notification::from_new(id, new);
        put(&self.notifications, id, &notification)?;
        Ok(notification)
    }

    pub fn notification(&self, id: u64) -> StoreResult<Notification> {
        fetch(&self.notifications, id, "Notification")
    }

    pub fn notifications(&self) -> StoreResult<Vec<Notification>> {
        let mut list: Vec<Notification> = scan(&self.notifications)?;
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    pub fn notifications_for_patient(&self, patient_id: u64) -> StoreResult<Vec<Notification>> {
        Ok(self
            .notifications()?
            .into_iter()
            .filter(|n| n.patient_id == patient_id)
            .collect())
    }

    pub fn unread_notifications_for_patient(
        &self,
        patient_id: u64,
    ) -> StoreResult<Vec<Notification>> {
        Ok(self
            .notifications_for_patient(patient_id)?
            .into_iter()
            .filter(|n| !n.is_read)
            .collect())
    }

    pub fn mark_notification_read(&self, id: u64) -> StoreResult<Notification> {
        let mut notification = self.notification(id)?;
        notification.is_read = true;
        notification.updated_at = Utc::now();
        put(&self.notifications, id, &notification)?;
        Ok(notification)
    }

    /// Marks every unread notification for the patient; returns how many
    /// rows changed.
    pub fn mark_all_notifications_read(&self, patient_id: u64) -> StoreResult<usize> {
        let unread = self.unread_notifications_for_patient(patient_id)?;
        let count = unread.len();
        for mut notification in unread {
            notification.is_read = true;
            notification.updated_at = Utc::now();
            put(&self.notifications, notification.id, &notification)?;
        }
        Ok(count)
    }

    pub fn delete_notification(&self, id: u64) -> StoreResult<()> {
        let _ = self.notification(id)?;
        self.notifications.remove(super::id_key(id))?;
        Ok(())
    }
}
