// notifications_service/src/lib.rs
//
// Notifications are informational side effects of clinical operations.
// Delivery is best-effort: a failed write is logged and swallowed, it
// never fails the operation that triggered it.

use std::sync::Arc;

use models::clinic::{NewNotification, Notification, NotificationKind};
use storage::ClinicStore;
use tracing::{debug, error};

#[derive(Clone)]
pub struct Notifier {
    store: Arc<ClinicStore>,
}

impl Notifier {
    pub fn new(store: Arc<ClinicStore>) -> Self {
        Notifier { store }
    }

    /// Persists a notification for the patient. Infallible by contract;
    /// storage errors are logged and dropped.
    pub fn notify(
        &self,
        patient_id: u64,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Option<Notification> {
        let message = message.into();
        match self.store.create_notification(NewNotification {
            patient_id,
            message,
            kind,
            is_read: None,
        }) {
            Ok(notification) => {
                debug!(patient_id, notification_id = notification.id, "notification created");
                Some(notification)
            }
            Err(e) => {
                error!(patient_id, error = %e, "failed to create notification");
                None
            }
        }
    }
}
