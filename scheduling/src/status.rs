// scheduling/src/status.rs
//
// Message synthesis for the notifications that status transitions emit.
// One transition, at most one notification; an unchanged status emits
// nothing.

use chrono::NaiveDate;
use models::clinic::{Appointment, AppointmentStatus, NotificationKind, Payment, PaymentStatus};
use notifications_service::Notifier;

pub fn appointment_booked_message(date: NaiveDate) -> String {
    format!(
        "Your appointment has been scheduled for {date}. Please arrive 10 minutes before your scheduled time."
    )
}

pub fn appointment_status_message(status: AppointmentStatus) -> String {
    match status {
        AppointmentStatus::Completed => {
            "Your appointment has been marked as completed. Thank you for visiting us!".to_string()
        }
        AppointmentStatus::Cancelled => {
            "Your appointment has been cancelled. Please contact us to reschedule if needed."
                .to_string()
        }
        AppointmentStatus::Scheduled => {
            format!("Your appointment status has been updated to {status}.")
        }
    }
}

pub fn appointment_rescheduled_message(date: NaiveDate) -> String {
    format!(
        "Your appointment has been rescheduled for {date}. Please check your updated appointment details."
    )
}

pub fn payment_status_message(status: PaymentStatus, amount: f64) -> String {
    match status {
        PaymentStatus::Paid => {
            format!("Your payment of ${amount} has been confirmed. Thank you!")
        }
        PaymentStatus::Failed => {
            format!("Your payment of ${amount} has failed. Please try again or contact support.")
        }
        PaymentStatus::Pending => {
            format!("Your payment status has been updated to {status}.")
        }
    }
}

pub fn payment_processed_message(amount: f64) -> String {
    format!(
        "Payment of ${amount} has been processed successfully. Your appointment is now confirmed."
    )
}

/// Tells the patient about a booking that was just created.
pub fn notify_appointment_booked(notifier: &Notifier, appointment: &Appointment) {
    notifier.notify(
        appointment.patient_id,
        NotificationKind::Appointment,
        appointment_booked_message(appointment.appointment_date),
    );
}

/// Compares the pre- and post-update rows and emits at most one
/// notification: a status message when the status changed, a reschedule
/// message when only the slot or date moved, nothing otherwise.
pub fn notify_appointment_change(notifier: &Notifier, old: &Appointment, new: &Appointment) {
    let message = if old.status != new.status {
        appointment_status_message(new.status)
    } else if old.time_slot_id != new.time_slot_id || old.appointment_date != new.appointment_date
    {
        appointment_rescheduled_message(new.appointment_date)
    } else {
        return;
    };
    notifier.notify(new.patient_id, NotificationKind::Appointment, message);
}

/// Emits a payment notification when the status actually changed.
pub fn notify_payment_change(notifier: &Notifier, old_status: PaymentStatus, payment: &Payment) {
    if old_status == payment.status {
        return;
    }
    notifier.notify(
        payment.patient_id,
        NotificationKind::General,
        payment_status_message(payment.status, payment.amount),
    );
}
