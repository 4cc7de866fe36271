// scheduling/src/lib.rs
//
// The booking pipeline: which slots a doctor still has free on a date,
// whether a requested booking is admissible, and which notification a
// status change produces. Validation here is advisory (readable errors
// before anything is written); the store's index trees remain the final
// arbiter under concurrency.

pub mod availability;
pub mod booking;
pub mod status;

#[cfg(test)]
mod tests;

pub use availability::available_slots;
pub use booking::{BookingError, BookingRequest, validate_booking};
pub use status::{
    appointment_booked_message, appointment_rescheduled_message, appointment_status_message,
    notify_appointment_booked, notify_appointment_change, notify_payment_change,
    payment_processed_message, payment_status_message,
};
