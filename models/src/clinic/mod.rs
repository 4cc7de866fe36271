// models/src/clinic/mod.rs

pub mod admin;
pub mod appointment;
pub mod doctor;
pub mod eye_test;
pub mod feedback;
pub mod medical_record;
pub mod medication;
pub mod notification;
pub mod patient;
pub mod payment;
pub mod prescription_item;
pub mod time_slot;

pub use admin::{Admin, NewAdmin};
pub use appointment::{Appointment, AppointmentStatus, NewAppointment};
pub use doctor::{Doctor, NewDoctor};
pub use eye_test::{EyeTest, EyeTestType, NewEyeTest};
pub use feedback::{Feedback, NewFeedback};
pub use medical_record::{MedicalRecord, NewMedicalRecord, RecordType};
pub use medication::{Medication, NewMedication};
pub use notification::{NewNotification, Notification, NotificationKind};
pub use patient::{NewPatient, Patient};
pub use payment::{NewPayment, Payment, PaymentStatus, PaymentType};
pub use prescription_item::{NewPrescriptionItem, PrescriptionItem};
pub use time_slot::{NewTimeSlot, TimeSlot};
