// scheduling/src/tests.rs

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use models::calendar::DayOfWeek;
use models::clinic::{AppointmentStatus, NewAppointment, NewDoctor, NewPatient, NewTimeSlot};
use notifications_service::Notifier;
use storage::ClinicStore;

use crate::availability::available_slots;
use crate::booking::{BookingError, BookingRequest, validate_booking};
use crate::status::{notify_appointment_change, notify_payment_change};

fn store() -> Arc<ClinicStore> {
    Arc::new(ClinicStore::temporary().unwrap())
}

fn seed_doctor(s: &ClinicStore) -> u64 {
    s.create_doctor(NewDoctor {
        name: "Dr. Ayan".to_string(),
        email: "ayan@clinic.so".to_string(),
        password: "secret123".to_string(),
        specialization: "Ophthalmology".to_string(),
        phone: None,
        address: None,
    })
    .unwrap()
    .id
}

fn seed_patient(s: &ClinicStore, phone: &str) -> u64 {
    s.create_patient(NewPatient {
        name: "Hodan".to_string(),
        phone: phone.to_string(),
        password: "secret123".to_string(),
        gender: None,
        date_of_birth: None,
    })
    .unwrap()
    .id
}

fn seed_slot(s: &ClinicStore, doctor_id: u64, start_hour: u32) -> u64 {
    s.create_time_slot(NewTimeSlot {
        doctor_id,
        day_of_week: DayOfWeek::Monday,
        start_time: NaiveTime::from_hms_opt(start_hour, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(start_hour + 1, 0, 0).unwrap(),
    })
    .unwrap()
    .id
}

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 18).unwrap()
}

// A fixed "now" well before any slot on the test Monday.
fn early_monday() -> NaiveDateTime {
    monday().and_hms_opt(6, 0, 0).unwrap()
}

fn request(patient: u64, doctor: u64, slot: u64, date: NaiveDate) -> BookingRequest {
    BookingRequest {
        patient_id: patient,
        doctor_id: doctor,
        time_slot_id: slot,
        appointment_date: date,
        exclude_appointment_id: None,
    }
}

#[test]
fn slot_must_belong_to_the_doctor() {
    let s = store();
    let d1 = seed_doctor(&s);
    let d2 = s
        .create_doctor(NewDoctor {
            name: "Dr. Omar".to_string(),
            email: "omar@clinic.so".to_string(),
            password: "secret123".to_string(),
            specialization: "General".to_string(),
            phone: None,
            address: None,
        })
        .unwrap()
        .id;
    let slot = seed_slot(&s, d1, 9);
    let patient = seed_patient(&s, "615000001");

    let err = validate_booking(&s, &request(patient, d2, slot, monday()), early_monday())
        .unwrap_err();
    assert!(matches!(err, BookingError::SlotMismatch));

    let err = validate_booking(&s, &request(patient, d1, 9999, monday()), early_monday())
        .unwrap_err();
    assert!(matches!(err, BookingError::SlotMismatch));
}

#[test]
fn date_must_fall_on_the_slots_weekday() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot = seed_slot(&s, doctor, 9);
    let patient = seed_patient(&s, "615000001");

    let tuesday = NaiveDate::from_ymd_opt(2024, 3, 19).unwrap();
    let err = validate_booking(&s, &request(patient, doctor, slot, tuesday), early_monday())
        .unwrap_err();
    match err {
        BookingError::WrongWeekday { expected } => assert_eq!(expected, DayOfWeek::Monday),
        other => panic!("expected weekday error, got {other:?}"),
    }
}

#[test]
fn same_day_slot_whose_end_passed_is_rejected() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot = seed_slot(&s, doctor, 9); // 09:00-10:00
    let patient = seed_patient(&s, "615000001");
    let req = request(patient, doctor, slot, monday());

    // One second past the end: too late.
    let past_end = monday().and_hms_opt(10, 0, 1).unwrap();
    assert!(matches!(
        validate_booking(&s, &req, past_end),
        Err(BookingError::SlotInPast)
    ));

    // At the end exactly it is still accepted.
    let at_end = monday().and_hms_opt(10, 0, 0).unwrap();
    validate_booking(&s, &req, at_end).unwrap();

    // The rule only applies to today: the same slot next week is fine
    // even late in the evening, and a back-dated booking is accepted.
    let late_evening = monday().and_hms_opt(22, 0, 0).unwrap();
    let next_monday = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
    validate_booking(&s, &request(patient, doctor, slot, next_monday), late_evening).unwrap();
    let last_monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    validate_booking(&s, &request(patient, doctor, slot, last_monday), late_evening).unwrap();
}

#[test]
fn in_progress_slot_is_still_bookable_today() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot = s
        .create_time_slot(NewTimeSlot {
            doctor_id: doctor,
            day_of_week: DayOfWeek::Monday,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        })
        .unwrap()
        .id;
    let patient = seed_patient(&s, "615000001");

    // 10:00 on the day itself: the slot has started but not ended.
    let mid_slot = monday().and_hms_opt(10, 0, 0).unwrap();
    validate_booking(&s, &request(patient, doctor, slot, monday()), mid_slot).unwrap();
}

#[test]
fn conflicts_surface_doctor_side_first() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot = seed_slot(&s, doctor, 9);
    let p1 = seed_patient(&s, "615000001");
    let p2 = seed_patient(&s, "615000002");

    s.create_appointment(NewAppointment {
        patient_id: p1,
        doctor_id: doctor,
        time_slot_id: slot,
        appointment_date: monday(),
        status: None,
    })
    .unwrap();

    // Another patient, same slot: doctor-side conflict.
    assert!(matches!(
        validate_booking(&s, &request(p2, doctor, slot, monday()), early_monday()),
        Err(BookingError::DoctorConflict)
    ));
    // Same patient again: still reported as the doctor's slot being taken.
    assert!(matches!(
        validate_booking(&s, &request(p1, doctor, slot, monday()), early_monday()),
        Err(BookingError::DoctorConflict)
    ));
}

#[test]
fn rescheduling_does_not_conflict_with_itself() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot = seed_slot(&s, doctor, 9);
    let patient = seed_patient(&s, "615000001");

    let a = s
        .create_appointment(NewAppointment {
            patient_id: patient,
            doctor_id: doctor,
            time_slot_id: slot,
            appointment_date: monday(),
            status: None,
        })
        .unwrap();

    let mut req = request(patient, doctor, slot, monday());
    req.exclude_appointment_id = Some(a.id);
    validate_booking(&s, &req, early_monday()).unwrap();
}

#[test]
fn cancelled_appointments_do_not_block_validation() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot = seed_slot(&s, doctor, 9);
    let p1 = seed_patient(&s, "615000001");
    let p2 = seed_patient(&s, "615000002");

    let a = s
        .create_appointment(NewAppointment {
            patient_id: p1,
            doctor_id: doctor,
            time_slot_id: slot,
            appointment_date: monday(),
            status: None,
        })
        .unwrap();
    s.update_appointment(a.id, None, None, Some(AppointmentStatus::Cancelled))
        .unwrap();

    validate_booking(&s, &request(p2, doctor, slot, monday()), early_monday()).unwrap();
}

#[test]
fn availability_is_defined_minus_booked() {
    let s = store();
    let doctor = seed_doctor(&s);
    let s9 = seed_slot(&s, doctor, 9);
    let s11 = seed_slot(&s, doctor, 11);
    let s14 = seed_slot(&s, doctor, 14);
    let patient = seed_patient(&s, "615000001");

    s.create_appointment(NewAppointment {
        patient_id: patient,
        doctor_id: doctor,
        time_slot_id: s11,
        appointment_date: monday(),
        status: None,
    })
    .unwrap();

    let free: Vec<u64> = available_slots(&s, doctor, monday())
        .unwrap()
        .into_iter()
        .map(|slot| slot.id)
        .collect();
    assert_eq!(free, vec![s9, s14]);

    // The booking is date-scoped: next Monday everything is free again.
    let next_monday = NaiveDate::from_ymd_opt(2024, 3, 25).unwrap();
    let free = available_slots(&s, doctor, next_monday).unwrap();
    assert_eq!(free.len(), 3);

    // A day with no slots defined resolves to empty, not an error.
    let tuesday = NaiveDate::from_ymd_opt(2024, 3, 19).unwrap();
    assert!(available_slots(&s, doctor, tuesday).unwrap().is_empty());
}

#[test]
fn status_change_emits_exactly_one_notification() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot = seed_slot(&s, doctor, 9);
    let patient = seed_patient(&s, "615000001");
    let notifier = Notifier::new(Arc::clone(&s));

    let a = s
        .create_appointment(NewAppointment {
            patient_id: patient,
            doctor_id: doctor,
            time_slot_id: slot,
            appointment_date: monday(),
            status: None,
        })
        .unwrap();

    let (old, updated) = s
        .update_appointment(a.id, None, None, Some(AppointmentStatus::Completed))
        .unwrap();
    notify_appointment_change(&notifier, &old, &updated);
    let notifications = s.notifications_for_patient(patient).unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].message.contains("marked as completed"));

    // Re-applying the same status emits nothing.
    let (old, updated) = s
        .update_appointment(a.id, None, None, Some(AppointmentStatus::Completed))
        .unwrap();
    notify_appointment_change(&notifier, &old, &updated);
    assert_eq!(s.notifications_for_patient(patient).unwrap().len(), 1);
}

#[test]
fn reschedule_emits_a_reschedule_notification() {
    let s = store();
    let doctor = seed_doctor(&s);
    let slot_a = seed_slot(&s, doctor, 9);
    let slot_b = seed_slot(&s, doctor, 11);
    let patient = seed_patient(&s, "615000001");
    let notifier = Notifier::new(Arc::clone(&s));

    let a = s
        .create_appointment(NewAppointment {
            patient_id: patient,
            doctor_id: doctor,
            time_slot_id: slot_a,
            appointment_date: monday(),
            status: None,
        })
        .unwrap();

    let (old, updated) = s.update_appointment(a.id, Some(slot_b), None, None).unwrap();
    notify_appointment_change(&notifier, &old, &updated);
    let notifications = s.notifications_for_patient(patient).unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].message.contains("rescheduled"));
}

#[test]
fn payment_status_notifications_follow_the_transition() {
    use models::clinic::{NewPayment, PaymentStatus, PaymentType};

    let s = store();
    let doctor = seed_doctor(&s);
    let slot = seed_slot(&s, doctor, 9);
    let patient = seed_patient(&s, "615000001");
    let notifier = Notifier::new(Arc::clone(&s));

    let a = s
        .create_appointment(NewAppointment {
            patient_id: patient,
            doctor_id: doctor,
            time_slot_id: slot,
            appointment_date: monday(),
            status: None,
        })
        .unwrap();
    let payment = s
        .create_payment(
            patient,
            NewPayment {
                appointment_id: a.id,
                patient_id: None,
                amount: 25.0,
                payment_type: PaymentType::InitialConsultation,
                note: None,
            },
        )
        .unwrap();

    let (old_status, paid) = s.set_payment_status(payment.id, PaymentStatus::Paid, None).unwrap();
    notify_payment_change(&notifier, old_status, &paid);
    let notifications = s.notifications_for_patient(patient).unwrap();
    assert_eq!(notifications.len(), 1);
    assert!(notifications[0].message.contains("has been confirmed"));

    // Unchanged status: no second notification.
    let (old_status, paid) = s.set_payment_status(payment.id, PaymentStatus::Paid, None).unwrap();
    notify_payment_change(&notifier, old_status, &paid);
    assert_eq!(s.notifications_for_patient(patient).unwrap().len(), 1);
}
