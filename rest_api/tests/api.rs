// rest_api/tests/api.rs
//
// End-to-end exercises against the in-process router with a temporary
// store and the mock payment gateway.

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use models::calendar::DayOfWeek;
use models::clinic::{NewAdmin, NewDoctor, NewPatient, NewTimeSlot};
use rest_api::gateway::MockGateway;
use rest_api::{AppState, app};
use security::{Role, issue_token};
use storage::ClinicStore;

const SECRET: &[u8] = b"integration-test-secret-32-bytes-long!!!";

struct TestApp {
    router: Router,
    store: Arc<ClinicStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(ClinicStore::temporary().unwrap());
        let state = AppState::new(
            Arc::clone(&store),
            Arc::new(MockGateway),
            SECRET.to_vec(),
            24,
            PathBuf::from("test_uploads"),
        );
        TestApp {
            router: app(state),
            store,
        }
    }

    fn token(&self, role: Role, id: u64) -> String {
        issue_token(SECRET, id, role, 24).unwrap()
    }

    async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            json!(null)
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}

fn seed_doctor(store: &ClinicStore) -> u64 {
    store
        .create_doctor(NewDoctor {
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

fn seed_patient(store: &ClinicStore, phone: &str) -> u64 {
    store
        .create_patient(NewPatient {
            name: "Hodan".to_string(),
            phone: phone.to_string(),
            password: "secret123".to_string(),
            gender: None,
            date_of_birth: None,
        })
        .unwrap()
        .id
}

fn seed_monday_slot(store: &ClinicStore, doctor_id: u64, hour: u32) -> u64 {
    store
        .create_time_slot(NewTimeSlot {
            doctor_id,
            day_of_week: DayOfWeek::Monday,
            start_time: chrono::NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            end_time: chrono::NaiveTime::from_hms_opt(hour + 1, 0, 0).unwrap(),
        })
        .unwrap()
        .id
}

// A Monday far enough in the future that the same-day rule never fires.
const MONDAY: &str = "2031-03-17";

#[tokio::test]
async fn requests_without_token_are_rejected() {
    let app = TestApp::new();
    let (status, body) = app.request("GET", "/api/v1/patients", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn patient_login_round_trip() {
    let app = TestApp::new();
    seed_patient(&app.store, "615000001");

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/auth/patient/login",
            None,
            Some(json!({"phone": "615000001", "password": "secret123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["patient"]["role"], json!("patient"));

    // The issued token works against a protected route.
    let (status, body) = app
        .request("GET", "/api/v1/patients/dashboard/stats", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_appointments"], json!(0));

    // Wrong password is a 401, unknown phone a 404.
    let (status, _) = app
        .request(
            "POST",
            "/api/v1/auth/patient/login",
            None,
            Some(json!({"phone": "615000001", "password": "wrong"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .request(
            "POST",
            "/api/v1/auth/patient/login",
            None,
            Some(json!({"phone": "000", "password": "secret123"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_flow_with_conflicts() {
    let app = TestApp::new();
    let doctor = seed_doctor(&app.store);
    let slot = seed_monday_slot(&app.store, doctor, 9);
    let p1 = seed_patient(&app.store, "615000001");
    let p2 = seed_patient(&app.store, "615000002");
    let t1 = app.token(Role::Patient, p1);
    let t2 = app.token(Role::Patient, p2);

    let booking = |slot_id: u64| {
        json!({
            "doctor_id": doctor,
            "time_slot_id": slot_id,
            "appointment_date": MONDAY,
        })
    };

    let (status, body) = app
        .request("POST", "/api/v1/appointments", Some(&t1), Some(booking(slot)))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["patient_id"], json!(p1));
    assert_eq!(body["data"]["status"], json!("scheduled"));

    // Booking created a notification for the patient.
    assert_eq!(
        app.store.notifications_for_patient(p1).unwrap().len(),
        1
    );

    // Same slot, same date, another patient: conflict.
    let (status, body) = app
        .request("POST", "/api/v1/appointments", Some(&t2), Some(booking(slot)))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], json!("This time slot is already booked"));

    // Wrong weekday: validation error naming the expected day.
    let (status, body) = app
        .request(
            "POST",
            "/api/v1/appointments",
            Some(&t2),
            Some(json!({
                "doctor_id": doctor,
                "time_slot_id": slot,
                "appointment_date": "2031-03-18",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Appointment date must be on a Monday"));
}

#[tokio::test]
async fn availability_reflects_bookings() {
    let app = TestApp::new();
    let doctor = seed_doctor(&app.store);
    let s9 = seed_monday_slot(&app.store, doctor, 9);
    let s11 = seed_monday_slot(&app.store, doctor, 11);
    let patient = seed_patient(&app.store, "615000001");
    let token = app.token(Role::Patient, patient);

    let uri = format!("/api/v1/time-slots/available/{doctor}/{MONDAY}");
    let (status, body) = app.request("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    app.request(
        "POST",
        "/api/v1/appointments",
        Some(&token),
        Some(json!({
            "doctor_id": doctor,
            "time_slot_id": s9,
            "appointment_date": MONDAY,
        })),
    )
    .await;

    let (status, body) = app.request("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let free: Vec<u64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_u64().unwrap())
        .collect();
    assert_eq!(free, vec![s11]);

    // Book the remaining slot too: the day is full, but slots are defined,
    // so the answer is an empty list rather than a 404.
    let other = seed_patient(&app.store, "615000002");
    let other_token = app.token(Role::Patient, other);
    app.request(
        "POST",
        "/api/v1/appointments",
        Some(&other_token),
        Some(json!({
            "doctor_id": doctor,
            "time_slot_id": s11,
            "appointment_date": MONDAY,
        })),
    )
    .await;
    let (status, body) = app.request("GET", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());

    // A day with no slots defined: 404 naming the weekday.
    let (status, body) = app
        .request(
            "GET",
            &format!("/api/v1/time-slots/available/{doctor}/2031-03-18"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("No time slots available for Tuesday"));
}

#[tokio::test]
async fn status_change_is_doctor_gated_and_notifies() {
    let app = TestApp::new();
    let doctor = seed_doctor(&app.store);
    let slot = seed_monday_slot(&app.store, doctor, 9);
    let patient = seed_patient(&app.store, "615000001");
    let patient_token = app.token(Role::Patient, patient);
    let doctor_token = app.token(Role::Doctor, doctor);

    let (_, body) = app
        .request(
            "POST",
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({
                "doctor_id": doctor,
                "time_slot_id": slot,
                "appointment_date": MONDAY,
            })),
        )
        .await;
    let appointment_id = body["data"]["id"].as_u64().unwrap();

    // Patients cannot change status.
    let (status, _) = app
        .request(
            "PATCH",
            &format!("/api/v1/appointments/{appointment_id}/status"),
            Some(&patient_token),
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let before = app.store.notifications_for_patient(patient).unwrap().len();
    let (status, body) = app
        .request(
            "PATCH",
            &format!("/api/v1/appointments/{appointment_id}/status"),
            Some(&doctor_token),
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("completed"));
    assert_eq!(
        app.store.notifications_for_patient(patient).unwrap().len(),
        before + 1
    );
}

#[tokio::test]
async fn payment_process_flow() {
    let app = TestApp::new();
    let doctor = seed_doctor(&app.store);
    let slot = seed_monday_slot(&app.store, doctor, 9);
    let patient = seed_patient(&app.store, "615000001");
    let token = app.token(Role::Patient, patient);

    let (_, body) = app
        .request(
            "POST",
            "/api/v1/appointments",
            Some(&token),
            Some(json!({
                "doctor_id": doctor,
                "time_slot_id": slot,
                "appointment_date": MONDAY,
            })),
        )
        .await;
    let appointment_id = body["data"]["id"].as_u64().unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/payments",
            Some(&token),
            Some(json!({
                "appointment_id": appointment_id,
                "amount": 25.0,
                "payment_type": "initial_consultation",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let payment_id = body["data"]["id"].as_u64().unwrap();
    assert_eq!(body["data"]["status"], json!("pending"));

    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/payments/{payment_id}/process"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("paid"));
    assert_eq!(
        body["data"]["transaction_ref"],
        json!(format!("MOCK-{payment_id}"))
    );

    // A paid payment cannot be processed again.
    let (status, body) = app
        .request(
            "POST",
            &format!("/api/v1/payments/{payment_id}/process"),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        json!("Payment not found or already processed")
    );
}

#[tokio::test]
async fn admin_login_by_wallet() {
    let app = TestApp::new();
    app.store
        .create_admin(NewAdmin {
            name: Some("Root".to_string()),
            wallet_address: "0xabc123".to_string(),
        })
        .unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/api/v1/auth/admin/login",
            None,
            Some(json!({"wallet_address": "0xabc123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["admin"]["role"], json!("admin"));

    let (status, _) = app
        .request(
            "POST",
            "/api/v1/auth/admin/login",
            None,
            Some(json!({"wallet_address": "0xother"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn feedback_requires_completed_appointment() {
    let app = TestApp::new();
    let doctor = seed_doctor(&app.store);
    let slot = seed_monday_slot(&app.store, doctor, 9);
    let patient = seed_patient(&app.store, "615000001");
    let patient_token = app.token(Role::Patient, patient);
    let doctor_token = app.token(Role::Doctor, doctor);

    let (_, body) = app
        .request(
            "POST",
            "/api/v1/appointments",
            Some(&patient_token),
            Some(json!({
                "doctor_id": doctor,
                "time_slot_id": slot,
                "appointment_date": MONDAY,
            })),
        )
        .await;
    let appointment_id = body["data"]["id"].as_u64().unwrap();

    let feedback = json!({"appointment_id": appointment_id, "rating": 5});
    let (status, body) = app
        .request("POST", "/api/v1/feedback", Some(&patient_token), Some(feedback.clone()))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        json!("You can only leave feedback for completed appointments")
    );

    app.request(
        "PATCH",
        &format!("/api/v1/appointments/{appointment_id}/status"),
        Some(&doctor_token),
        Some(json!({"status": "completed"})),
    )
    .await;

    let (status, _) = app
        .request("POST", "/api/v1/feedback", Some(&patient_token), Some(feedback.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Second feedback for the same appointment is a conflict.
    let (status, body) = app
        .request("POST", "/api/v1/feedback", Some(&patient_token), Some(feedback))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["message"],
        json!("Feedback already exists for this appointment")
    );
}
