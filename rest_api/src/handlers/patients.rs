// rest_api/src/handlers/patients.rs
//
// Patient rows are admin-managed; a patient can read and update their own
// row and read their own sub-resources.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::{NewPatient, Patient};
use security::Role;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct UpdatePatient {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewPatient>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_admin()?;
    let patient = state.store.create_patient(body)?;
    Ok(created("Patient created successfully", patient.public()))
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let patients: Vec<Value> = state.store.patients()?.iter().map(Patient::public).collect();
    Ok(ok(patients))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(id, "view this patient")?;
    let patient = state.store.patient(id)?;
    Ok(ok(patient.public()))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdatePatient>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(id, "update this patient")?;
    let patient = state.store.update_patient(
        id,
        body.name,
        body.phone,
        body.password,
        body.gender,
        body.date_of_birth,
    )?;
    Ok(ok_message("Patient updated successfully", patient.public()))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    state.store.delete_patient(id)?;
    Ok(ok_message("Patient deleted successfully", json!(null)))
}

/// Counts over the caller's own rows; the patient-facing dashboard.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;
    let appointments = state.store.appointments_for_patient(ctx.id)?;
    let upcoming = appointments
        .iter()
        .filter(|a| a.status.is_active())
        .count();
    let stats = json!({
        "total_appointments": appointments.len(),
        "upcoming_appointments": upcoming,
        "medical_records": state.store.medical_records_for_patient(ctx.id)?.len(),
        "payments": state.store.payments_for_patient(ctx.id)?.len(),
        "eye_tests": state.store.eye_tests_for_patient(ctx.id)?.len(),
        "unread_notifications": state.store.unread_notifications_for_patient(ctx.id)?.len(),
    });
    Ok(ok(stats))
}

pub async fn appointments(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(id, "view these appointments")?;
    Ok(ok(state.store.appointments_for_patient(id)?))
}

pub async fn medical_records(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(id, "view these medical records")?;
    Ok(ok(state.store.medical_records_for_patient(id)?))
}

pub async fn payments(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(id, "view these payments")?;
    Ok(ok(state.store.payments_for_patient(id)?))
}

pub async fn eye_tests(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(id, "view these eye tests")?;
    Ok(ok(state.store.eye_tests_for_patient(id)?))
}
