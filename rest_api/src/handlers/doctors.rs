// rest_api/src/handlers/doctors.rs

use std::collections::BTreeSet;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::{Doctor, NewDoctor, Patient};
use security::Role;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct UpdateDoctor {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub specialization: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewDoctor>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_admin()?;
    let doctor = state.store.create_doctor(body)?;
    Ok(created("Doctor created successfully", doctor.public()))
}

/// Doctor listing is open to every authenticated caller; patients browse
/// it when booking.
pub async fn list(State(state): State<AppState>, Auth(_ctx): Auth) -> ApiResult<Json<Value>> {
    let doctors: Vec<Value> = state.store.doctors()?.iter().map(Doctor::public).collect();
    Ok(ok(doctors))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(_ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let doctor = state.store.doctor(id)?;
    Ok(ok(doctor.public()))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdateDoctor>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_doctor_owns(id, "update this doctor")?;
    let doctor = state.store.update_doctor(
        id,
        body.name,
        body.email,
        body.password,
        body.specialization,
        body.phone,
        body.address,
    )?;
    Ok(ok_message("Doctor updated successfully", doctor.public()))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    state.store.delete_doctor(id)?;
    Ok(ok_message("Doctor deleted successfully", json!(null)))
}

pub async fn dashboard_stats(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Doctor])?;
    let appointments = state.store.appointments_for_doctor(ctx.id)?;
    let active = appointments.iter().filter(|a| a.status.is_active()).count();
    let patients: BTreeSet<u64> = appointments.iter().map(|a| a.patient_id).collect();
    let stats = json!({
        "total_appointments": appointments.len(),
        "active_appointments": active,
        "patients": patients.len(),
        "time_slots": state.store.time_slots_for_doctor(ctx.id)?.len(),
        "medical_records": state.store.medical_records_for_doctor(ctx.id)?.len(),
    });
    Ok(ok(stats))
}

pub async fn appointments(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_doctor_owns(id, "view these appointments")?;
    Ok(ok(state.store.appointments_for_doctor(id)?))
}

/// Distinct patients who have appointments with this doctor.
pub async fn patients(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_doctor_owns(id, "view these patients")?;
    let ids: BTreeSet<u64> = state
        .store
        .appointments_for_doctor(id)?
        .iter()
        .map(|a| a.patient_id)
        .collect();
    let mut out = Vec::with_capacity(ids.len());
    for patient_id in ids {
        if let Ok(patient) = state.store.patient(patient_id) {
            out.push(Patient::public(&patient));
        }
    }
    Ok(ok(out))
}

pub async fn medical_records(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_doctor_owns(id, "view these medical records")?;
    Ok(ok(state.store.medical_records_for_doctor(id)?))
}
