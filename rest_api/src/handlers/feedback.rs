// rest_api/src/handlers/feedback.rs
//
// Feedback is gated twice: only the owning patient of a *completed*
// appointment may create it, and the store's unique index allows at most
// one row per appointment.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::{AppointmentStatus, NewFeedback};
use models::errors::ClinicError;
use security::Role;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct UpdateFeedback {
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewFeedback>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_role(&[Role::Patient])?;

    let appointment = state.store.appointment(body.appointment_id).map_err(|_| {
        ClinicError::NotFound(
            "Appointment not found or you don't have permission to leave feedback".to_string(),
        )
    })?;
    if appointment.patient_id != ctx.id {
        return Err(ClinicError::NotFound(
            "Appointment not found or you don't have permission to leave feedback".to_string(),
        )
        .into());
    }
    if appointment.status != AppointmentStatus::Completed {
        return Err(ClinicError::Validation(
            "You can only leave feedback for completed appointments".to_string(),
        )
        .into());
    }

    let feedback = state
        .store
        .create_feedback(ctx.id, appointment.doctor_id, body)?;
    Ok(created("Feedback created successfully", feedback))
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.feedbacks()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let feedback = state.store.feedback(id)?;
    if !ctx.can_access_row(feedback.patient_id, feedback.doctor_id) {
        return Err(ClinicError::forbidden("view this feedback").into());
    }
    Ok(ok(feedback))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdateFeedback>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;
    let feedback = state.store.feedback(id)?;
    ctx.ensure_patient_owns(feedback.patient_id, "update this feedback")?;
    let feedback = state.store.update_feedback(id, body.rating, body.comment)?;
    Ok(ok_message("Feedback updated successfully", feedback))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Admin, Role::Patient])?;
    let feedback = state.store.feedback(id)?;
    ctx.ensure_patient_owns(feedback.patient_id, "delete this feedback")?;
    state.store.delete_feedback(id)?;
    Ok(ok_message("Feedback deleted successfully", json!(null)))
}

pub async fn for_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(doctor_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.feedback_for_doctor(doctor_id)?))
}

pub async fn for_own_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Doctor])?;
    Ok(ok(state.store.feedback_for_doctor(ctx.id)?))
}

pub async fn for_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(patient_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(feedback_for_patient(&state, patient_id)?))
}

pub async fn for_own_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;
    Ok(ok(feedback_for_patient(&state, ctx.id)?))
}

pub async fn for_appointment(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(appointment_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;
    let list: Vec<_> = feedback_for_patient(&state, ctx.id)?
        .into_iter()
        .filter(|f| f.appointment_id == appointment_id)
        .collect();
    Ok(ok(list))
}

fn feedback_for_patient(
    state: &AppState,
    patient_id: u64,
) -> Result<Vec<models::clinic::Feedback>, crate::error::ApiError> {
    Ok(state
        .store
        .feedbacks()?
        .into_iter()
        .filter(|f| f.patient_id == patient_id)
        .collect())
}
