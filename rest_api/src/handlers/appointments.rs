// rest_api/src/handlers/appointments.rs
//
// The booking flow: validate the request against the slot calendar and the
// live booking indexes, write the row (the store's compare_and_swap is the
// final word under concurrency), then emit the patient's notification.
// Reschedules re-run the same validation excluding the appointment itself.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::{Appointment, AppointmentStatus, NewAppointment};
use models::errors::ClinicError;
use scheduling::booking::{BookingRequest, validate_booking};
use scheduling::status::{notify_appointment_booked, notify_appointment_change};
use security::{Role, effective_patient_id};

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct CreateAppointment {
    pub patient_id: Option<u64>,
    pub doctor_id: u64,
    pub time_slot_id: u64,
    pub appointment_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAppointment {
    pub time_slot_id: Option<u64>,
    pub appointment_date: Option<NaiveDate>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: AppointmentStatus,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    fn apply(&self, list: Vec<Appointment>) -> Vec<Appointment> {
        list.into_iter()
            .filter(|a| {
                self.start_date.is_none_or(|s| a.appointment_date >= s)
                    && self.end_date.is_none_or(|e| a.appointment_date <= e)
            })
            .collect()
    }
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<CreateAppointment>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_role(&[Role::Admin, Role::Patient])?;
    let patient_id = effective_patient_id(&ctx, body.patient_id)?;

    let request = BookingRequest {
        patient_id,
        doctor_id: body.doctor_id,
        time_slot_id: body.time_slot_id,
        appointment_date: body.appointment_date,
        exclude_appointment_id: None,
    };
    validate_booking(&state.store, &request, Utc::now().naive_utc())?;

    let appointment = state.store.create_appointment(NewAppointment {
        patient_id,
        doctor_id: body.doctor_id,
        time_slot_id: body.time_slot_id,
        appointment_date: body.appointment_date,
        status: None,
    })?;
    notify_appointment_booked(&state.notifier, &appointment);
    tracing::info!(appointment_id = appointment.id, patient_id, "appointment booked");
    Ok(created("Appointment created successfully", appointment))
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.appointments()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let appointment = state.store.appointment(id)?;
    if !ctx.can_access_row(appointment.patient_id, appointment.doctor_id) {
        return Err(ClinicError::forbidden("view this appointment").into());
    }
    Ok(ok(appointment))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdateAppointment>,
) -> ApiResult<Json<Value>> {
    let existing = state.store.appointment(id)?;
    if !ctx.can_access_row(existing.patient_id, existing.doctor_id) {
        return Err(ClinicError::forbidden("update this appointment").into());
    }

    // Moving the booking re-runs the full validation, excluding this
    // appointment from the conflict checks.
    if body.time_slot_id.is_some() || body.appointment_date.is_some() {
        let request = BookingRequest {
            patient_id: existing.patient_id,
            doctor_id: existing.doctor_id,
            time_slot_id: body.time_slot_id.unwrap_or(existing.time_slot_id),
            appointment_date: body.appointment_date.unwrap_or(existing.appointment_date),
            exclude_appointment_id: Some(id),
        };
        validate_booking(&state.store, &request, Utc::now().naive_utc())?;
    }

    let (old, updated) =
        state
            .store
            .update_appointment(id, body.time_slot_id, body.appointment_date, body.status)?;
    notify_appointment_change(&state.notifier, &old, &updated);
    Ok(ok_message("Appointment updated successfully", updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let appointment = state.store.appointment(id)?;
    if !ctx.can_access_row(appointment.patient_id, appointment.doctor_id) {
        return Err(ClinicError::forbidden("delete this appointment").into());
    }
    state.store.delete_appointment(id)?;
    Ok(ok_message("Appointment deleted successfully", json!(null)))
}

pub async fn update_status(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<StatusChange>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Admin, Role::Doctor])?;
    let appointment = state.store.appointment(id)?;
    ctx.ensure_doctor_owns(appointment.doctor_id, "update this appointment status")?;

    let (old, updated) = state.store.update_appointment(id, None, None, Some(body.status))?;
    notify_appointment_change(&state.notifier, &old, &updated);
    Ok(ok_message("Appointment status updated successfully", updated))
}

pub async fn on_date(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.appointments_on_date(date)?))
}

pub async fn for_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(doctor_id): Path<u64>,
    Query(range): Query<DateRange>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_doctor_owns(doctor_id, "view these appointments")?;
    Ok(ok(range.apply(state.store.appointments_for_doctor(doctor_id)?)))
}

pub async fn for_own_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Query(range): Query<DateRange>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Doctor])?;
    Ok(ok(range.apply(state.store.appointments_for_doctor(ctx.id)?)))
}

pub async fn for_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(patient_id): Path<u64>,
    Query(range): Query<DateRange>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(patient_id, "view these appointments")?;
    Ok(ok(range.apply(state.store.appointments_for_patient(patient_id)?)))
}

pub async fn for_own_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Query(range): Query<DateRange>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;
    Ok(ok(range.apply(state.store.appointments_for_patient(ctx.id)?)))
}
