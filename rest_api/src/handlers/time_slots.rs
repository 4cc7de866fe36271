// rest_api/src/handlers/time_slots.rs

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{Value, json};

use models::calendar::{DayOfWeek, day_of_week};
use models::clinic::NewTimeSlot;
use models::errors::ClinicError;
use scheduling::availability::available_slots;
use security::Role;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct UpdateTimeSlot {
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewTimeSlot>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_admin()?;
    let slot = state.store.create_time_slot(body)?;
    Ok(created("Time slot created successfully", slot))
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.time_slots()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(_ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    Ok(ok(state.store.time_slot(id)?))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdateTimeSlot>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let slot = state
        .store
        .update_time_slot(id, body.day_of_week, body.start_time, body.end_time)?;
    Ok(ok_message("Time slot updated successfully", slot))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    state.store.delete_time_slot(id)?;
    Ok(ok_message("Time slot deleted successfully", json!(null)))
}

pub async fn for_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(doctor_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_doctor_owns(doctor_id, "view these time slots")?;
    Ok(ok(state.store.time_slots_for_doctor(doctor_id)?))
}

pub async fn for_own_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Doctor])?;
    Ok(ok(state.store.time_slots_for_doctor(ctx.id)?))
}

/// Free slots for a doctor on a date. A weekday with no slots defined is
/// reported as 404 naming the weekday; a fully-booked day is a plain 200
/// with an empty list.
pub async fn available(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path((doctor_id, date)): Path<(u64, NaiveDate)>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Admin, Role::Patient])?;
    available_for(&state, doctor_id, date)
}

pub async fn available_own(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Doctor])?;
    available_for(&state, ctx.id, date)
}

fn available_for(state: &AppState, doctor_id: u64, date: NaiveDate) -> ApiResult<Json<Value>> {
    let _ = state.store.doctor(doctor_id)?;
    let day = day_of_week(date);
    let defined = state.store.time_slots_for_doctor_on_day(doctor_id, day)?;
    if defined.is_empty() {
        return Err(ClinicError::NotFound(format!("No time slots available for {day}")).into());
    }
    let slots = available_slots(&state.store, doctor_id, date)?;
    Ok(ok(slots))
}
