// rest_api/src/handlers/admins.rs

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::NewAdmin;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct UpdateAdmin {
    pub name: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewAdmin>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_admin()?;
    let admin = state.store.create_admin(body)?;
    Ok(created("Admin created successfully", admin))
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.admins()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.admin(id)?))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdateAdmin>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let admin = state.store.update_admin(id, body.name)?;
    Ok(ok_message("Admin updated successfully", admin))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    state.store.delete_admin(id)?;
    Ok(ok_message("Admin deleted successfully", json!(null)))
}

/// Clinic-wide totals for the admin dashboard.
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let appointments = state.store.appointments()?;
    let active = appointments.iter().filter(|a| a.status.is_active()).count();
    let stats = json!({
        "patients": state.store.patients()?.len(),
        "doctors": state.store.doctors()?.len(),
        "total_appointments": appointments.len(),
        "active_appointments": active,
        "payments": state.store.payments()?.len(),
        "medical_records": state.store.medical_records()?.len(),
    });
    Ok(ok(stats))
}
