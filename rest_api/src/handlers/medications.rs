// rest_api/src/handlers/medications.rs

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::NewMedication;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct UpdateMedication {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewMedication>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_admin()?;
    let medication = state.store.create_medication(body)?;
    Ok(created("Medication created successfully", medication))
}

/// The catalogue is readable by every authenticated caller; doctors use it
/// when prescribing.
pub async fn list(State(state): State<AppState>, Auth(_ctx): Auth) -> ApiResult<Json<Value>> {
    Ok(ok(state.store.medications()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(_ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    Ok(ok(state.store.medication(id)?))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdateMedication>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let medication = state.store.update_medication(id, body.name, body.description)?;
    Ok(ok_message("Medication updated successfully", medication))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    state.store.delete_medication(id)?;
    Ok(ok_message("Medication deleted successfully", json!(null)))
}
