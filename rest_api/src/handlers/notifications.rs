// rest_api/src/handlers/notifications.rs

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde_json::{Value, json};

use models::clinic::NewNotification;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewNotification>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_admin()?;
    let notification = state.store.create_notification(body)?;
    Ok(created("Notification created successfully", notification))
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.notifications()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let notification = state.store.notification(id)?;
    ctx.ensure_patient_owns(notification.patient_id, "view this notification")?;
    Ok(ok(notification))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    state.store.delete_notification(id)?;
    Ok(ok_message("Notification deleted successfully", json!(null)))
}

pub async fn for_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(patient_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(patient_id, "view these notifications")?;
    Ok(ok(state.store.notifications_for_patient(patient_id)?))
}

pub async fn unread_for_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(patient_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(patient_id, "view these notifications")?;
    Ok(ok(state.store.unread_notifications_for_patient(patient_id)?))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let notification = state.store.notification(id)?;
    ctx.ensure_patient_owns(notification.patient_id, "update this notification")?;
    let notification = state.store.mark_notification_read(id)?;
    Ok(ok_message("Notification marked as read", notification))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(patient_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(patient_id, "update these notifications")?;
    let updated = state.store.mark_all_notifications_read(patient_id)?;
    Ok(ok_message(
        "All notifications marked as read",
        json!({"updated": updated}),
    ))
}
