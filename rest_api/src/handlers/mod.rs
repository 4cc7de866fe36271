// rest_api/src/handlers/mod.rs

pub mod admins;
pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod feedback;
pub mod medical_records;
pub mod medications;
pub mod notifications;
pub mod patients;
pub mod payments;
pub mod time_slots;

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};

/// 200 with the success envelope.
pub(crate) fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({"success": true, "data": data}))
}

pub(crate) fn ok_message<T: Serialize>(message: &str, data: T) -> Json<Value> {
    Json(json!({"success": true, "message": message, "data": data}))
}

/// 201 with the success envelope.
pub(crate) fn created<T: Serialize>(message: &str, data: T) -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "message": message, "data": data})),
    )
}
