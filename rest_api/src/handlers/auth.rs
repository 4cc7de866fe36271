// rest_api/src/handlers/auth.rs
//
// Three login flows, one per principal. Admins authenticate by wallet
// address (the MetaMask flow), doctors by email+password, patients by
// phone+password. Each returns a token plus a public view of the row.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::Patient;
use models::errors::ClinicError;
use security::{AuthError, Role, issue_token};

use crate::AppState;
use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct AdminLogin {
    pub wallet_address: String,
}

#[derive(Debug, Deserialize)]
pub struct DoctorLogin {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct PatientLogin {
    pub phone: String,
    pub password: String,
}

pub async fn admin_login(
    State(state): State<AppState>,
    Json(body): Json<AdminLogin>,
) -> ApiResult<Json<Value>> {
    let admin = state
        .store
        .admin_by_wallet(&body.wallet_address)?
        .ok_or_else(|| ClinicError::not_found("Admin"))?;
    let token = issue_token(&state.jwt_secret, admin.id, Role::Admin, state.token_ttl_hours)?;
    tracing::info!(admin_id = admin.id, "admin logged in");
    Ok(Json(json!({
        "success": true,
        "message": "Logged in successfully",
        "data": {
            "token": token,
            "admin": {
                "id": admin.id,
                "name": admin.name,
                "wallet_address": admin.wallet_address,
                "role": "admin",
            },
        },
    })))
}

pub async fn doctor_login(
    State(state): State<AppState>,
    Json(body): Json<DoctorLogin>,
) -> ApiResult<Json<Value>> {
    let doctor = state
        .store
        .doctor_by_email(&body.email)?
        .ok_or_else(|| ClinicError::not_found("Doctor"))?;
    if !Patient::verify_password(&body.password, &doctor.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    let token = issue_token(&state.jwt_secret, doctor.id, Role::Doctor, state.token_ttl_hours)?;
    tracing::info!(doctor_id = doctor.id, "doctor logged in");
    Ok(Json(json!({
        "success": true,
        "message": "Logged in successfully",
        "data": {
            "token": token,
            "doctor": {
                "id": doctor.id,
                "name": doctor.name,
                "email": doctor.email,
                "specialization": doctor.specialization,
                "role": "doctor",
            },
        },
    })))
}

pub async fn patient_login(
    State(state): State<AppState>,
    Json(body): Json<PatientLogin>,
) -> ApiResult<Json<Value>> {
    let patient = state
        .store
        .patient_by_phone(&body.phone)?
        .ok_or_else(|| ClinicError::not_found("Patient"))?;
    if !Patient::verify_password(&body.password, &patient.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    let token = issue_token(&state.jwt_secret, patient.id, Role::Patient, state.token_ttl_hours)?;
    tracing::info!(patient_id = patient.id, "patient logged in");
    Ok(Json(json!({
        "success": true,
        "message": "Logged in successfully",
        "data": {
            "token": token,
            "patient": {
                "id": patient.id,
                "name": patient.name,
                "phone": patient.phone,
                "role": "patient",
            },
        },
    })))
}
