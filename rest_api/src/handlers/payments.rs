// rest_api/src/handlers/payments.rs
//
// Payments hang off appointments; `patient_id` always comes from the
// appointment row. Processing talks to the opaque gateway, persists the
// transition first and only then emits the (best-effort) notification.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};

use models::clinic::{NewPayment, NotificationKind, PaymentStatus, PaymentType};
use models::errors::ClinicError;
use scheduling::status::{notify_payment_change, payment_processed_message};
use security::Role;

use crate::AppState;
use crate::auth::Auth;
use crate::error::ApiResult;
use crate::handlers::{created, ok, ok_message};

#[derive(Debug, Deserialize)]
pub struct UpdatePayment {
    pub amount: Option<f64>,
    pub status: Option<PaymentStatus>,
    pub payment_type: Option<PaymentType>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentStatusChange {
    pub status: PaymentStatus,
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Json(body): Json<NewPayment>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_role(&[Role::Admin, Role::Patient])?;

    // The appointment must exist; a patient can only attach payments to
    // their own appointments.
    let appointment = state.store.appointment(body.appointment_id).map_err(|_| {
        ClinicError::NotFound(
            "Appointment not found or you don't have permission to create payment".to_string(),
        )
    })?;
    if ctx.role == Role::Patient && appointment.patient_id != ctx.id {
        return Err(ClinicError::NotFound(
            "Appointment not found or you don't have permission to create payment".to_string(),
        )
        .into());
    }

    let payment = state.store.create_payment(appointment.patient_id, body)?;
    state.notifier.notify(
        appointment.patient_id,
        NotificationKind::General,
        format!(
            "Payment of ${} has been created for your appointment. Please complete the payment to confirm your appointment.",
            payment.amount
        ),
    );
    Ok(created("Payment created successfully", payment))
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.payments()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let payment = state.store.payment(id)?;
    ctx.ensure_patient_owns(payment.patient_id, "view this payment")?;
    Ok(ok(payment))
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<UpdatePayment>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let payment = state
        .store
        .update_payment(id, body.amount, body.status, body.payment_type, body.note)?;
    Ok(ok_message("Payment updated successfully", payment))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    state.store.delete_payment(id)?;
    Ok(ok_message("Payment deleted successfully", json!(null)))
}

pub async fn for_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(patient_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(patient_id, "view these payments")?;
    Ok(ok(state.store.payments_for_patient(patient_id)?))
}

pub async fn for_own_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;
    Ok(ok(state.store.payments_for_patient(ctx.id)?))
}

pub async fn for_appointment(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(appointment_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let appointment = state.store.appointment(appointment_id).map_err(|_| {
        ClinicError::NotFound(
            "Appointment not found or you don't have permission to view payments".to_string(),
        )
    })?;
    if !ctx.can_access_row(appointment.patient_id, appointment.doctor_id) {
        return Err(ClinicError::NotFound(
            "Appointment not found or you don't have permission to view payments".to_string(),
        )
        .into());
    }
    Ok(ok(state.store.payments_for_appointment(appointment_id)?))
}

pub async fn on_date(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let payments: Vec<_> = state
        .store
        .payments()?
        .into_iter()
        .filter(|p| p.created_at.date_naive() == date)
        .collect();
    Ok(ok(payments))
}

pub async fn with_status(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(status): Path<String>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let status: PaymentStatus = serde_json::from_value(json!(status))
        .map_err(|_| ClinicError::Validation("Invalid payment status".to_string()))?;
    Ok(ok(state.store.payments_with_status(status)?))
}

/// Charges a pending payment through the gateway. Only the owning patient
/// can trigger this, and only while the payment is pending.
pub async fn process(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;

    let patient = state.store.patient(ctx.id)?;
    if patient.phone.is_empty() {
        return Err(ClinicError::Validation(
            "Patient phone number is required for payment processing".to_string(),
        )
        .into());
    }

    let payment = state.store.payment(id).map_err(|_| {
        ClinicError::NotFound("Payment not found or already processed".to_string())
    })?;
    if payment.patient_id != ctx.id || payment.status != PaymentStatus::Pending {
        return Err(
            ClinicError::NotFound("Payment not found or already processed".to_string()).into(),
        );
    }

    let reference = state
        .gateway
        .charge(&patient.phone, payment.amount, payment.id)
        .await
        .map_err(|e| {
            tracing::warn!(payment_id = id, error = %e, "payment processing failed");
            ClinicError::Validation("Payment processing failed".to_string())
        })?;

    let (_, paid) = state
        .store
        .set_payment_status(id, PaymentStatus::Paid, Some(reference))?;
    state.notifier.notify(
        paid.patient_id,
        NotificationKind::General,
        payment_processed_message(paid.amount),
    );
    tracing::info!(payment_id = id, "payment processed");
    Ok(ok_message("Payment processed successfully", paid))
}

pub async fn update_status(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    Json(body): Json<PaymentStatusChange>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let (old_status, payment) = state.store.set_payment_status(id, body.status, None)?;
    notify_payment_change(&state.notifier, old_status, &payment);
    Ok(ok_message("Payment status updated successfully", payment))
}
