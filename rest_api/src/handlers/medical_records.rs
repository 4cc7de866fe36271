// rest_api/src/handlers/medical_records.rs
//
// Create and update arrive as multipart: scalar fields, an optional
// `prescription_items` JSON array, and an optional file. The file is
// written to the uploads directory first; every failure path after that
// removes it again so a rejected request leaves nothing on disk.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use chrono::NaiveDate;
use serde_json::{Value, json};

use models::clinic::{
    MedicalRecord, NewMedicalRecord, NewPrescriptionItem, RecordType,
};
use models::errors::ClinicError;
use security::{Role, effective_doctor_id};

use crate::AppState;
use crate::auth::Auth;
use crate::error::{ApiError, ApiResult};
use crate::handlers::{created, ok, ok_message};
use crate::uploads::{StoredUpload, remove_by_url, store_upload};

#[derive(Debug, Default)]
struct RecordForm {
    patient_id: Option<u64>,
    doctor_id: Option<u64>,
    appointment_id: Option<u64>,
    record_type: Option<RecordType>,
    description: Option<String>,
    prescription_items: Option<Vec<NewPrescriptionItem>>,
    upload: Option<StoredUpload>,
}

impl RecordForm {
    /// Drops any stored file; called on every failure path.
    fn discard(self) {
        if let Some(upload) = self.upload {
            upload.discard();
        }
    }
}

fn invalid(field: &str) -> ClinicError {
    ClinicError::Validation(format!("Invalid value for field '{field}'"))
}

async fn read_form(state: &AppState, multipart: &mut Multipart) -> ApiResult<RecordForm> {
    let mut form = RecordForm::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                form.discard();
                return Err(ClinicError::Validation(format!("Malformed multipart body: {e}")).into());
            }
        };
        let name = field.name().unwrap_or_default().to_string();
        let result: ApiResult<()> = async {
            match name.as_str() {
                "patient_id" => {
                    let text = field.text().await.map_err(|_| invalid("patient_id"))?;
                    form.patient_id = Some(text.parse().map_err(|_| invalid("patient_id"))?);
                }
                "doctor_id" => {
                    let text = field.text().await.map_err(|_| invalid("doctor_id"))?;
                    form.doctor_id = Some(text.parse().map_err(|_| invalid("doctor_id"))?);
                }
                "appointment_id" => {
                    let text = field.text().await.map_err(|_| invalid("appointment_id"))?;
                    form.appointment_id =
                        Some(text.parse().map_err(|_| invalid("appointment_id"))?);
                }
                "record_type" => {
                    let text = field.text().await.map_err(|_| invalid("record_type"))?;
                    form.record_type = Some(
                        serde_json::from_value(json!(text)).map_err(|_| invalid("record_type"))?,
                    );
                }
                "description" => {
                    form.description =
                        Some(field.text().await.map_err(|_| invalid("description"))?);
                }
                "prescription_items" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|_| invalid("prescription_items"))?;
                    form.prescription_items = Some(
                        serde_json::from_str(&text).map_err(|_| invalid("prescription_items"))?,
                    );
                }
                "file" => {
                    let file_name = field.file_name().unwrap_or("upload").to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ClinicError::Validation(format!("Failed to read file: {e}")))?;
                    form.upload =
                        Some(store_upload(state.uploads_dir.as_path(), &file_name, &bytes)?);
                }
                _ => {
                    // Unknown fields are ignored, like the original form parser.
                    let _ = field.bytes().await;
                }
            }
            Ok(())
        }
        .await;
        if let Err(e) = result {
            form.discard();
            return Err(e);
        }
    }
    Ok(form)
}

pub async fn create(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Value>)> {
    ctx.require_role(&[Role::Admin, Role::Doctor])?;
    let mut form = read_form(&state, &mut multipart).await?;

    let doctor_id = match effective_doctor_id(&ctx, form.doctor_id) {
        Ok(id) => id,
        Err(e) => {
            form.discard();
            return Err(e.into());
        }
    };
    let (patient_id, record_type) = match (form.patient_id, form.record_type) {
        (Some(p), Some(r)) => (p, r),
        _ => {
            form.discard();
            return Err(ClinicError::Validation(
                "patient_id and record_type are required".to_string(),
            )
            .into());
        }
    };

    let new = NewMedicalRecord {
        patient_id,
        doctor_id: Some(doctor_id),
        appointment_id: form.appointment_id,
        record_type,
        description: form.description.take(),
        file_url: form.upload.as_ref().map(StoredUpload::url),
    };
    let items = form.prescription_items.take().unwrap_or_default();

    match state.store.create_medical_record(doctor_id, new, items) {
        Ok(record) => {
            let body = with_items(&state, record)?;
            Ok(created("Medical record created successfully", body))
        }
        Err(e) => {
            form.discard();
            Err(e.into())
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Admin, Role::Doctor])?;
    let existing = state.store.medical_record(id)?;
    ctx.ensure_doctor_owns(existing.doctor_id, "update this medical record")?;

    let mut form = read_form(&state, &mut multipart).await?;
    let new_file_url = form.upload.as_ref().map(StoredUpload::url);

    match state.store.update_medical_record(
        id,
        form.record_type,
        form.description.take(),
        new_file_url.clone(),
        form.prescription_items.take(),
    ) {
        Ok(record) => {
            // The replaced file is no longer referenced by anything.
            if let (Some(_), Some(old_url)) = (new_file_url, existing.file_url) {
                remove_by_url(state.uploads_dir.as_path(), &old_url);
            }
            let body = with_items(&state, record)?;
            Ok(ok_message("Medical record updated successfully", body))
        }
        Err(e) => {
            form.discard();
            Err(e.into())
        }
    }
}

pub async fn list(State(state): State<AppState>, Auth(ctx): Auth) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    Ok(ok(state.store.medical_records()?))
}

pub async fn get(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let record = state.store.medical_record(id)?;
    if !ctx.can_access_row(record.patient_id, record.doctor_id) {
        return Err(ClinicError::forbidden("view this medical record").into());
    }
    let body = with_items(&state, record)?;
    Ok(ok(body))
}

pub async fn delete(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Admin, Role::Doctor])?;
    let record = state.store.medical_record(id)?;
    ctx.ensure_doctor_owns(record.doctor_id, "delete this medical record")?;
    state.store.delete_medical_record(id)?;
    if let Some(url) = record.file_url {
        remove_by_url(state.uploads_dir.as_path(), &url);
    }
    Ok(ok_message("Medical record deleted successfully", json!(null)))
}

pub async fn for_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(patient_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_patient_owns(patient_id, "view these medical records")?;
    Ok(ok(state.store.medical_records_for_patient(patient_id)?))
}

pub async fn for_own_patient(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Patient])?;
    Ok(ok(state.store.medical_records_for_patient(ctx.id)?))
}

pub async fn for_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(doctor_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    ctx.ensure_doctor_owns(doctor_id, "view these medical records")?;
    Ok(ok(state.store.medical_records_for_doctor(doctor_id)?))
}

pub async fn for_own_doctor(
    State(state): State<AppState>,
    Auth(ctx): Auth,
) -> ApiResult<Json<Value>> {
    ctx.require_role(&[Role::Doctor])?;
    Ok(ok(state.store.medical_records_for_doctor(ctx.id)?))
}

pub async fn for_appointment(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(appointment_id): Path<u64>,
) -> ApiResult<Json<Value>> {
    let appointment = state.store.appointment(appointment_id)?;
    if !ctx.can_access_row(appointment.patient_id, appointment.doctor_id) {
        return Err(ClinicError::forbidden("view these medical records").into());
    }
    let records: Vec<_> = state
        .store
        .medical_records()?
        .into_iter()
        .filter(|r| r.appointment_id == Some(appointment_id))
        .collect();
    Ok(ok(records))
}

pub async fn on_date(
    State(state): State<AppState>,
    Auth(ctx): Auth,
    Path(date): Path<NaiveDate>,
) -> ApiResult<Json<Value>> {
    ctx.require_admin()?;
    let records: Vec<_> = state
        .store
        .medical_records()?
        .into_iter()
        .filter(|r| r.created_at.date_naive() == date)
        .collect();
    Ok(ok(records))
}

/// Record JSON with its prescription items attached when it is a
/// prescription.
fn with_items(state: &AppState, record: MedicalRecord) -> Result<Value, ApiError> {
    let items = if record.record_type == RecordType::Prescription {
        state.store.prescription_items_for_record(record.id)?
    } else {
        Vec::new()
    };
    let mut value = serde_json::to_value(&record)
        .map_err(|e| ApiError::Clinic(ClinicError::from(e)))?;
    if let Some(obj) = value.as_object_mut() {
        obj.insert("prescription_items".to_string(), json!(items));
    }
    Ok(value)
}
