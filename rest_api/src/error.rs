// rest_api/src/error.rs
//
// The single place where domain failures become HTTP responses. Every
// handler returns Result<_, ApiError>; the IntoResponse impl produces the
// `{"success": false, "message": ...}` envelope with the status the error
// category maps to.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use models::errors::ClinicError;
use scheduling::booking::BookingError;
use security::AuthError;
use storage::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Clinic(#[from] ClinicError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Clinic(err.into())
    }
}

impl From<BookingError> for ApiError {
    fn from(err: BookingError) -> Self {
        let clinic = match err {
            BookingError::SlotMismatch => ClinicError::NotFound(err.to_string()),
            BookingError::WrongWeekday { .. } | BookingError::SlotInPast => {
                ClinicError::Validation(err.to_string())
            }
            BookingError::DoctorConflict | BookingError::PatientConflict => {
                ClinicError::Conflict(err.to_string())
            }
            BookingError::Store(e) => e.into(),
        };
        ApiError::Clinic(clinic)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Clinic(err) => match err {
                ClinicError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, json!({"success": false, "message": msg}))
                }
                ClinicError::FieldValidation(fields) => (
                    StatusCode::BAD_REQUEST,
                    json!({"success": false, "message": "Validation failed", "errors": fields}),
                ),
                ClinicError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, json!({"success": false, "message": msg}))
                }
                ClinicError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, json!({"success": false, "message": msg}))
                }
                ClinicError::NotFound(msg) => {
                    (StatusCode::NOT_FOUND, json!({"success": false, "message": msg}))
                }
                ClinicError::Conflict(msg) => {
                    (StatusCode::CONFLICT, json!({"success": false, "message": msg}))
                }
                ClinicError::Reference(what) => (
                    StatusCode::BAD_REQUEST,
                    json!({"success": false, "message": format!("Referenced {what} does not exist")}),
                ),
                ClinicError::Internal(detail) => {
                    tracing::error!(%detail, "internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({"success": false, "message": "Internal server error"}),
                    )
                }
            },
            ApiError::Auth(err) => {
                let status = match err {
                    AuthError::MissingToken | AuthError::InvalidToken
                    | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                    AuthError::Jwt(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, json!({"success": false, "message": err.to_string()}))
            }
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_rejections_map_to_expected_statuses() {
        let cases = [
            (BookingError::SlotMismatch, StatusCode::NOT_FOUND),
            (BookingError::SlotInPast, StatusCode::BAD_REQUEST),
            (BookingError::DoctorConflict, StatusCode::CONFLICT),
            (BookingError::PatientConflict, StatusCode::CONFLICT),
        ];
        for (err, expected) in cases {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn store_conflict_becomes_409() {
        let err: ApiError = StoreError::Conflict("taken".to_string()).into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
