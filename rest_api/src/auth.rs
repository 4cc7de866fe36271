// rest_api/src/auth.rs

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use security::{AuthContext, AuthError, bearer_token, validate_token};

use crate::AppState;
use crate::error::ApiError;

/// Extractor that authenticates the request from its bearer token.
/// Handlers take `Auth(ctx)` as an argument; requests without a valid
/// token are rejected before the handler runs.
pub struct Auth(pub AuthContext);

#[async_trait]
impl FromRequestParts<AppState> for Auth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingToken)?;
        let token = bearer_token(header)?;
        let ctx = validate_token(&state.jwt_secret, token)?;
        Ok(Auth(ctx))
    }
}
