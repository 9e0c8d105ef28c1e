use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use tiergate_core::{DomainError, DomainResult};

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------
//
// Registration, identity changes and resource requests deserialize straight
// into the domain request types (`RegisterIdentity`, `IdentityChanges`,
// `NewResource`, `ResourceChanges`).

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> DomainResult<()> {
        if self.username.trim().is_empty() || self.password.is_empty() {
            return Err(DomainError::validation("username and password are required"));
        }
        Ok(())
    }
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct ItemsResponse<T> {
    pub items: Vec<T>,
}

// -------------------------
// Helpers
// -------------------------

/// Unwrap a JSON body, turning extractor rejections into a 400 `validation_error`.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, axum::response::Response> {
    payload.map(|Json(v)| v).map_err(|rejection| {
        errors::json_error(StatusCode::BAD_REQUEST, "validation_error", rejection.body_text())
    })
}

/// Parse a path id with the type's own `FromStr`.
pub fn parse_id<T>(raw: &str) -> Result<T, axum::response::Response>
where
    T: core::str::FromStr<Err = DomainError>,
{
    raw.parse().map_err(errors::domain_error_to_response)
}
