use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use tiergate_auth::IdentityContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// The caller as resolved for this request (live role and tier).
pub async fn whoami(Extension(identity): Extension<IdentityContext>) -> impl IntoResponse {
    Json(serde_json::json!({
        "id": identity.id(),
        "username": identity.username(),
        "role": identity.role(),
        "tier": identity.tier(),
    }))
}
