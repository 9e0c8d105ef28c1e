use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use tiergate_auth::{IdentityChanges, IdentityContext, RegisterIdentity};
use tiergate_core::IdentityId;

use crate::app::{AppServices, blocking, dto, errors};

/// `POST /users`: public registration.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    payload: Result<Json<RegisterIdentity>, JsonRejection>,
) -> Response {
    let body = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let identities = services.identities.clone();
    match blocking(move || identities.register(body)).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> Response {
    match services.identities.list(&identity) {
        Ok(items) => Json(dto::ItemsResponse { items }).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Response {
    let id: IdentityId = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.identities.get(id, &identity) {
        Ok(found) => Json(found).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// `PATCH /users/:id`: may rehash a password, so it runs off the executor.
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    payload: Result<Json<IdentityChanges>, JsonRejection>,
) -> Response {
    let id: IdentityId = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let changes = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    let identities = services.identities.clone();
    match blocking(move || identities.update(id, changes, &identity)).await {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
