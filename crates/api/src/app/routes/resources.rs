use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use tiergate_auth::IdentityContext;
use tiergate_core::ResourceId;
use tiergate_resources::{NewResource, ResourceChanges};

use crate::app::{AppServices, dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_resources).post(create_resource))
        .route("/:id", get(get_resource).patch(update_resource))
}

pub async fn create_resource(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    payload: Result<Json<NewResource>, JsonRejection>,
) -> Response {
    let body = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.resources.create(body, &identity) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_resources(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
) -> Response {
    match services.resources.list(&identity) {
        Ok(items) => Json(dto::ItemsResponse { items }).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_resource(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
) -> Response {
    let id: ResourceId = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.resources.get(id, &identity) {
        Ok(found) => Json(found).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_resource(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(identity): Extension<IdentityContext>,
    Path(id): Path<String>,
    payload: Result<Json<ResourceChanges>, JsonRejection>,
) -> Response {
    let id: ResourceId = match dto::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let changes = match dto::body(payload) {
        Ok(b) => b,
        Err(resp) => return resp,
    };

    match services.resources.update(id, changes, &identity) {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
