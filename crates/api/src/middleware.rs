use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::Instrument;

use tiergate_auth::TokenSigner;
use tiergate_core::DomainError;
use tiergate_infra::IdentityService;
use tiergate_observability::{RequestId, request_span};

use crate::app::errors::{domain_error_to_response, json_error};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone)]
pub struct AuthState {
    pub signer: Arc<dyn TokenSigner>,
    pub identities: IdentityService,
}

/// Run the request inside a `request` span and echo its id back.
pub async fn request_context(req: Request<axum::body::Body>, next: Next) -> Response {
    let request_id = RequestId::parse_or_new(
        req.headers()
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    let span = request_span(request_id, req.method().as_str(), req.uri().path());

    async move {
        let started = Instant::now();
        let mut response = next.run(req).await;

        tracing::info!(
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request completed"
        );
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}

/// Verify the bearer token, then re-read the subject from the store.
///
/// Handlers receive an `IdentityContext` extension whose role and tier are
/// the stored values at the time of this request, not the ones in the token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let token = match extract_bearer(req.headers()) {
        Ok(token) => token,
        Err(message) => return unauthorized(message),
    };

    let claims = match state.signer.verify(token, Utc::now()) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::warn!(error = %e, "bearer token rejected");
            return unauthorized("invalid or expired token");
        }
    };

    let identity = match state.identities.resolve(&claims) {
        Ok(identity) => identity,
        Err(DomainError::Authentication(message)) => return unauthorized(message),
        Err(e) => return domain_error_to_response(e),
    };

    tracing::debug!(identity_id = %identity.id(), role = %identity.role(), "request authenticated");
    req.extensions_mut().insert(identity);

    next.run(req).await
}

fn unauthorized(message: impl Into<String>) -> Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, &'static str> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("missing bearer token")?;

    let header = header.to_str().map_err(|_| "malformed authorization header")?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or("authorization header must use the Bearer scheme")?;

    let token = header.trim();
    if token.is_empty() {
        return Err("missing bearer token");
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::header::AUTHORIZATION;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_and_blanks_are_rejected() {
        assert!(extract_bearer(&HeaderMap::new()).is_err());
        assert!(extract_bearer(&headers("Basic dXNlcjpwdw==")).is_err());
        assert!(extract_bearer(&headers("Bearer    ")).is_err());
    }
}
