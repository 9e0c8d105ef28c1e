//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tower::ServiceBuilder;

use tiergate_auth::{
    Argon2PasswordHasher, Authenticator, CredentialValidator, Hs256TokenSigner, IdentityStore,
    PasswordHasher, TokenSigner,
};
use tiergate_core::{DomainError, DomainResult};
use tiergate_infra::{AppConfig, IdentityService, InMemoryIdentityStore, InMemoryResourceStore, ResourceService};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Everything the handlers need, shared behind one `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub identities: IdentityService,
    pub resources: ResourceService,
    pub authenticator: Authenticator,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    build_app_with_hasher(config, Arc::new(Argon2PasswordHasher::new()))
}

/// Same as [`build_app`] with an explicit password hasher (tests use cheap
/// Argon2 parameters here).
pub fn build_app_with_hasher(
    config: &AppConfig,
    hasher: Arc<dyn PasswordHasher>,
) -> anyhow::Result<Router> {
    let identity_store: Arc<dyn IdentityStore> = Arc::new(InMemoryIdentityStore::new());
    let signer: Arc<dyn TokenSigner> = Arc::new(Hs256TokenSigner::new(config.jwt_secret.as_bytes()));

    let identities = IdentityService::new(identity_store.clone(), hasher.clone(), config.open_admin_signup);
    if let Some(admin) = &config.bootstrap_admin {
        identities
            .bootstrap_admin(&admin.username, &admin.password)
            .map_err(|e| anyhow::anyhow!("bootstrap admin {}: {e}", admin.username))?;
    }

    let services = Arc::new(AppServices {
        identities: identities.clone(),
        resources: ResourceService::new(Arc::new(InMemoryResourceStore::new())),
        authenticator: Authenticator::new(
            CredentialValidator::new(identity_store, hasher),
            signer.clone(),
            config.token_ttl,
        ),
    });

    let auth_state = middleware::AuthState { signer, identities };

    // Protected routes: require a bearer token resolving to a stored identity.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    let public = Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/login", post(routes::auth::login))
        .route("/users", post(routes::users::register));

    Ok(public
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new().layer(axum::middleware::from_fn(middleware::request_context))))
}

/// Run CPU-heavy work (password hashing) off the async executor.
pub(crate) async fn blocking<T, F>(work: F) -> DomainResult<T>
where
    F: FnOnce() -> DomainResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DomainError::infrastructure(format!("blocking task failed: {e}")))?
}
