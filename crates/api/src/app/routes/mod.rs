use axum::{
    Router,
    routing::{get, patch},
};

pub mod auth;
pub mod resources;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user).patch(users::update_user))
        .nest("/resources", resources::router())
}
