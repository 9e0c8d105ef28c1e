//! Infrastructure layer: storage adapters, application services, config.

pub mod config;
pub mod services;
pub mod store;

pub use config::{AppConfig, BootstrapAdmin};
pub use services::{IdentityService, ResourceService};
pub use store::{InMemoryIdentityStore, InMemoryResourceStore};
