//! `tiergate-resources` — the owned, tier-gated resource model.
//!
//! Pure domain types plus the persistence contract; no policy decisions live
//! here (see `tiergate-auth::policy`).

pub mod resource;
pub mod store;

pub use resource::{
    NewResource, Resource, ResourceAttributes, ResourceChanges, ResourceDraft, ResourceFilter,
};
pub use store::ResourceStore;
