use std::sync::Arc;

use tiergate_core::{DomainResult, ResourceId};

use crate::{Resource, ResourceDraft, ResourceFilter};

/// Persistence contract for resources.
///
/// Implementations must make single-record reads and writes atomic; nothing
/// more is assumed (no optimistic concurrency, last write wins).
pub trait ResourceStore: Send + Sync {
    /// Persist a new resource, assigning its id and timestamps.
    fn insert(&self, draft: ResourceDraft) -> DomainResult<Resource>;

    /// Overwrite an existing resource. `NotFound` if the id is unknown.
    fn save(&self, resource: Resource) -> DomainResult<Resource>;

    fn find_by_id(&self, id: ResourceId) -> DomainResult<Option<Resource>>;

    fn find_many(&self, filter: &ResourceFilter) -> DomainResult<Vec<Resource>>;
}

impl<S> ResourceStore for Arc<S>
where
    S: ResourceStore + ?Sized,
{
    fn insert(&self, draft: ResourceDraft) -> DomainResult<Resource> {
        (**self).insert(draft)
    }

    fn save(&self, resource: Resource) -> DomainResult<Resource> {
        (**self).save(resource)
    }

    fn find_by_id(&self, id: ResourceId) -> DomainResult<Option<Resource>> {
        (**self).find_by_id(id)
    }

    fn find_many(&self, filter: &ResourceFilter) -> DomainResult<Vec<Resource>> {
        (**self).find_many(filter)
    }
}
