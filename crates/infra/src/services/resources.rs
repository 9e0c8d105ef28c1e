use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use tiergate_auth::{IdentityContext, authorize_create, authorize_get, authorize_update, list_filter};
use tiergate_core::{DomainResult, Entity, ResourceId};
use tiergate_resources::{NewResource, Resource, ResourceChanges, ResourceStore};

/// Create/list/get/update over the resource store, gated by the access policy.
///
/// `update` is read-modify-write with no version check: two concurrent
/// updates of the same resource race and the last save wins.
#[derive(Clone)]
pub struct ResourceService {
    resources: Arc<dyn ResourceStore>,
}

impl ResourceService {
    pub fn new(resources: Arc<dyn ResourceStore>) -> Self {
        Self { resources }
    }

    pub fn create(&self, request: NewResource, identity: &IdentityContext) -> DomainResult<Resource> {
        request.validate()?;
        let draft = authorize_create(identity, request)?;
        let created = self.resources.insert(draft)?;

        tracing::info!(
            resource_id = %created.id(),
            owner_id = %created.owner_id(),
            minimum_tier = %created.minimum_tier(),
            "resource created"
        );
        Ok(created)
    }

    /// Everything visible to `identity`, each resource once, ordered by id.
    pub fn list(&self, identity: &IdentityContext) -> DomainResult<Vec<Resource>> {
        let filter = list_filter(identity)?;
        let found = self.resources.find_many(&filter)?;

        let unique: BTreeMap<ResourceId, Resource> =
            found.into_iter().map(|r| (r.id(), r)).collect();

        tracing::debug!(identity_id = %identity.id(), count = unique.len(), "resources listed");
        Ok(unique.into_values().collect())
    }

    pub fn get(&self, id: ResourceId, identity: &IdentityContext) -> DomainResult<Resource> {
        let found = self.resources.find_by_id(id)?;
        match authorize_get(identity, id, found.as_ref()) {
            Ok(resource) => Ok(resource.clone()),
            Err(e) => {
                tracing::warn!(identity_id = %identity.id(), resource_id = %id, error = %e, "resource access denied");
                Err(e)
            }
        }
    }

    pub fn update(
        &self,
        id: ResourceId,
        changes: ResourceChanges,
        identity: &IdentityContext,
    ) -> DomainResult<Resource> {
        changes.validate()?;
        let existing = self.resources.find_by_id(id)?;

        let merged = match authorize_update(identity, id, existing.as_ref(), &changes) {
            Ok(merged) => merged,
            Err(e) => {
                tracing::warn!(identity_id = %identity.id(), resource_id = %id, error = %e, "resource update denied");
                return Err(e);
            }
        };

        let saved = self.resources.save(merged.touched(Utc::now()))?;
        tracing::info!(resource_id = %saved.id(), identity_id = %identity.id(), "resource updated");
        Ok(saved)
    }
}
