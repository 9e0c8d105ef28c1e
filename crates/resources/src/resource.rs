use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tiergate_core::{DomainError, DomainResult, Entity, IdentityId, ResourceId, Tier};

const NAME_MIN_LEN: usize = 3;
const DESCRIPTION_MIN_LEN: usize = 10;

/// Descriptive payload of a resource. Opaque to the access policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAttributes {
    pub name: String,
    pub description: String,
}

impl ResourceAttributes {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_description(&self.description)
    }
}

/// A stored resource.
///
/// # Invariants
/// - `owner_id` is fixed at creation and never changes.
/// - `minimum_tier` starts as the creator's tier at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    id: ResourceId,
    owner_id: IdentityId,
    minimum_tier: Tier,
    #[serde(flatten)]
    attributes: ResourceAttributes,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Resource {
    /// Materialize a draft under a store-assigned id.
    pub fn from_draft(id: ResourceId, draft: ResourceDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            owner_id: draft.owner_id,
            minimum_tier: draft.minimum_tier,
            attributes: draft.attributes,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner_id(&self) -> IdentityId {
        self.owner_id
    }

    pub fn minimum_tier(&self) -> Tier {
        self.minimum_tier
    }

    pub fn attributes(&self) -> &ResourceAttributes {
        &self.attributes
    }

    pub fn name(&self) -> &str {
        &self.attributes.name
    }

    pub fn description(&self) -> &str {
        &self.attributes.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, identity: IdentityId) -> bool {
        self.owner_id == identity
    }

    /// Shallow merge: every field present in `changes` overwrites, absent
    /// fields keep their value. `id` and `owner_id` are untouchable.
    pub fn merged(&self, changes: &ResourceChanges) -> Resource {
        let mut next = self.clone();
        if let Some(name) = &changes.name {
            next.attributes.name = name.clone();
        }
        if let Some(description) = &changes.description {
            next.attributes.description = description.clone();
        }
        if let Some(tier) = changes.minimum_tier {
            next.minimum_tier = tier;
        }
        next
    }

    /// Stamp a modification time.
    pub fn touched(mut self, now: DateTime<Utc>) -> Resource {
        self.updated_at = now;
        self
    }
}

impl Entity for Resource {
    type Id = ResourceId;

    fn id(&self) -> ResourceId {
        self.id
    }
}

/// Creation request as supplied by a caller.
///
/// `minimum_tier` is accepted for wire compatibility and then ignored: the
/// stored tier always comes from the creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewResource {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub minimum_tier: Option<Tier>,
}

impl NewResource {
    pub fn validate(&self) -> DomainResult<()> {
        validate_name(&self.name)?;
        validate_description(&self.description)
    }

    pub fn into_attributes(self) -> ResourceAttributes {
        ResourceAttributes {
            name: self.name,
            description: self.description,
        }
    }
}

/// A creation that has passed the access policy: owner and tier are bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDraft {
    owner_id: IdentityId,
    minimum_tier: Tier,
    attributes: ResourceAttributes,
}

impl ResourceDraft {
    pub fn new(owner_id: IdentityId, minimum_tier: Tier, attributes: ResourceAttributes) -> Self {
        Self {
            owner_id,
            minimum_tier,
            attributes,
        }
    }

    pub fn owner_id(&self) -> IdentityId {
        self.owner_id
    }

    pub fn minimum_tier(&self) -> Tier {
        self.minimum_tier
    }

    pub fn attributes(&self) -> &ResourceAttributes {
        &self.attributes
    }
}

/// Partial update. Has no `id`/`owner_id` fields, so a merge cannot touch them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceChanges {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub minimum_tier: Option<Tier>,
}

impl ResourceChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.minimum_tier.is_none()
    }
}

/// Visibility filter handed to [`crate::ResourceStore::find_many`].
///
/// Kept as data (not a closure) so a SQL-backed store can translate it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResourceFilter {
    /// Everything (administrators).
    All,
    /// `owner_id == owner OR rank(minimum_tier) <= rank(tier)`.
    OwnedOrWithinTier { owner: IdentityId, tier: Tier },
}

impl ResourceFilter {
    pub fn matches(&self, resource: &Resource) -> bool {
        match *self {
            ResourceFilter::All => true,
            ResourceFilter::OwnedOrWithinTier { owner, tier } => {
                resource.is_owned_by(owner) || resource.minimum_tier().less_or_equal(tier)
            }
        }
    }
}

fn validate_name(name: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("name must not be empty"));
    }
    if name.chars().count() < NAME_MIN_LEN {
        return Err(DomainError::validation(format!(
            "name must be at least {NAME_MIN_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> DomainResult<()> {
    if description.trim().is_empty() {
        return Err(DomainError::validation("description must not be empty"));
    }
    if description.chars().count() < DESCRIPTION_MIN_LEN {
        return Err(DomainError::validation(format!(
            "description must be at least {DESCRIPTION_MIN_LEN} characters"
        )));
    }
    Ok(())
}
