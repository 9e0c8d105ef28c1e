use std::sync::Arc;

use tiergate_core::{DomainResult, IdentityId};

use crate::{Identity, NewIdentity};

/// Persistence contract for identities (the credential store).
///
/// Implementations must enforce username uniqueness atomically in `insert`
/// and `save`, returning `DomainError::Conflict`; callers' own checks are a
/// best-effort pre-check only.
pub trait IdentityStore: Send + Sync {
    fn find_by_username(&self, username: &str) -> DomainResult<Option<Identity>>;

    fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>>;

    /// Persist a new identity, assigning its id and timestamps.
    fn insert(&self, identity: NewIdentity) -> DomainResult<Identity>;

    /// Overwrite an existing identity. `NotFound` if the id is unknown.
    fn save(&self, identity: Identity) -> DomainResult<Identity>;

    fn list_all(&self) -> DomainResult<Vec<Identity>>;
}

impl<S> IdentityStore for Arc<S>
where
    S: IdentityStore + ?Sized,
{
    fn find_by_username(&self, username: &str) -> DomainResult<Option<Identity>> {
        (**self).find_by_username(username)
    }

    fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>> {
        (**self).find_by_id(id)
    }

    fn insert(&self, identity: NewIdentity) -> DomainResult<Identity> {
        (**self).insert(identity)
    }

    fn save(&self, identity: Identity) -> DomainResult<Identity> {
        (**self).save(identity)
    }

    fn list_all(&self) -> DomainResult<Vec<Identity>> {
        (**self).list_all()
    }
}
