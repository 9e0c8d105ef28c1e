use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;

use tiergate_auth::{Identity, IdentityStore, NewIdentity};
use tiergate_core::{DomainError, DomainResult, Entity, IdentityId, ResourceId};
use tiergate_resources::{Resource, ResourceDraft, ResourceFilter, ResourceStore};

/// Auto-increment table guarded by a single lock.
#[derive(Debug)]
struct Table<K, V> {
    next_id: i64,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<K, V> Table<K, V> {
    fn allocate(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn read<T>(lock: &RwLock<T>) -> DomainResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| DomainError::infrastructure("lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> DomainResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| DomainError::infrastructure("lock poisoned"))
}

/// In-memory identity store for tests/dev.
///
/// Username uniqueness is checked and enforced under the write lock, so
/// concurrent registrations of the same name cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryIdentityStore {
    inner: RwLock<Table<IdentityId, Identity>>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_by_username(&self, username: &str) -> DomainResult<Option<Identity>> {
        let table = read(&self.inner)?;
        Ok(table.rows.values().find(|i| i.username == username).cloned())
    }

    fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>> {
        let table = read(&self.inner)?;
        Ok(table.rows.get(&id).cloned())
    }

    fn insert(&self, identity: NewIdentity) -> DomainResult<Identity> {
        let mut table = write(&self.inner)?;

        if table.rows.values().any(|i| i.username == identity.username) {
            return Err(DomainError::conflict("username already exists"));
        }

        let id = IdentityId::new(table.allocate());
        let stored = Identity::from_new(id, identity, Utc::now());
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    fn save(&self, identity: Identity) -> DomainResult<Identity> {
        let mut table = write(&self.inner)?;

        if !table.rows.contains_key(&identity.id) {
            return Err(DomainError::not_found(format!("identity {}", identity.id)));
        }
        if table
            .rows
            .values()
            .any(|i| i.id != identity.id && i.username == identity.username)
        {
            return Err(DomainError::conflict("username already exists"));
        }

        table.rows.insert(identity.id, identity.clone());
        Ok(identity)
    }

    fn list_all(&self) -> DomainResult<Vec<Identity>> {
        let table = read(&self.inner)?;
        Ok(table.rows.values().cloned().collect())
    }
}

/// In-memory resource store for tests/dev.
///
/// Single-record reads and writes are atomic; there is no version check on
/// `save` (last write wins).
#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    inner: RwLock<Table<ResourceId, Resource>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ResourceStore for InMemoryResourceStore {
    fn insert(&self, draft: ResourceDraft) -> DomainResult<Resource> {
        let mut table = write(&self.inner)?;
        let id = ResourceId::new(table.allocate());
        let stored = Resource::from_draft(id, draft, Utc::now());
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    fn save(&self, resource: Resource) -> DomainResult<Resource> {
        let mut table = write(&self.inner)?;
        let id = resource.id();
        let Some(slot) = table.rows.get_mut(&id) else {
            return Err(DomainError::not_found(format!("resource {id}")));
        };
        *slot = resource.clone();
        Ok(resource)
    }

    fn find_by_id(&self, id: ResourceId) -> DomainResult<Option<Resource>> {
        let table = read(&self.inner)?;
        Ok(table.rows.get(&id).cloned())
    }

    fn find_many(&self, filter: &ResourceFilter) -> DomainResult<Vec<Resource>> {
        let table = read(&self.inner)?;
        Ok(table
            .rows
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }
}
