//! Test doubles for the collaborator traits.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;

use tiergate_core::{DomainError, DomainResult, IdentityId, Tier};

use crate::{Identity, IdentityStore, NewIdentity, PasswordDigest, PasswordHasher, Role};

/// Reversible "hash" so tests stay fast.
pub struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash(&self, plain: &str) -> DomainResult<PasswordDigest> {
        Ok(PasswordDigest::new(format!("fake:{plain}")))
    }

    fn verify(&self, plain: &str, digest: &PasswordDigest) -> bool {
        digest.as_str() == format!("fake:{plain}")
    }
}

#[derive(Default)]
pub struct FakeIdentityStore {
    rows: Mutex<Vec<Identity>>,
    failing: AtomicBool,
}

impl FakeIdentityStore {
    pub fn seed(&self, username: &str, password: &str, role: Role, tier: Tier) -> Identity {
        let digest = FakeHasher.hash(password).unwrap();
        self.insert(NewIdentity {
            username: username.to_string(),
            password_digest: digest,
            role,
            tier,
        })
        .unwrap()
    }

    pub fn fail_reads(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::infrastructure("store offline"));
        }
        Ok(())
    }
}

impl IdentityStore for FakeIdentityStore {
    fn find_by_username(&self, username: &str) -> DomainResult<Option<Identity>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|i| i.username == username).cloned())
    }

    fn find_by_id(&self, id: IdentityId) -> DomainResult<Option<Identity>> {
        self.check()?;
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|i| i.id == id).cloned())
    }

    fn insert(&self, identity: NewIdentity) -> DomainResult<Identity> {
        let mut rows = self.rows.lock().unwrap();
        let id = IdentityId::new(rows.len() as i64 + 1);
        let stored = Identity::from_new(id, identity, Utc::now());
        rows.push(stored.clone());
        Ok(stored)
    }

    fn save(&self, identity: Identity) -> DomainResult<Identity> {
        let mut rows = self.rows.lock().unwrap();
        let slot = rows
            .iter_mut()
            .find(|i| i.id == identity.id)
            .ok_or_else(|| DomainError::not_found(format!("identity {}", identity.id)))?;
        *slot = identity.clone();
        Ok(identity)
    }

    fn list_all(&self) -> DomainResult<Vec<Identity>> {
        self.check()?;
        Ok(self.rows.lock().unwrap().clone())
    }
}
