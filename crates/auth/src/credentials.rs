use std::sync::Arc;

use tiergate_core::DomainResult;

use crate::{IdentityStore, PasswordHasher, PublicIdentity};

/// Verifies a plaintext password against a stored identity.
///
/// The digest never leaves this type: success yields a [`PublicIdentity`].
/// Unknown username and wrong password are indistinguishable (`None`).
#[derive(Clone)]
pub struct CredentialValidator {
    identities: Arc<dyn IdentityStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl CredentialValidator {
    pub fn new(identities: Arc<dyn IdentityStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { identities, hasher }
    }

    /// `Ok(None)` on any credential mismatch; `Err` only for store failures.
    pub fn validate(&self, username: &str, password: &str) -> DomainResult<Option<PublicIdentity>> {
        let Some(identity) = self.identities.find_by_username(username)? else {
            return Ok(None);
        };

        if !self.hasher.verify(password, &identity.password_digest) {
            return Ok(None);
        }

        Ok(Some(identity.into()))
    }
}

#[cfg(test)]
mod tests {
    use tiergate_core::Tier;

    use super::*;
    use crate::Role;
    use crate::testing::{FakeHasher, FakeIdentityStore};

    fn validator() -> (CredentialValidator, Arc<FakeIdentityStore>) {
        let store = Arc::new(FakeIdentityStore::default());
        store.seed("alice", "right-password", Role::User, Tier::Basic);
        (CredentialValidator::new(store.clone(), Arc::new(FakeHasher)), store)
    }

    #[test]
    fn accepts_matching_credentials_and_strips_digest() {
        let (validator, _) = validator();
        let identity = validator.validate("alice", "right-password").unwrap().unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.tier, Tier::Basic);
    }

    #[test]
    fn wrong_password_and_unknown_user_look_the_same() {
        let (validator, _) = validator();
        assert_eq!(validator.validate("alice", "wrong-password").unwrap(), None);
        assert_eq!(validator.validate("mallory", "right-password").unwrap(), None);
    }

    #[test]
    fn store_failures_propagate() {
        let (validator, store) = validator();
        store.fail_reads();
        assert!(validator.validate("alice", "right-password").is_err());
    }
}
