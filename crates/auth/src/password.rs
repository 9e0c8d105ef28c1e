//! One-way password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use tiergate_core::{DomainError, DomainResult};

/// Opaque password digest (PHC string for the Argon2 hasher).
///
/// `Debug` is redacted so digests never end up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Password hashing capability.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plain: &str) -> DomainResult<PasswordDigest>;

    /// `false` on mismatch and on digests this hasher cannot parse.
    fn verify(&self, plain: &str, digest: &PasswordDigest) -> bool;
}

/// Argon2id hasher with a random salt per digest.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Argon2PasswordHasher {
    /// Argon2id with the crate's recommended default cost.
    pub fn new() -> Self {
        Self {
            params: Params::default(),
        }
    }

    /// Custom cost (memory in KiB, iterations, lanes).
    pub fn with_cost(memory_kib: u32, iterations: u32, parallelism: u32) -> DomainResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| DomainError::infrastructure(format!("invalid argon2 parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plain: &str) -> DomainResult<PasswordDigest> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| DomainError::infrastructure(format!("password hashing failed: {e}")))?;
        Ok(PasswordDigest::new(hash.to_string()))
    }

    fn verify(&self, plain: &str, digest: &PasswordDigest) -> bool {
        let Ok(parsed) = PasswordHash::new(digest.as_str()) else {
            tracing::warn!("stored password digest is not a valid PHC string");
            return false;
        };
        self.argon2().verify_password(plain.as_bytes(), &parsed).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap_hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_cost(1024, 1, 1).unwrap()
    }

    #[test]
    fn hash_then_verify_accepts_the_same_password() {
        let hasher = cheap_hasher();
        let digest = hasher.hash("correct horse").unwrap();
        assert!(digest.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify("correct horse", &digest));
        assert!(!hasher.verify("battery staple", &digest));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let hasher = cheap_hasher();
        let a = hasher.hash("password123").unwrap();
        let b = hasher.hash("password123").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_digest_never_verifies() {
        let hasher = cheap_hasher();
        assert!(!hasher.verify("anything", &PasswordDigest::new("not-a-phc-string")));
    }

    #[test]
    fn debug_output_is_redacted() {
        let digest = PasswordDigest::new("$argon2id$v=19$secret");
        assert_eq!(format!("{digest:?}"), "PasswordDigest(<redacted>)");
    }

    #[test]
    fn rejects_invalid_cost() {
        assert!(matches!(
            Argon2PasswordHasher::with_cost(1024, 0, 1),
            Err(DomainError::Infrastructure(_))
        ));
    }
}
