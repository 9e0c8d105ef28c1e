//! Identity model: registered principals and the requests that shape them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tiergate_core::{DomainError, DomainResult, Entity, IdentityId, Tier};

use crate::{PasswordDigest, Role};

const USERNAME_MIN_LEN: usize = 3;
const PASSWORD_MIN_LEN: usize = 6;

/// A stored identity, digest included.
///
/// Never leaves the auth boundary or the services as-is; hand out
/// [`PublicIdentity`] instead.
///
/// # Invariants
/// - `username` is globally unique.
/// - `tier` is always set (`Tier::Free` unless registration chose otherwise).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: IdentityId,
    pub username: String,
    pub password_digest: PasswordDigest,
    pub role: Role,
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identity {
    /// Materialize a new identity under a store-assigned id.
    pub fn from_new(id: IdentityId, new: NewIdentity, now: DateTime<Utc>) -> Self {
        Self {
            id,
            username: new.username,
            password_digest: new.password_digest,
            role: new.role,
            tier: new.tier,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id,
            username: self.username.clone(),
            role: self.role,
            tier: self.tier,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Entity for Identity {
    type Id = IdentityId;

    fn id(&self) -> IdentityId {
        self.id
    }
}

/// Identity with the password digest stripped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicIdentity {
    pub id: IdentityId,
    pub username: String,
    pub role: Role,
    pub tier: Tier,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Identity> for PublicIdentity {
    fn from(value: Identity) -> Self {
        Self {
            id: value.id,
            username: value.username,
            role: value.role,
            tier: value.tier,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Insert payload for [`crate::IdentityStore::insert`] (already hashed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub username: String,
    pub password_digest: PasswordDigest,
    pub role: Role,
    pub tier: Tier,
}

/// Registration request.
#[derive(Clone, Serialize, Deserialize)]
pub struct RegisterIdentity {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub tier: Option<Tier>,
}

impl RegisterIdentity {
    pub fn validate(&self) -> DomainResult<()> {
        validate_username(&self.username)?;
        validate_password(&self.password)
    }
}

impl core::fmt::Debug for RegisterIdentity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegisterIdentity")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .field("tier", &self.tier)
            .finish()
    }
}

/// Partial identity update. Absent fields keep their value.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct IdentityChanges {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub tier: Option<Tier>,
    #[serde(default)]
    pub role: Option<Role>,
}

impl IdentityChanges {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(username) = &self.username {
            validate_username(username)?;
        }
        if let Some(password) = &self.password {
            validate_password(password)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none() && self.tier.is_none() && self.role.is_none()
    }
}

impl core::fmt::Debug for IdentityChanges {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdentityChanges")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("tier", &self.tier)
            .field("role", &self.role)
            .finish()
    }
}

pub fn validate_username(username: &str) -> DomainResult<()> {
    if username.trim().is_empty() {
        return Err(DomainError::validation("username must not be empty"));
    }
    if username.chars().count() < USERNAME_MIN_LEN {
        return Err(DomainError::validation(format!(
            "username must be at least {USERNAME_MIN_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> DomainResult<()> {
    if password.is_empty() {
        return Err(DomainError::validation("password must not be empty"));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(DomainError::validation(format!(
            "password must be at least {PASSWORD_MIN_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(username: &str, password: &str) -> RegisterIdentity {
        RegisterIdentity {
            username: username.to_string(),
            password: password.to_string(),
            role: None,
            tier: None,
        }
    }

    #[test]
    fn registration_validation() {
        assert!(registration("alice", "secret1").validate().is_ok());
        assert!(registration("al", "secret1").validate().is_err());
        assert!(registration("alice", "short").validate().is_err());
        assert_eq!(
            registration("   ", "secret1").validate(),
            Err(DomainError::validation("username must not be empty"))
        );
    }

    #[test]
    fn registration_defaults_optional_fields() {
        let req: RegisterIdentity =
            serde_json::from_str(r#"{"username":"alice","password":"secret1"}"#).unwrap();
        assert_eq!(req.role, None);
        assert_eq!(req.tier, None);
    }

    #[test]
    fn debug_never_prints_plaintext_passwords() {
        let req = registration("alice", "hunter22");
        assert!(!format!("{req:?}").contains("hunter22"));

        let changes = IdentityChanges {
            password: Some("hunter22".to_string()),
            ..Default::default()
        };
        assert!(!format!("{changes:?}").contains("hunter22"));
    }

    #[test]
    fn public_identity_has_no_digest_field() {
        let now = Utc::now();
        let identity = Identity::from_new(
            IdentityId::new(1),
            NewIdentity {
                username: "alice".to_string(),
                password_digest: PasswordDigest::new("$argon2id$..."),
                role: Role::User,
                tier: Tier::Basic,
            },
            now,
        );
        let json = serde_json::to_value(identity.to_public()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("password_digest"));
        assert!(!obj.contains_key("password"));
        assert_eq!(json["tier"], "basic");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn changes_validate_only_present_fields() {
        assert!(IdentityChanges::default().validate().is_ok());
        assert!(IdentityChanges::default().is_empty());
        let bad = IdentityChanges {
            username: Some("ab".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
