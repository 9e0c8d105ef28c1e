use tiergate_core::{DomainError, DomainResult, IdentityId, Tier};

use crate::{Identity, PublicIdentity, Role, TokenClaims};

/// The resolved caller attached to every policy decision.
///
/// Role and tier must come from a fresh store read, not from the token: a
/// context built from claims alone has no tier, and any decision that needs
/// one fails with an invariant violation instead of guessing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    id: IdentityId,
    username: String,
    role: Role,
    tier: Option<Tier>,
}

impl IdentityContext {
    pub fn new(id: IdentityId, username: impl Into<String>, role: Role, tier: Tier) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            tier: Some(tier),
        }
    }

    /// Unresolved context: token claims only, no tier.
    pub fn from_claims(claims: &TokenClaims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username.clone(),
            role: claims.role,
            tier: None,
        }
    }

    /// Combine verified claims with the identity's current stored state.
    ///
    /// Username, role and tier are taken from `current`.
    pub fn resolve(claims: &TokenClaims, current: &Identity) -> DomainResult<Self> {
        if claims.sub != current.id {
            return Err(DomainError::invariant(format!(
                "token subject {} resolved to identity {}",
                claims.sub, current.id
            )));
        }
        Ok(Self::from(current))
    }

    pub fn id(&self) -> IdentityId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }

    /// The caller's tier, or a fatal invariant violation if it was never resolved.
    pub fn require_tier(&self) -> DomainResult<Tier> {
        self.tier.ok_or_else(|| {
            DomainError::invariant(format!("identity {} has no tier", self.id))
        })
    }
}

impl From<&Identity> for IdentityContext {
    fn from(value: &Identity) -> Self {
        Self::new(value.id, value.username.clone(), value.role, value.tier)
    }
}

impl From<&PublicIdentity> for IdentityContext {
    fn from(value: &PublicIdentity) -> Self {
        Self::new(value.id, value.username.clone(), value.role, value.tier)
    }
}
