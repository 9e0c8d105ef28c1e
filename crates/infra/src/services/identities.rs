use std::sync::Arc;

use chrono::Utc;

use tiergate_auth::{
    IdentityChanges, IdentityContext, IdentityStore, NewIdentity, PasswordHasher, PublicIdentity,
    RegisterIdentity, Role, TokenClaims,
};
use tiergate_core::{DomainError, DomainResult, IdentityId, Tier};

/// Registration, lookup and update of identities.
#[derive(Clone)]
pub struct IdentityService {
    identities: Arc<dyn IdentityStore>,
    hasher: Arc<dyn PasswordHasher>,
    open_admin_signup: bool,
}

impl IdentityService {
    pub fn new(
        identities: Arc<dyn IdentityStore>,
        hasher: Arc<dyn PasswordHasher>,
        open_admin_signup: bool,
    ) -> Self {
        Self {
            identities,
            hasher,
            open_admin_signup,
        }
    }

    /// Public registration.
    ///
    /// Tier defaults to `free` and role to `user`. Asking for `admin` is
    /// refused unless open admin signup is configured.
    pub fn register(&self, request: RegisterIdentity) -> DomainResult<PublicIdentity> {
        request.validate()?;

        let role = request.role.unwrap_or_default();
        if role.is_admin() && !self.open_admin_signup {
            tracing::warn!(username = %request.username, "admin self-registration refused");
            return Err(DomainError::forbidden("cannot register as admin"));
        }

        if self.identities.find_by_username(&request.username)?.is_some() {
            return Err(DomainError::conflict("username already exists"));
        }

        let password_digest = self.hasher.hash(&request.password)?;
        // The store re-checks uniqueness atomically; a racing registration
        // that slipped past the pre-check still ends in Conflict here.
        let created = self.identities.insert(NewIdentity {
            username: request.username,
            password_digest,
            role,
            tier: request.tier.unwrap_or_default(),
        })?;

        tracing::info!(
            identity_id = %created.id,
            username = %created.username,
            role = %created.role,
            tier = %created.tier,
            "identity registered"
        );
        Ok(created.to_public())
    }

    pub fn list(&self, caller: &IdentityContext) -> DomainResult<Vec<PublicIdentity>> {
        require_admin(caller)?;
        Ok(self
            .identities
            .list_all()?
            .iter()
            .map(|i| i.to_public())
            .collect())
    }

    pub fn get(&self, id: IdentityId, caller: &IdentityContext) -> DomainResult<PublicIdentity> {
        require_admin(caller)?;
        self.identities
            .find_by_id(id)?
            .map(|i| i.to_public())
            .ok_or_else(|| DomainError::not_found(format!("identity {id}")))
    }

    /// Update username, password, tier (self or admin) and role (admin only).
    pub fn update(
        &self,
        id: IdentityId,
        changes: IdentityChanges,
        caller: &IdentityContext,
    ) -> DomainResult<PublicIdentity> {
        changes.validate()?;

        if caller.id() != id && !caller.is_admin() {
            return Err(DomainError::forbidden("you can only update your own account"));
        }
        if changes.role.is_some() && !caller.is_admin() {
            return Err(DomainError::forbidden("only admins can change roles"));
        }

        let mut identity = self
            .identities
            .find_by_id(id)?
            .ok_or_else(|| DomainError::not_found(format!("identity {id}")))?;

        if let Some(username) = changes.username {
            if username != identity.username {
                if self.identities.find_by_username(&username)?.is_some() {
                    return Err(DomainError::conflict("username already exists"));
                }
                identity.username = username;
            }
        }
        if let Some(password) = changes.password {
            identity.password_digest = self.hasher.hash(&password)?;
        }
        if let Some(tier) = changes.tier {
            identity.tier = tier;
        }
        if let Some(role) = changes.role {
            identity.role = role;
        }
        identity.updated_at = Utc::now();

        let saved = self.identities.save(identity)?;
        tracing::info!(
            identity_id = %saved.id,
            caller_id = %caller.id(),
            role = %saved.role,
            tier = %saved.tier,
            "identity updated"
        );
        Ok(saved.to_public())
    }

    /// Make sure an admin named `username` exists, creating one if needed.
    ///
    /// An existing admin is left untouched (password included). A non-admin
    /// already holding the name is a conflict.
    pub fn bootstrap_admin(&self, username: &str, password: &str) -> DomainResult<PublicIdentity> {
        if let Some(existing) = self.identities.find_by_username(username)? {
            if existing.role.is_admin() {
                return Ok(existing.to_public());
            }
            return Err(DomainError::conflict(format!(
                "bootstrap admin username {username} is taken by a non-admin"
            )));
        }

        let request = RegisterIdentity {
            username: username.to_string(),
            password: password.to_string(),
            role: Some(Role::Admin),
            tier: Some(Tier::Enterprise),
        };
        request.validate()?;

        let created = self.identities.insert(NewIdentity {
            username: request.username,
            password_digest: self.hasher.hash(&request.password)?,
            role: Role::Admin,
            tier: Tier::Enterprise,
        })?;
        tracing::info!(identity_id = %created.id, username = %created.username, "bootstrap admin created");
        Ok(created.to_public())
    }

    /// Re-read the token subject so role and tier reflect the store now.
    pub fn resolve(&self, claims: &TokenClaims) -> DomainResult<IdentityContext> {
        let Some(current) = self.identities.find_by_id(claims.sub)? else {
            tracing::warn!(identity_id = %claims.sub, "token subject no longer exists");
            return Err(DomainError::authentication("identity no longer exists"));
        };
        IdentityContext::resolve(claims, &current)
    }
}

fn require_admin(caller: &IdentityContext) -> DomainResult<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(DomainError::forbidden("admin role required"))
    }
}
