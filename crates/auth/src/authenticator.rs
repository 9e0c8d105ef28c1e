use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use tiergate_core::{DomainError, DomainResult};

use crate::{CredentialValidator, PublicIdentity, TokenClaims, TokenSigner};

/// Successful login: a signed token plus the digest-free identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub user: PublicIdentity,
}

/// Composes credential validation and token signing into `login`.
#[derive(Clone)]
pub struct Authenticator {
    credentials: CredentialValidator,
    signer: Arc<dyn TokenSigner>,
    ttl: Duration,
}

impl Authenticator {
    pub fn new(credentials: CredentialValidator, signer: Arc<dyn TokenSigner>, ttl: Duration) -> Self {
        Self {
            credentials,
            signer,
            ttl,
        }
    }

    /// Verify credentials and issue a token valid from `now` for the configured ttl.
    ///
    /// The token carries `{sub, username, role}` and no tier.
    pub fn login(&self, username: &str, password: &str, now: DateTime<Utc>) -> DomainResult<LoginOutcome> {
        let Some(user) = self.credentials.validate(username, password)? else {
            tracing::warn!(username, "login rejected");
            return Err(DomainError::authentication("invalid credentials"));
        };

        let claims = TokenClaims::new(user.id, user.username.clone(), user.role, now, self.ttl);
        let access_token = self
            .signer
            .sign(&claims)
            .map_err(|e| DomainError::infrastructure(e.to_string()))?;

        tracing::info!(identity_id = %user.id, role = %user.role, "login succeeded");
        Ok(LoginOutcome { access_token, user })
    }
}
