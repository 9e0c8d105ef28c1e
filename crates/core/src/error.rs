//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every policy and service outcome that is not a success is one of these
/// variants. Services propagate them unchanged; only the HTTP boundary maps
/// them to transport statuses.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A request failed validation before reaching the engine.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Credentials did not match a known identity.
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// A uniqueness constraint was violated (e.g. duplicate username).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A requested identity or resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Role, ownership or tier rules deny the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// An internal invariant was violated (e.g. caller context without a tier).
    ///
    /// Fatal: never retried or recovered from inside the engine.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A collaborator (store, password hasher, token signer) failed.
    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    /// Whether this error signals a broken invariant rather than a rejection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, DomainError::InvariantViolation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_message() {
        let e = DomainError::forbidden("cannot set tier higher than own tier");
        assert_eq!(e.to_string(), "forbidden: cannot set tier higher than own tier");

        let e = DomainError::authentication("invalid credentials");
        assert_eq!(e.to_string(), "authentication failed: invalid credentials");
    }

    #[test]
    fn only_invariant_violations_are_fatal() {
        assert!(DomainError::invariant("identity has no tier").is_fatal());
        assert!(!DomainError::forbidden("nope").is_fatal());
        assert!(!DomainError::not_found("resource 1").is_fatal());
        assert!(!DomainError::infrastructure("lock poisoned").is_fatal());
    }
}
