//! `tiergate-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP. Storage, hashing and
//! signing are consumed through traits; concrete Argon2 / HS256
//! implementations live here too but nothing requires them.

pub mod authenticator;
pub mod claims;
pub mod credentials;
pub mod password;
pub mod policy;
pub mod principal;
pub mod roles;
pub mod store;
pub mod token;
pub mod user;

#[cfg(test)]
mod testing;

pub use authenticator::{Authenticator, LoginOutcome};
pub use claims::{TokenClaims, TokenError, validate_claims};
pub use credentials::CredentialValidator;
pub use password::{Argon2PasswordHasher, PasswordDigest, PasswordHasher};
pub use policy::{authorize_create, authorize_get, authorize_update, list_filter};
pub use principal::IdentityContext;
pub use roles::Role;
pub use store::IdentityStore;
pub use token::{Hs256TokenSigner, TokenSigner};
pub use user::{Identity, IdentityChanges, NewIdentity, PublicIdentity, RegisterIdentity};
