//! Application services (orchestration).
//!
//! Each service composes the pure access policy with the storage traits:
//!
//! ```text
//! request
//!   ↓
//! 1. Validate input (typed DomainError::Validation)
//!   ↓
//! 2. Read current state from the store
//!   ↓
//! 3. Policy decision (pure, tiergate-auth::policy)
//!   ↓
//! 4. Persist (only when allowed)
//! ```
//!
//! Policy failures propagate unchanged; services never reinterpret them.

pub mod identities;
pub mod resources;

pub use identities::IdentityService;
pub use resources::ResourceService;
