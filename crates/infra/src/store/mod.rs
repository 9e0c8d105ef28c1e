//! Storage adapters for the identity and resource repositories.
//!
//! Only in-memory implementations exist today; they back the API binary and
//! the tests.

pub mod in_memory;

pub use in_memory::{InMemoryIdentityStore, InMemoryResourceStore};
