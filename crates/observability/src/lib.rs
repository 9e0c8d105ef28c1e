//! Tracing and request correlation (shared setup).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers) and request spans.
pub mod tracing;

pub use self::tracing::{RequestId, request_span};
