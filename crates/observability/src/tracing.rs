//! Tracing/logging initialization.
//!
//! JSON lines on stdout, filtered by `RUST_LOG` (default `info`). Every HTTP
//! request runs inside a `request` span carrying a [`RequestId`], so all
//! events emitted while handling it can be correlated.

use std::fmt;

use tracing_subscriber::EnvFilter;
use uuid::Uuid;

const DEFAULT_FILTER: &str = "info";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}

/// Time-ordered correlation id for one request (UUID v7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Reuse a caller-supplied id when it parses as a UUID.
    pub fn parse_or_new(raw: Option<&str>) -> Self {
        raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(Self)
            .unwrap_or_default()
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Span wrapping the handling of one HTTP request.
pub fn request_span(request_id: RequestId, method: &str, path: &str) -> tracing::Span {
    tracing::info_span!("request", request_id = %request_id, method = %method, path = %path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_unique_and_v7() {
        let a = RequestId::new();
        let b = RequestId::new();
        assert_ne!(a, b);
        assert_eq!(a.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn caller_supplied_id_is_kept_when_valid() {
        let given = "0190b2a4-6f1e-7c3a-9d2b-1f2e3d4c5b6a";
        assert_eq!(RequestId::parse_or_new(Some(given)).to_string(), given);

        let fresh = RequestId::parse_or_new(Some("not-a-uuid"));
        assert_eq!(fresh.as_uuid().get_version_num(), 7);
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
    }
}
