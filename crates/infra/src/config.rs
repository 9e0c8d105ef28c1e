//! Process configuration from environment variables.
//!
//! | variable                      | default        |
//! |-------------------------------|----------------|
//! | `TIERGATE_BIND_ADDR`          | `0.0.0.0:8080` |
//! | `JWT_SECRET`                  | `dev-secret`   |
//! | `TIERGATE_TOKEN_TTL_MINUTES`  | `60`           |
//! | `TIERGATE_ADMIN_USERNAME`     | unset          |
//! | `TIERGATE_ADMIN_PASSWORD`     | unset          |
//! | `TIERGATE_OPEN_ADMIN_SIGNUP`  | `false`        |
//!
//! Unset variables fall back to the default; set-but-malformed ones are errors.

use std::net::SocketAddr;

use anyhow::{Context, bail};
use chrono::Duration;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_SECRET: &str = "dev-secret";
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Credentials for the admin created at startup if missing.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub open_admin_signup: bool,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("bootstrap_admin", &self.bootstrap_admin)
            .field("open_admin_signup", &self.open_admin_signup)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (tests pass a map here).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("TIERGATE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("TIERGATE_BIND_ADDR must be a socket address like 0.0.0.0:8080")?;

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            Some(_) => bail!("JWT_SECRET must not be empty"),
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_SECRET.to_string()
            }
        };

        let ttl_minutes = match lookup("TIERGATE_TOKEN_TTL_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .with_context(|| format!("TIERGATE_TOKEN_TTL_MINUTES is not a number: {raw}"))?,
            None => DEFAULT_TOKEN_TTL_MINUTES,
        };
        if ttl_minutes <= 0 {
            bail!("TIERGATE_TOKEN_TTL_MINUTES must be positive, got {ttl_minutes}");
        }

        let bootstrap_admin = match (
            lookup("TIERGATE_ADMIN_USERNAME"),
            lookup("TIERGATE_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) => Some(BootstrapAdmin { username, password }),
            (None, None) => None,
            _ => bail!("TIERGATE_ADMIN_USERNAME and TIERGATE_ADMIN_PASSWORD must be set together"),
        };

        let open_admin_signup = match lookup("TIERGATE_OPEN_ADMIN_SIGNUP") {
            Some(raw) => parse_flag(&raw)
                .with_context(|| format!("TIERGATE_OPEN_ADMIN_SIGNUP is not a boolean: {raw}"))?,
            None => false,
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            token_ttl: Duration::minutes(ttl_minutes),
            bootstrap_admin,
            open_admin_signup,
        })
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected true/false, got {other}"),
    }
}
