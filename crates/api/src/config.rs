//! Process configuration, read once at startup from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};
use axum::http::HeaderValue;
use chrono::TimeDelta;

use txguard_auth::{DEFAULT_TOKEN_TTL_SECS, SigningSecret};
use txguard_infra::DEFAULT_PAGE_LIMIT;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

/// Browser origins allowed to call the API cross-origin.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsOrigins {
    /// Any origin. Tokens travel in the `Authorization` header, never cookies.
    #[default]
    Any,
    /// Exactly these origins.
    List(Vec<HeaderValue>),
}

impl CorsOrigins {
    /// Parse `*` or a comma-separated origin list.
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok(Self::Any);
        }

        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin).with_context(|| format!("invalid origin '{origin}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        if origins.is_empty() {
            bail!("no origins listed");
        }
        Ok(Self::List(origins))
    }
}

/// Immutable startup configuration.
///
/// Handed to the service builder once; request paths never read the
/// environment themselves.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub jwt_secret: SigningSecret,
    pub token_ttl: TimeDelta,
    pub bind_addr: SocketAddr,
    pub principals_file: Option<PathBuf>,
    pub dataset_file: Option<PathBuf>,
    pub dev_seed_principals: bool,
    pub page_limit: usize,
    pub database_url: Option<String>,
    pub cors_origins: CorsOrigins,
}

impl ApiConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    ///
    /// A missing or too-short `JWT_SECRET` is fatal: the process must not
    /// serve traffic without a signing key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .context("JWT_SECRET must be set")?;
        let jwt_secret = SigningSecret::new(secret.into_bytes()).context("JWT_SECRET rejected")?;

        let ttl_secs = parse_or("TOKEN_TTL_SECS", &lookup, DEFAULT_TOKEN_TTL_SECS)?;
        if ttl_secs <= 0 {
            bail!("TOKEN_TTL_SECS must be positive, got {ttl_secs}");
        }
        let Some(token_ttl) = TimeDelta::try_seconds(ttl_secs) else {
            bail!("TOKEN_TTL_SECS is out of range, got {ttl_secs}");
        };

        let mut bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR is not a socket address")?;
        if let Some(port) = lookup("PORT") {
            bind_addr.set_port(port.parse().context("PORT is not a port number")?);
        }

        let page_limit = parse_or("PAGE_LIMIT", &lookup, DEFAULT_PAGE_LIMIT)?;
        if page_limit == 0 {
            bail!("PAGE_LIMIT must be at least 1");
        }

        let cors_origins = match lookup("CORS_ALLOWED_ORIGINS") {
            Some(raw) => CorsOrigins::parse(&raw).context("CORS_ALLOWED_ORIGINS rejected")?,
            None => CorsOrigins::Any,
        };

        Ok(Self {
            jwt_secret,
            token_ttl,
            bind_addr,
            principals_file: lookup("PRINCIPALS_FILE").map(PathBuf::from),
            dataset_file: lookup("DATASET_FILE").map(PathBuf::from),
            dev_seed_principals: parse_or("DEV_SEED_PRINCIPALS", &lookup, false)?,
            page_limit,
            database_url: lookup("DATABASE_URL").filter(|s| !s.is_empty()),
            cors_origins,
        })
    }
}

fn parse_or<T>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> anyhow::Result<T>
where
    T: core::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
