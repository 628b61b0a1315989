//! Store settings: `repository.toml` and the `PG_*` environment.
//!
//! ```toml
//! [repository]
//! type = "postgres"
//!
//! [postgres]
//! database_url = "postgres://climber@localhost/climbs"
//! max_connections = 10
//! ```
//!
//! Every `[postgres]` key is optional except `database_url`, which is
//! required once `type` selects Postgres.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::factory::RepositoryType;
use super::repository::{RepositoryError, RepositoryResult};

/// Probed in order for `repository.toml`; the first file found wins.
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "repository.toml",
    "backend/repository.toml",
    "../repository.toml",
];

#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConfig {
    pub repository: StoreSection,
    #[serde(default)]
    pub postgres: PostgresConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(rename = "type")]
    pub kind: RepositoryType,
}

/// How to reach the Postgres climb store.
///
/// Always compiled, so a file naming Postgres still parses in a build
/// without the `postgres-repo` feature; the factory rejects it there.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostgresConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    /// Extra attempts after a transient failure; the delay doubles each time.
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
            max_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl PostgresConfig {
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }

    /// Read `DATABASE_URL` (or `PG_DATABASE_URL`) plus the optional
    /// `PG_POOL_MAX`, `PG_POOL_MIN`, `PG_CONN_TIMEOUT_SEC`,
    /// `PG_IDLE_TIMEOUT_SEC`, `PG_MAX_RETRIES` and `PG_RETRY_DELAY_MS`.
    /// Malformed numbers fall back to the defaults.
    pub fn from_env() -> RepositoryResult<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| {
                RepositoryError::configuration("DATABASE_URL or PG_DATABASE_URL must be set")
            })?;

        let defaults = Self::default();
        let config = Self {
            database_url,
            max_connections: env_or("PG_POOL_MAX", defaults.max_connections),
            min_connections: env_or("PG_POOL_MIN", defaults.min_connections),
            connect_timeout_secs: env_or("PG_CONN_TIMEOUT_SEC", defaults.connect_timeout_secs),
            idle_timeout_secs: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_secs),
            max_retries: env_or("PG_MAX_RETRIES", defaults.max_retries),
            retry_delay_ms: env_or("PG_RETRY_DELAY_MS", defaults.retry_delay_ms),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pool would refuse or silently misread.
    pub fn validate(&self) -> RepositoryResult<()> {
        let url = self.database_url.trim();
        if url.is_empty() {
            return Err(RepositoryError::configuration(
                "Postgres store requires 'postgres.database_url'",
            ));
        }
        if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
            return Err(RepositoryError::configuration(
                "database_url must start with postgres:// or postgresql://",
            ));
        }
        if self.max_connections == 0 {
            return Err(RepositoryError::configuration(
                "max_connections must be at least 1",
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(RepositoryError::configuration(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl RepositoryConfig {
    /// Parse a config document; Postgres settings are validated only when
    /// Postgres is selected.
    pub fn parse(content: &str) -> RepositoryResult<Self> {
        let config: RepositoryConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse repository config: {}", e))
        })?;
        if config.repository.kind == RepositoryType::Postgres {
            config.postgres.validate()?;
        }
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// First existing file among [`CONFIG_SEARCH_PATHS`].
    pub fn locate() -> Option<PathBuf> {
        CONFIG_SEARCH_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.is_file())
    }

    /// Postgres settings, when the file selects Postgres.
    pub fn postgres_config(&self) -> Option<&PostgresConfig> {
        (self.repository.kind == RepositoryType::Postgres).then_some(&self.postgres)
    }
}
