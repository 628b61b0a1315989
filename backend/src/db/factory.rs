//! Picks and builds the climb store.
//!
//! A `repository.toml` found in [`CONFIG_SEARCH_PATHS`] wins; without one
//! the environment decides (`REPOSITORY_TYPE`, `DATABASE_URL`), and with
//! neither the in-memory store is used.
//!
//! ```ignore
//! let repo = RepositoryFactory::from_default_config().await?;
//! let climbs = repo.fetch_climbs(Some("ana")).await?;
//! ```

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use super::repo_config::{PostgresConfig, RepositoryConfig, CONFIG_SEARCH_PATHS};
use super::repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
use super::repositories::PostgresRepository;
use super::repository::{FullRepository, RepositoryError, RepositoryResult};

/// Which store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum RepositoryType {
    Postgres,
    /// In-memory; contents are lost on restart.
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// `postgres` / `pg` / `local` / `memory`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "pg" => Ok(Self::Postgres),
            "local" | "memory" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl TryFrom<String> for RepositoryType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl RepositoryType {
    /// `REPOSITORY_TYPE` when set (unknown values fall back to Local);
    /// otherwise Postgres if a database URL is present, else Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or_else(|err| {
                log::warn!("{}; falling back to local repository", err);
                Self::Local
            });
        }

        if std::env::var("DATABASE_URL").is_ok() || std::env::var("PG_DATABASE_URL").is_ok() {
            Self::Postgres
        } else {
            Self::Local
        }
    }
}

pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Build a store of the given type. Postgres needs connection settings.
    pub async fn create(
        repo_type: RepositoryType,
        postgres: Option<&PostgresConfig>,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Postgres => {
                let config = postgres.ok_or_else(|| {
                    RepositoryError::configuration(
                        "Postgres store selected without connection settings",
                    )
                })?;
                Self::connect_postgres(config).await
            }
        }
    }

    pub fn create_local() -> Arc<dyn FullRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Connect and migrate off the async runtime; pool setup blocks.
    #[cfg(feature = "postgres-repo")]
    async fn connect_postgres(config: &PostgresConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        config.validate()?;
        let config = config.clone();
        let repo = tokio::task::spawn_blocking(move || PostgresRepository::new(config))
            .await
            .map_err(|e| RepositoryError::internal(format!("Postgres setup task failed: {}", e)))??;
        Ok(Arc::new(repo))
    }

    #[cfg(not(feature = "postgres-repo"))]
    async fn connect_postgres(_config: &PostgresConfig) -> RepositoryResult<Arc<dyn FullRepository>> {
        Err(RepositoryError::configuration(
            "Postgres store not compiled in; rebuild with --features postgres-repo",
        ))
    }

    /// Store selected by the environment alone.
    pub async fn from_env() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::Postgres => {
                let config = PostgresConfig::from_env()?;
                Self::create(RepositoryType::Postgres, Some(&config)).await
            }
        }
    }

    pub async fn from_config_file<P: AsRef<Path>>(
        path: P,
    ) -> RepositoryResult<Arc<dyn FullRepository>> {
        let config = RepositoryConfig::from_file(path)?;
        Self::create(config.repository.kind, config.postgres_config()).await
    }

    /// `repository.toml` when one exists, the environment otherwise.
    pub async fn from_default_config() -> RepositoryResult<Arc<dyn FullRepository>> {
        match RepositoryConfig::locate() {
            Some(path) => {
                log::info!("Using store settings from {}", path.display());
                Self::from_config_file(&path).await
            }
            None => {
                log::info!(
                    "No repository.toml in {:?}; using environment",
                    CONFIG_SEARCH_PATHS
                );
                Self::from_env().await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::ClimbRepository;
    use std::io::Write;

    #[test]
    fn test_repository_type_aliases() {
        assert_eq!("local".parse(), Ok(RepositoryType::Local));
        assert_eq!("memory".parse(), Ok(RepositoryType::Local));
        assert_eq!(" Pg ".parse(), Ok(RepositoryType::Postgres));
        assert!("sqlite".parse::<RepositoryType>().is_err());
    }

    #[tokio::test]
    async fn test_create_local_repository() {
        let repo = RepositoryFactory::create(RepositoryType::Local, None)
            .await
            .unwrap();
        assert!(repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_postgres_without_settings_is_configuration_error() {
        let err = RepositoryFactory::create(RepositoryType::Postgres, None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }

    #[tokio::test]
    async fn test_from_config_file_local() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[repository]\ntype = \"local\"").unwrap();

        let repo = RepositoryFactory::from_config_file(file.path())
            .await
            .unwrap();
        assert!(repo.fetch_climbs(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_from_config_file_rejects_unknown_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[repository]\ntype = \"mongo\"").unwrap();

        let err = RepositoryFactory::from_config_file(file.path())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    }
}
