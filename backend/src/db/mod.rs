//! Climb store access.
//!
//! Storage goes through the Repository pattern so backends can be swapped
//! without touching ingestion or aggregation code.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (http/)                                  │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - Input validation before any write                    │
//! │  - Session lifecycle, climb logging, batch upload       │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/)                        │
//! │  - ClimbRepository, SessionRepository                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────────┐  ┌──────────▼──────────────┐
//! │ Postgres Repository  │  │ Local Repository        │
//! │ (Diesel, migrations) │  │ (in-memory)             │
//! └──────────────────────┘  └─────────────────────────┘
//! ```
//!
//! Both adapters hand back canonical [`ClimbRecord`](crate::models::ClimbRecord)s,
//! so the aggregation functions in [`crate::services`] never see a row shape.

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;


pub use services::{
    end_session, fetch_user_climbs, fetch_user_sessions, health_check, log_climb,
    save_new_session, start_session,
};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{PostgresConfig, RepositoryConfig};
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    ClimbRepository, ErrorContext, FullRepository, RepositoryError, RepositoryResult,
    SessionRepository, Subject,
};
