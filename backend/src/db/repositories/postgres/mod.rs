//! Postgres climb store (Diesel, r2d2).
//!
//! The embedded migrations reproduce both schema generations: the single
//! `climbs` table keyed by session label, then the `sessions` table that
//! climbs reference by id. Rows of either shape are read back as canonical
//! [`ClimbRecord`]s.
//!
//! Connection settings come from [`PostgresConfig`]. Every query runs on a
//! blocking thread and is retried with exponential backoff while the
//! failure is transient (pool checkout timeout, serialization conflict).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::task;

use crate::db::repo_config::PostgresConfig;
use crate::db::repository::{
    ClimbRepository, ErrorContext, RepositoryError, RepositoryResult, SessionRepository,
};
use crate::models::{ClimbId, ClimbRecord, NewSession, SessionId, SessionRecord, SessionRef};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Rows per INSERT; keeps a batch under Postgres' bind-parameter cap.
const INSERT_CHUNK: usize = 1000;

/// Retry schedule for transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Backoff {
    max_retries: u32,
    first_delay: Duration,
}

impl Backoff {
    fn from_config(config: &PostgresConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            first_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Wait before retry `n` (1-based): the first delay, doubled each time.
    fn delay(&self, n: u32) -> Duration {
        self.first_delay
            .saturating_mul(1u32 << n.saturating_sub(1).min(16))
    }
}

/// Run `f` on a pooled connection, retrying while the error is retryable.
///
/// Errors that leave without an operation name are tagged with `operation`.
fn run_with_retry<T>(
    pool: &PgPool,
    backoff: Backoff,
    operation: &str,
    mut f: impl FnMut(&mut PgConnection) -> RepositoryResult<T>,
) -> RepositoryResult<T> {
    let mut retry = 0;
    loop {
        let result = pool
            .get()
            .map_err(RepositoryError::from)
            .and_then(|mut conn| f(&mut conn));

        match result {
            Err(err) if err.is_retryable() && retry < backoff.max_retries => {
                retry += 1;
                log::warn!(
                    "{} failed ({}); retry {}/{}",
                    operation,
                    err.message(),
                    retry,
                    backoff.max_retries
                );
                std::thread::sleep(backoff.delay(retry));
            }
            Err(err) if err.context().operation.is_none() => {
                return Err(err.with_operation(operation))
            }
            other => return other,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    backoff: Backoff,
}

impl PostgresRepository {
    /// Build the pool and apply pending migrations. Blocks.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url.as_str());
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .min_idle(Some(config.min_connections))
            .connection_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_secs)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_connections={}", config.max_connections)),
                )
            })?;

        let mut conn = pool.get().map_err(RepositoryError::from)?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal(format!("Migration failed: {}", e))
                .with_operation("run_migrations")
        })?;
        for version in &applied {
            log::info!("Applied climb store migration {}", version);
        }
        drop(conn);

        log::info!(
            "Postgres repository ready (pool max={}, min={})",
            config.max_connections,
            config.min_connections
        );
        Ok(Self {
            pool,
            backoff: Backoff::from_config(&config),
        })
    }

    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnMut(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let backoff = self.backoff;
        task::spawn_blocking(move || run_with_retry(&pool, backoff, operation, f))
            .await
            .map_err(|e| {
                RepositoryError::internal(format!("Blocking task failed: {}", e))
                    .with_operation(operation)
            })?
    }
}

/// Load the referenced sessions, failing on the first id that is missing.
fn ensure_sessions_exist(
    conn: &mut PgConnection,
    climbs: &[ClimbRecord],
    operation: &str,
) -> RepositoryResult<HashMap<i64, SessionRow>> {
    let wanted: BTreeSet<i64> = climbs
        .iter()
        .filter_map(|climb| match climb.session {
            SessionRef::Id(id) => Some(id.value()),
            SessionRef::Label(_) => None,
        })
        .collect();
    if wanted.is_empty() {
        return Ok(HashMap::new());
    }

    let found: HashMap<i64, SessionRow> = sessions::table
        .filter(sessions::id.eq_any(wanted.iter().copied().collect::<Vec<_>>()))
        .select(SessionRow::as_select())
        .load::<SessionRow>(conn)?
        .into_iter()
        .map(|row| (row.id, row))
        .collect();

    match wanted.iter().find(|id| !found.contains_key(*id)) {
        Some(&missing) => Err(RepositoryError::unknown_session(
            operation,
            SessionId::new(missing),
        )),
        None => Ok(found),
    }
}

/// Insert row for a climb, inheriting the owner from its session.
fn new_climb_row(climb: &ClimbRecord, sessions: &HashMap<i64, SessionRow>) -> NewClimbRow {
    let mut row = NewClimbRow::from(climb);
    if row.user_name.is_none() {
        row.user_name = row
            .session_id
            .and_then(|id| sessions.get(&id))
            .map(|session| session.user_name.clone());
    }
    row
}

#[async_trait]
impl ClimbRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1").execute(conn)?;
            Ok(true)
        })
        .await
    }

    async fn fetch_climbs(&self, user_name: Option<&str>) -> RepositoryResult<Vec<ClimbRecord>> {
        let user_name = user_name.map(str::to_string);
        self.with_conn("fetch_climbs", move |conn| {
            let mut query = climbs::table.select(ClimbRow::as_select()).into_boxed();
            if let Some(user) = &user_name {
                query = query.filter(climbs::user_name.eq(user));
            }
            let rows = query.order(climbs::id.asc()).load::<ClimbRow>(conn)?;

            let session_ids: Vec<i64> = rows
                .iter()
                .filter_map(|row| row.session_id)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let owners: HashMap<i64, SessionRecord> = if session_ids.is_empty() {
                HashMap::new()
            } else {
                sessions::table
                    .filter(sessions::id.eq_any(session_ids))
                    .select(SessionRow::as_select())
                    .load::<SessionRow>(conn)?
                    .into_iter()
                    .map(|row| (row.id, SessionRecord::from(row)))
                    .collect()
            };

            Ok(rows
                .into_iter()
                .map(|row| {
                    let owner = row.session_id.and_then(|id| owners.get(&id));
                    let record = row.into_record();
                    match owner {
                        Some(session) => record.with_session_details(session),
                        None => record,
                    }
                })
                .collect())
        })
        .await
    }

    async fn insert_climb(&self, climb: &ClimbRecord) -> RepositoryResult<ClimbId> {
        let climb = climb.clone();
        self.with_conn("insert_climb", move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                let owners =
                    ensure_sessions_exist(tx, std::slice::from_ref(&climb), "insert_climb")?;
                let id: i64 = diesel::insert_into(climbs::table)
                    .values(&new_climb_row(&climb, &owners))
                    .returning(climbs::id)
                    .get_result(tx)?;
                Ok(ClimbId::new(id))
            })
        })
        .await
    }

    async fn insert_climb_batch(&self, records: &[ClimbRecord]) -> RepositoryResult<usize> {
        let batch = records.to_vec();
        self.with_conn("insert_climb_batch", move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                let owners = ensure_sessions_exist(tx, &batch, "insert_climb_batch")?;
                let rows: Vec<NewClimbRow> = batch
                    .iter()
                    .map(|climb| new_climb_row(climb, &owners))
                    .collect();

                let mut written = 0;
                for chunk in rows.chunks(INSERT_CHUNK) {
                    written += diesel::insert_into(climbs::table)
                        .values(chunk)
                        .execute(tx)?;
                }
                Ok(written)
            })
        })
        .await
    }
}

#[async_trait]
impl SessionRepository for PostgresRepository {
    async fn insert_session(&self, session: &NewSession) -> RepositoryResult<SessionRecord> {
        let row = NewSessionRow::from(session);
        self.with_conn("insert_session", move |conn| {
            let stored = diesel::insert_into(sessions::table)
                .values(&row)
                .returning(SessionRow::as_returning())
                .get_result::<SessionRow>(conn)?;
            Ok(SessionRecord::from(stored))
        })
        .await
    }

    async fn get_session(&self, session_id: SessionId) -> RepositoryResult<Option<SessionRecord>> {
        self.with_conn("get_session", move |conn| {
            let row = sessions::table
                .find(session_id.value())
                .select(SessionRow::as_select())
                .first::<SessionRow>(conn)
                .optional()?;
            Ok(row.map(SessionRecord::from))
        })
        .await
    }

    async fn close_session(
        &self,
        session_id: SessionId,
        end_time: DateTime<Utc>,
    ) -> RepositoryResult<Option<SessionRecord>> {
        self.with_conn("close_session", move |conn| {
            conn.transaction::<_, RepositoryError, _>(|tx| {
                // Only open sessions are touched, so the first end time sticks.
                diesel::update(
                    sessions::table
                        .find(session_id.value())
                        .filter(sessions::end_time.is_null()),
                )
                .set(sessions::end_time.eq(Some(end_time)))
                .execute(tx)?;

                let row = sessions::table
                    .find(session_id.value())
                    .select(SessionRow::as_select())
                    .first::<SessionRow>(tx)
                    .optional()?;
                Ok(row.map(SessionRecord::from))
            })
        })
        .await
    }

    async fn list_sessions(&self, user_name: &str) -> RepositoryResult<Vec<SessionRecord>> {
        let user_name = user_name.to_string();
        self.with_conn("list_sessions", move |conn| {
            let rows = sessions::table
                .filter(sessions::user_name.eq(&user_name))
                .order((sessions::start_time.asc(), sessions::id.asc()))
                .select(SessionRow::as_select())
                .load::<SessionRow>(conn)?;
            Ok(rows.into_iter().map(SessionRecord::from).collect())
        })
        .await
    }
}
