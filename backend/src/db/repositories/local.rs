//! In-memory local repository implementation.
//!
//! Stores sessions and climbs in memory, suitable for unit tests and local
//! development. Behaves like the relational store: ids are assigned
//! sequentially, a climb referencing a missing session id is rejected, and
//! batch inserts are all-or-nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{ClimbId, ClimbRecord, NewSession, SessionId, SessionRecord, SessionRef};

/// In-memory local repository.
///
/// Cloning shares the underlying data.
///
/// # Example
/// ```
/// use climb_log::db::repositories::LocalRepository;
/// use climb_log::models::ClimbRecord;
///
/// let repo = LocalRepository::new();
/// repo.seed(vec![ClimbRecord::labelled("Morning").with_grade("V3")]);
/// assert_eq!(repo.climb_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    sessions: BTreeMap<SessionId, SessionRecord>,
    climbs: Vec<ClimbRecord>,

    next_session_id: i64,
    next_climb_id: i64,

    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            sessions: BTreeMap::new(),
            climbs: Vec::new(),
            next_session_id: 1,
            next_climb_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalData {
    fn validate_reference(&self, climb: &ClimbRecord) -> RepositoryResult<()> {
        if let SessionRef::Id(id) = climb.session {
            if !self.sessions.contains_key(&id) {
                return Err(RepositoryError::unknown_session("insert_climb", id));
            }
        }
        Ok(())
    }

    fn push_climb(&mut self, climb: &ClimbRecord) -> ClimbId {
        let id = ClimbId::new(self.next_climb_id);
        self.next_climb_id += 1;

        let mut stored = climb.clone();
        stored.id = Some(id);
        if let SessionRef::Id(session_id) = stored.session {
            if let Some(session) = self.sessions.get(&session_id) {
                if stored.user_name.is_none() {
                    stored.user_name = Some(session.user_name.clone());
                }
            }
        }
        self.climbs.push(stored);
        id
    }

    /// Stored climb with session-level fields filled in.
    fn hydrate(&self, climb: &ClimbRecord) -> ClimbRecord {
        match climb.session {
            SessionRef::Id(id) => match self.sessions.get(&id) {
                Some(session) => climb.clone().with_session_details(session),
                None => climb.clone(),
            },
            SessionRef::Label(_) => climb.clone(),
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Store climbs directly, bypassing validation. Test and fixture helper.
    pub fn seed(&self, climbs: impl IntoIterator<Item = ClimbRecord>) {
        let mut data = self.data.write();
        for climb in climbs {
            data.push_climb(&climb);
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn climb_count(&self) -> usize {
        self.data.read().climbs.len()
    }

    pub fn session_count(&self) -> usize {
        self.data.read().sessions.len()
    }

    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClimbRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_climbs(&self, user_name: Option<&str>) -> RepositoryResult<Vec<ClimbRecord>> {
        self.check_health("fetch_climbs")?;
        let data = self.data.read();
        Ok(data
            .climbs
            .iter()
            .map(|climb| data.hydrate(climb))
            .filter(|climb| match user_name {
                Some(user) => climb.user_name.as_deref() == Some(user),
                None => true,
            })
            .collect())
    }

    async fn insert_climb(&self, climb: &ClimbRecord) -> RepositoryResult<ClimbId> {
        self.check_health("insert_climb")?;
        let mut data = self.data.write();
        data.validate_reference(climb)?;
        Ok(data.push_climb(climb))
    }

    async fn insert_climb_batch(&self, climbs: &[ClimbRecord]) -> RepositoryResult<usize> {
        self.check_health("insert_climb_batch")?;
        // Single write guard: validate everything before the first push.
        let mut data = self.data.write();
        for climb in climbs {
            data.validate_reference(climb)
                .map_err(|e| e.with_operation("insert_climb_batch"))?;
        }
        for climb in climbs {
            data.push_climb(climb);
        }
        Ok(climbs.len())
    }
}

#[async_trait]
impl SessionRepository for LocalRepository {
    async fn insert_session(&self, session: &NewSession) -> RepositoryResult<SessionRecord> {
        self.check_health("insert_session")?;
        let mut data = self.data.write();
        let id = SessionId::new(data.next_session_id);
        data.next_session_id += 1;

        let record = SessionRecord {
            id,
            user_name: session.user_name.clone(),
            location: session.location.clone(),
            name: session.name.clone(),
            start_time: session.start_time,
            end_time: None,
        };
        data.sessions.insert(id, record.clone());
        Ok(record)
    }

    async fn get_session(&self, session_id: SessionId) -> RepositoryResult<Option<SessionRecord>> {
        self.check_health("get_session")?;
        Ok(self.data.read().sessions.get(&session_id).cloned())
    }

    async fn close_session(
        &self,
        session_id: SessionId,
        end_time: DateTime<Utc>,
    ) -> RepositoryResult<Option<SessionRecord>> {
        self.check_health("close_session")?;
        let mut data = self.data.write();
        Ok(data.sessions.get_mut(&session_id).map(|session| {
            if session.end_time.is_none() {
                session.end_time = Some(end_time);
            }
            session.clone()
        }))
    }

    async fn list_sessions(&self, user_name: &str) -> RepositoryResult<Vec<SessionRecord>> {
        self.check_health("list_sessions")?;
        let data = self.data.read();
        let mut sessions: Vec<SessionRecord> = data
            .sessions
            .values()
            .filter(|session| session.user_name == user_name)
            .cloned()
            .collect();
        sessions.sort_by_key(|session| (session.start_time, session.id));
        Ok(sessions)
    }
}
