//! Session persistence trait for the relational schema.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::RepositoryResult;
use crate::models::{NewSession, SessionId, SessionRecord};

#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a session row and return it with its assigned id.
    async fn insert_session(&self, session: &NewSession) -> RepositoryResult<SessionRecord>;

    /// Look up a session; `Ok(None)` when it does not exist.
    async fn get_session(&self, session_id: SessionId) -> RepositoryResult<Option<SessionRecord>>;

    /// Set the end time of an open session.
    ///
    /// A session that is already closed keeps its first end time. Returns
    /// the session as stored afterwards, or `Ok(None)` for an unknown id.
    async fn close_session(
        &self,
        session_id: SessionId,
        end_time: DateTime<Utc>,
    ) -> RepositoryResult<Option<SessionRecord>>;

    /// Sessions started by `user_name`, oldest first.
    async fn list_sessions(&self, user_name: &str) -> RepositoryResult<Vec<SessionRecord>>;
}
