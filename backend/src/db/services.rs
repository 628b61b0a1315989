//! Session/climb ingestion and read orchestration.
//!
//! Repository-agnostic operations over any [`FullRepository`]. Input is
//! validated here, before any store mutation, so every adapter rejects the
//! same requests with the same messages.
//!
//! # Usage
//!
//! ```no_run
//! use chrono::Utc;
//! use climb_log::db::{services, repositories::LocalRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let session = services::start_session(&repo, Some("ana"), Some("Vital"), Utc::now()).await?;
//!     services::end_session(&repo, session.id, Utc::now()).await?;
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::models::{
    format_date, parse_timestamp, ClimbId, ClimbRecord, NewSession, SessionId, SessionRecord,
    ASCENT_SEND,
};
use crate::routes::ingestion::{ClimbLog, LegacyClimbEntry, SavedSession};

/// Trimmed value, or `None` when absent or blank.
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn missing(field: &str, operation: &str) -> RepositoryError {
    warn!("{} rejected: missing '{}'", operation, field);
    RepositoryError::missing_field(operation, field)
}

// ==================== Health & Reads ====================

/// Check if the store is reachable.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Every climb owned by `user_name`, in canonical form.
///
/// An unknown user has no climbs; that is an empty list, not an error.
pub async fn fetch_user_climbs<R: FullRepository + ?Sized>(
    repo: &R,
    user_name: &str,
) -> RepositoryResult<Vec<ClimbRecord>> {
    let climbs = repo.fetch_climbs(Some(user_name)).await?;
    debug!("Fetched {} climbs for '{}'", climbs.len(), user_name);
    Ok(climbs)
}

/// Stored sessions owned by `user_name`, including ones with no climbs yet.
pub async fn fetch_user_sessions<R: FullRepository + ?Sized>(
    repo: &R,
    user_name: &str,
) -> RepositoryResult<Vec<SessionRecord>> {
    let sessions = repo.list_sessions(user_name).await?;
    debug!("Fetched {} sessions for '{}'", sessions.len(), user_name);
    Ok(sessions)
}

// ==================== Session Lifecycle ====================

/// Open a session for `user_name` starting at `now`.
pub async fn start_session<R: FullRepository + ?Sized>(
    repo: &R,
    user_name: Option<&str>,
    location: Option<&str>,
    now: DateTime<Utc>,
) -> RepositoryResult<SessionRecord> {
    let user_name = present(user_name).ok_or_else(|| missing("userName", "start_session"))?;

    let session = repo
        .insert_session(&NewSession {
            user_name: user_name.to_string(),
            location: present(location).map(str::to_string),
            name: None,
            start_time: now,
        })
        .await?;

    info!(
        "Started session {} for '{}' at {:?}",
        session.id, session.user_name, session.location
    );
    Ok(session)
}

/// Close a session at `now`.
///
/// Closing twice keeps the first end time. An unknown id is a no-op and
/// yields `Ok(None)`.
pub async fn end_session<R: FullRepository + ?Sized>(
    repo: &R,
    session_id: SessionId,
    now: DateTime<Utc>,
) -> RepositoryResult<Option<SessionRecord>> {
    let closed = repo.close_session(session_id, now).await?;
    match &closed {
        Some(session) => info!("Ended session {} at {:?}", session.id, session.end_time),
        None => warn!("end_session: session {} does not exist", session_id),
    }
    Ok(closed)
}

/// Append one climb to a running session, logged at `now`.
///
/// # Errors
/// `ValidationError` when `session_id`, `grade` or `ascent_type` is missing,
/// or when the session does not exist.
pub async fn log_climb<R: FullRepository + ?Sized>(
    repo: &R,
    climb: &ClimbLog,
    now: DateTime<Utc>,
) -> RepositoryResult<ClimbId> {
    let session_id = climb
        .session_id
        .ok_or_else(|| missing("session_id", "log_climb"))?;
    let grade = present(climb.grade.as_deref()).ok_or_else(|| missing("grade", "log_climb"))?;
    let ascent_type = present(climb.ascent_type.as_deref())
        .ok_or_else(|| missing("ascent_type", "log_climb"))?;

    let session = repo.get_session(session_id).await?.ok_or_else(|| {
        warn!("log_climb rejected: session {} does not exist", session_id);
        RepositoryError::unknown_session("log_climb", session_id)
    })?;

    let mut record = ClimbRecord::new(session_id)
        .with_user(session.user_name.as_str())
        .with_grade(grade)
        .with_ascent(ascent_type)
        .with_logged_at(now);
    record.discipline = present(climb.climbing_type.as_deref()).map(str::to_string);
    record.notes = present(climb.notes.as_deref()).map(str::to_string);
    record.media_url = present(climb.media_url.as_deref()).map(str::to_string);
    record.tags = climb.tags.clone();

    let id = repo.insert_climb(&record).await?;
    info!("Logged climb {} ({} {}) in session {}", id, grade, ascent_type, session_id);
    Ok(id)
}

// ==================== Legacy Batch Upload ====================

/// Name used when a batch arrives without one.
pub fn default_session_name(date: chrono::NaiveDate) -> String {
    format!("Session from {}", format_date(date))
}

/// Convert one legacy entry, or name the field that makes it unusable.
fn legacy_record(
    index: usize,
    entry: &LegacyClimbEntry,
    session_name: &str,
    user_name: &str,
    now: DateTime<Utc>,
) -> RepositoryResult<ClimbRecord> {
    let discipline = present(entry.discipline.as_deref())
        .ok_or_else(|| missing(&format!("climbs[{}].Discipline", index), "save_new_session"))?;
    let grade = present(entry.grade.as_deref())
        .ok_or_else(|| missing(&format!("climbs[{}].Grade", index), "save_new_session"))?;

    // The legacy log only ever held completed climbs.
    let ascent_type = present(entry.ascent_type.as_deref()).unwrap_or(ASCENT_SEND);
    let logged_at = match present(entry.timestamp.as_deref()) {
        Some(raw) => parse_timestamp(raw),
        None => Some(now),
    };

    let mut record = ClimbRecord::labelled(session_name)
        .with_user(user_name)
        .with_discipline(discipline)
        .with_grade(grade)
        .with_ascent(ascent_type)
        .with_date(now.date_naive());
    record.logged_at = logged_at;
    record.location = present(entry.gym.as_deref()).map(str::to_string);
    record.notes = present(entry.notes.as_deref()).map(str::to_string);
    Ok(record)
}

/// Save a batch of legacy climb entries as one labelled session dated today.
///
/// Every entry is validated before anything is written, and the batch is
/// inserted atomically: either all rows land or none do.
///
/// # Errors
/// `ValidationError` when `climbs` is empty, `user_name` is missing, or any
/// entry lacks a `Discipline` or `Grade`.
pub async fn save_new_session<R: FullRepository + ?Sized>(
    repo: &R,
    climbs: &[LegacyClimbEntry],
    user_name: Option<&str>,
    session_name: Option<&str>,
    now: DateTime<Utc>,
) -> RepositoryResult<SavedSession> {
    if climbs.is_empty() {
        return Err(missing("climbs", "save_new_session"));
    }
    let user_name = present(user_name).ok_or_else(|| missing("userName", "save_new_session"))?;

    let session_date = now.date_naive();
    let session_name = present(session_name)
        .map(str::to_string)
        .unwrap_or_else(|| default_session_name(session_date));

    let records = climbs
        .iter()
        .enumerate()
        .map(|(index, entry)| legacy_record(index, entry, &session_name, user_name, now))
        .collect::<RepositoryResult<Vec<_>>>()?;

    let climbs_saved = repo.insert_climb_batch(&records).await?;
    info!(
        "Saved session '{}' for '{}' with {} climbs",
        session_name, user_name, climbs_saved
    );

    Ok(SavedSession {
        session_name,
        session_date,
        climbs_saved,
    })
}
