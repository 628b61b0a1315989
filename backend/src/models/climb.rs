//! Canonical climb and session record shapes.
//!
//! Every store adapter normalizes into these types before anything is
//! aggregated, whichever schema generation the rows came from: legacy rows
//! tag each climb with a free-text session label, relational rows reference
//! a `sessions` row by id.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ClimbId, SessionId};

pub const ASCENT_SEND: &str = "Send";
pub const ASCENT_FLASH: &str = "Flash";
pub const ASCENT_ATTEMPT: &str = "Attempt";

pub const DISCIPLINE_BOULDERING: &str = "Bouldering";
pub const DISCIPLINE_SPORT: &str = "Sport Climbing";

/// Whether an ascent type counts as a completed (clean) ascent.
pub fn is_successful_ascent(ascent_type: &str) -> bool {
    let ascent_type = ascent_type.trim();
    ascent_type.eq_ignore_ascii_case(ASCENT_SEND) || ascent_type.eq_ignore_ascii_case(ASCENT_FLASH)
}

/// Whether an ascent type records an unfinished attempt.
pub fn is_attempt(ascent_type: &str) -> bool {
    ascent_type.trim().eq_ignore_ascii_case(ASCENT_ATTEMPT)
}

/// Reference from a climb to the session it belongs to.
///
/// Serialized untagged: a number for relational sessions, a string for
/// legacy labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionRef {
    /// Row in the `sessions` table.
    Id(SessionId),
    /// Free-text label from the single-table schema.
    Label(String),
}

impl fmt::Display for SessionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionRef::Id(id) => write!(f, "Session {}", id),
            SessionRef::Label(label) => f.write_str(label),
        }
    }
}

impl From<SessionId> for SessionRef {
    fn from(id: SessionId) -> Self {
        SessionRef::Id(id)
    }
}

/// One logged climb in canonical form.
///
/// Optional fields serialize as `null` rather than being omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimbRecord {
    pub id: Option<ClimbId>,
    pub user_name: Option<String>,
    pub session: SessionRef,
    pub session_name: Option<String>,
    pub discipline: Option<String>,
    pub grade: Option<String>,
    pub ascent_type: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
    /// Calendar date stored with legacy rows; derived from `logged_at` otherwise.
    pub date: Option<NaiveDate>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub media_url: Option<String>,
}

impl ClimbRecord {
    /// Empty record attached to a session.
    pub fn new(session: impl Into<SessionRef>) -> Self {
        Self {
            id: None,
            user_name: None,
            session: session.into(),
            session_name: None,
            discipline: None,
            grade: None,
            ascent_type: None,
            logged_at: None,
            date: None,
            location: None,
            notes: None,
            tags: None,
            media_url: None,
        }
    }

    /// Empty record attached to a legacy session label.
    pub fn labelled(label: impl Into<String>) -> Self {
        let label = label.into();
        let mut record = Self::new(SessionRef::Label(label.clone()));
        record.session_name = Some(label);
        record
    }

    pub fn with_user(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_discipline(mut self, discipline: impl Into<String>) -> Self {
        self.discipline = Some(discipline.into());
        self
    }

    pub fn with_grade(mut self, grade: impl Into<String>) -> Self {
        self.grade = Some(grade.into());
        self
    }

    pub fn with_ascent(mut self, ascent_type: impl Into<String>) -> Self {
        self.ascent_type = Some(ascent_type.into());
        self
    }

    pub fn with_logged_at(mut self, logged_at: DateTime<Utc>) -> Self {
        self.logged_at = Some(logged_at);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Calendar date of the climb: the stored date, else the log time's date.
    pub fn climb_date(&self) -> Option<NaiveDate> {
        self.date
            .or_else(|| self.logged_at.map(|logged_at| logged_at.date_naive()))
    }

    /// True for Send/Flash ascents.
    pub fn is_successful(&self) -> bool {
        self.ascent_type
            .as_deref()
            .map(is_successful_ascent)
            .unwrap_or(false)
    }

    /// True for explicit Attempt rows.
    pub fn is_attempt(&self) -> bool {
        self.ascent_type.as_deref().map(is_attempt).unwrap_or(false)
    }

    /// Trimmed, non-empty grade label.
    pub fn grade_label(&self) -> Option<&str> {
        self.grade
            .as_deref()
            .map(str::trim)
            .filter(|grade| !grade.is_empty())
    }

    /// Whether the record belongs to the given discipline (exact, trimmed).
    pub fn is_discipline(&self, discipline: &str) -> bool {
        self.discipline
            .as_deref()
            .map(|d| d.trim() == discipline)
            .unwrap_or(false)
    }

    /// Name shown for the climb's session.
    pub fn session_display_name(&self) -> String {
        self.session_name
            .clone()
            .unwrap_or_else(|| self.session.to_string())
    }

    /// Fill session-level fields from the owning `sessions` row.
    ///
    /// Climb-level values win where both are present.
    pub fn with_session_details(mut self, session: &SessionRecord) -> Self {
        if self.session_name.is_none() {
            self.session_name = session.name.clone().or_else(|| session.location.clone());
        }
        if self.location.is_none() {
            self.location = session.location.clone();
        }
        if self.user_name.is_none() {
            self.user_name = Some(session.user_name.clone());
        }
        if self.date.is_none() {
            self.date = self.logged_at.map(|logged_at| logged_at.date_naive());
        }
        self
    }
}

/// A climbing outing in the relational schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub user_name: String,
    pub location: Option<String>,
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl SessionRecord {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Name, else location, else `Session <id>`.
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.location.clone())
            .unwrap_or_else(|| SessionRef::Id(self.id).to_string())
    }
}

/// Insert shape for a new session row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub user_name: String,
    pub location: Option<String>,
    pub name: Option<String>,
    pub start_time: DateTime<Utc>,
}
