use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{climbs, sessions};
use crate::models::{ClimbId, ClimbRecord, NewSession, SessionId, SessionRecord, SessionRef};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = climbs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ClimbRow {
    pub id: i64,
    pub user_name: Option<String>,
    pub session_label: Option<String>,
    pub session_date: Option<NaiveDate>,
    pub discipline: Option<String>,
    pub grade: Option<String>,
    pub ascent_type: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub session_id: Option<i64>,
    pub tags: Option<Value>,
    pub media_url: Option<String>,
}

impl ClimbRow {
    pub fn into_record(self) -> ClimbRecord {
        let session = match (self.session_id, self.session_label.as_ref()) {
            (Some(id), _) => SessionRef::Id(SessionId::new(id)),
            (None, Some(label)) => SessionRef::Label(label.clone()),
            (None, None) => SessionRef::Label(String::new()),
        };
        let session_name = match session {
            SessionRef::Label(ref label) => Some(label.clone()),
            SessionRef::Id(_) => None,
        };
        ClimbRecord {
            id: Some(ClimbId::new(self.id)),
            user_name: self.user_name,
            session,
            session_name,
            discipline: self.discipline,
            grade: self.grade,
            ascent_type: self.ascent_type,
            logged_at: self.logged_at,
            date: self.session_date,
            location: self.location,
            notes: self.notes,
            tags: self.tags.and_then(|tags| serde_json::from_value(tags).ok()),
            media_url: self.media_url,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = climbs)]
pub struct NewClimbRow {
    pub user_name: Option<String>,
    pub session_label: Option<String>,
    pub session_date: Option<NaiveDate>,
    pub discipline: Option<String>,
    pub grade: Option<String>,
    pub ascent_type: Option<String>,
    pub logged_at: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub session_id: Option<i64>,
    pub tags: Option<Value>,
    pub media_url: Option<String>,
}

impl From<&ClimbRecord> for NewClimbRow {
    fn from(record: &ClimbRecord) -> Self {
        let (session_id, session_label) = match &record.session {
            SessionRef::Id(id) => (Some(id.value()), None),
            SessionRef::Label(label) => (None, Some(label.clone())),
        };
        Self {
            user_name: record.user_name.clone(),
            session_label,
            session_date: record.date,
            discipline: record.discipline.clone(),
            grade: record.grade.clone(),
            ascent_type: record.ascent_type.clone(),
            logged_at: record.logged_at,
            location: record.location.clone(),
            notes: record.notes.clone(),
            session_id,
            tags: record
                .tags
                .as_ref()
                .and_then(|tags| serde_json::to_value(tags).ok()),
            media_url: record.media_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SessionRow {
    pub id: i64,
    pub user_name: String,
    pub location: Option<String>,
    pub session_name: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl From<SessionRow> for SessionRecord {
    fn from(row: SessionRow) -> Self {
        Self {
            id: SessionId::new(row.id),
            user_name: row.user_name,
            location: row.location,
            name: row.session_name,
            start_time: row.start_time,
            end_time: row.end_time,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSessionRow {
    pub user_name: String,
    pub location: Option<String>,
    pub session_name: Option<String>,
    pub start_time: DateTime<Utc>,
}

impl From<&NewSession> for NewSessionRow {
    fn from(session: &NewSession) -> Self {
        Self {
            user_name: session.user_name.clone(),
            location: session.location.clone(),
            session_name: session.name.clone(),
            start_time: session.start_time,
        }
    }
}
