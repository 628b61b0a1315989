//! Request and response bodies specific to the HTTP API.
//!
//! View payloads (stats, sessions, pyramid, profile, dashboard) are the
//! `routes` types, re-exported here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub use crate::api::{
    ClimbId, ClimbLog, DashboardStats, DashboardView, GradePyramid, LegacyClimbEntry,
    ProfileView, SessionId, SessionOrder, SessionView,
};

/// POST /api/session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaveSessionRequest {
    #[serde(default)]
    pub climbs: Option<Vec<LegacyClimbEntry>>,
    #[serde(rename = "userName", alias = "user_name", default)]
    pub user_name: Option<String>,
    #[serde(rename = "sessionName", alias = "session_name", default)]
    pub session_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveSessionResponse {
    pub status: String,
    pub message: String,
    pub session_name: String,
    pub session_date: NaiveDate,
    pub climbs_saved: usize,
}

/// POST /api/session/start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartSessionRequest {
    #[serde(rename = "userName", alias = "user_name", default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: SessionId,
    pub start_time: DateTime<Utc>,
}

/// POST /api/session/end
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndSessionRequest {
    #[serde(default)]
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndSessionResponse {
    pub status: String,
    pub session_id: SessionId,
    /// Null when the session does not exist.
    pub end_time: Option<DateTime<Utc>>,
}

/// POST /api/climb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogClimbResponse {
    pub status: String,
    pub climb_id: ClimbId,
}

/// Query string for GET /api/sessions/{user}
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionsQuery {
    #[serde(default)]
    pub order: Option<SessionOrder>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
