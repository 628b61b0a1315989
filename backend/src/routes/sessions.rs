use serde::{Deserialize, Serialize};

use crate::models::{ClimbRecord, SessionRef};

/// Climb count and hardest successful grade for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub total_climbs: usize,
    pub hardest_climb: String,
}

/// One session with every climb it contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session: SessionRef,
    pub session_name: String,
    /// Date of the latest climb (`YYYY-MM-DD`), null when no climb is dated.
    pub session_date: Option<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub climbs: Vec<ClimbRecord>,
}

/// Ordering applied to the session list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionOrder {
    /// Alphabetical by session name.
    #[default]
    Name,
    /// Latest session date first; undated sessions last.
    Recent,
}
