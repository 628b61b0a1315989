use serde::{Deserialize, Serialize};

/// Hardest successful grade within one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPoint {
    /// `YYYY-MM`
    pub month: String,
    pub hardest_grade: Option<String>,
    pub rank: Option<usize>,
    pub climbs: usize,
}

/// Profile page payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileView {
    pub total_sessions: usize,
    pub progress: Vec<ProgressPoint>,
    /// No achievement rules exist yet; always empty.
    pub achievements: Vec<String>,
}
