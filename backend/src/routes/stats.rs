use serde::{Deserialize, Serialize};

use super::NOT_AVAILABLE;

/// Headline statistics for one climber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_sessions: usize,
    pub hardest_boulder: String,
    pub hardest_sport: String,
    pub hardest_send: String,
}

impl Default for DashboardStats {
    fn default() -> Self {
        Self {
            total_sessions: 0,
            hardest_boulder: NOT_AVAILABLE.to_string(),
            hardest_sport: NOT_AVAILABLE.to_string(),
            hardest_send: NOT_AVAILABLE.to_string(),
        }
    }
}
