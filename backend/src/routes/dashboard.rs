use serde::{Deserialize, Serialize};

use super::pyramid::GradePyramid;
use crate::models::SessionRef;

/// Entry in the dashboard's recent activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentSession {
    pub id: SessionRef,
    pub name: String,
    pub location: Option<String>,
    pub date: Option<String>,
}

/// Dashboard KPI payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub hardest_send_30_days: String,
    pub total_sessions: usize,
    pub current_project: String,
    pub pyramid_data: GradePyramid,
    pub recent_sessions: Vec<RecentSession>,
}
