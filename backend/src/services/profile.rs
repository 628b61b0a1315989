use std::collections::BTreeMap;

use crate::grades::GradeTable;
use crate::models::{month_key, ClimbRecord};
use crate::routes::profile::{ProfileView, ProgressPoint};

use super::stats::{hardest_successful, total_sessions};

/// Hardest successful grade per calendar month, oldest month first.
///
/// Undated records are skipped. A month whose climbs include no ranked send
/// still appears, with a null grade and rank.
pub fn progress_by_month(records: &[ClimbRecord], grades: &GradeTable) -> Vec<ProgressPoint> {
    let mut months: BTreeMap<String, Vec<&ClimbRecord>> = BTreeMap::new();
    for record in records {
        if let Some(date) = record.climb_date() {
            months.entry(month_key(date)).or_default().push(record);
        }
    }

    months
        .into_iter()
        .map(|(month, climbs)| {
            let hardest = hardest_successful(climbs.iter().copied(), grades);
            ProgressPoint {
                month,
                hardest_grade: hardest.map(str::to_string),
                rank: hardest.and_then(|grade| grades.rank(grade)),
                climbs: climbs.len(),
            }
        })
        .collect()
}

pub fn profile_view(records: &[ClimbRecord], grades: &GradeTable) -> ProfileView {
    ProfileView {
        total_sessions: total_sessions(records),
        progress: progress_by_month(records, grades),
        achievements: Vec::new(),
    }
}
