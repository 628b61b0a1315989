use std::cmp::Ordering;
use std::collections::HashMap;

use crate::grades::GradeTable;
use crate::models::{format_date, ClimbRecord, SessionRef};
use crate::routes::sessions::{SessionOrder, SessionSummary, SessionView};
use crate::routes::NOT_AVAILABLE;

use super::stats::hardest_successful;

/// Climb count and hardest send for one session's climbs.
pub fn session_summary(climbs: &[ClimbRecord], grades: &GradeTable) -> SessionSummary {
    SessionSummary {
        total_climbs: climbs.len(),
        hardest_climb: hardest_successful(climbs, grades)
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
    }
}

/// Latest climb first; undated climbs last.
fn most_recent_first(a: &ClimbRecord, b: &ClimbRecord) -> Ordering {
    b.climb_date()
        .cmp(&a.climb_date())
        .then_with(|| b.logged_at.cmp(&a.logged_at))
}

/// Group records into sessions.
///
/// Climbs are sorted most recent first before grouping, so each session's
/// date is taken from its latest dated climb and its climb list reads
/// newest to oldest. Every input record appears in exactly one session.
pub fn sessions_view(
    records: &[ClimbRecord],
    grades: &GradeTable,
    order: SessionOrder,
) -> Vec<SessionView> {
    let mut sorted: Vec<ClimbRecord> = records.to_vec();
    sorted.sort_by(most_recent_first);

    let mut index: HashMap<SessionRef, usize> = HashMap::new();
    let mut groups: Vec<Vec<ClimbRecord>> = Vec::new();
    for record in sorted {
        match index.get(&record.session) {
            Some(&slot) => groups[slot].push(record),
            None => {
                index.insert(record.session.clone(), groups.len());
                groups.push(vec![record]);
            }
        }
    }

    let mut sessions: Vec<SessionView> = groups
        .into_iter()
        .filter_map(|climbs| {
            let first = climbs.first()?;
            Some(SessionView {
                session: first.session.clone(),
                session_name: first.session_display_name(),
                session_date: first.climb_date().map(format_date),
                location: climbs.iter().find_map(|c| c.location.clone()),
                summary: session_summary(&climbs, grades),
                climbs,
            })
        })
        .collect();

    match order {
        SessionOrder::Name => sessions.sort_by(|a, b| {
            a.session_name
                .cmp(&b.session_name)
                .then_with(|| a.session.cmp(&b.session))
        }),
        // ISO dates compare correctly as strings.
        SessionOrder::Recent => sessions.sort_by(|a, b| {
            b.session_date
                .cmp(&a.session_date)
                .then_with(|| a.session_name.cmp(&b.session_name))
        }),
    }

    sessions
}

#[cfg(test)]
#[path = "sessions_tests.rs"]
mod sessions_tests;
