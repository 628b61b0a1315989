use std::collections::HashSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::grades::GradeTable;
use crate::models::{format_date, ClimbRecord, SessionRecord, SessionRef};
use crate::routes::dashboard::{DashboardView, RecentSession};
use crate::routes::sessions::SessionOrder;
use crate::routes::NOT_AVAILABLE;

use super::pyramid::grade_pyramid;
use super::sessions::sessions_view;
use super::stats::hardest_successful;

pub const RECENT_WINDOW_DAYS: i64 = 30;
pub const RECENT_SESSION_LIMIT: usize = 3;

fn in_window(record: &ClimbRecord, start: NaiveDate, end: NaiveDate) -> bool {
    record
        .climb_date()
        .map(|date| date >= start && date <= end)
        .unwrap_or(false)
}

/// Hardest grade attempted in the window but never sent or flashed there.
fn current_project<'g>(window: &[&ClimbRecord], grades: &'g GradeTable) -> Option<&'g str> {
    let sent: HashSet<&str> = window
        .iter()
        .filter(|record| record.is_successful())
        .filter_map(|record| record.grade_label())
        .collect();

    grades.hardest(
        window
            .iter()
            .copied()
            .filter(|record| record.is_attempt())
            .filter_map(ClimbRecord::grade_label)
            .filter(|grade| !sent.contains(grade)),
    )
}

/// Newest sessions first: those with climbs, plus stored sessions that
/// have none yet (a session that was just started).
fn recent_sessions(
    records: &[ClimbRecord],
    sessions: &[SessionRecord],
    grades: &GradeTable,
) -> Vec<RecentSession> {
    let mut recent: Vec<RecentSession> = sessions_view(records, grades, SessionOrder::Recent)
        .into_iter()
        .map(|session| RecentSession {
            id: session.session,
            name: session.session_name,
            location: session.location,
            date: session.session_date,
        })
        .collect();

    let seen: HashSet<SessionRef> = recent.iter().map(|entry| entry.id.clone()).collect();
    recent.extend(
        sessions
            .iter()
            .filter(|session| !seen.contains(&SessionRef::Id(session.id)))
            .map(|session| RecentSession {
                id: SessionRef::Id(session.id),
                name: session.display_name(),
                location: session.location.clone(),
                date: Some(format_date(session.start_time.date_naive())),
            }),
    );

    // Stable, so climbed sessions stay ahead of empty ones on the same day.
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(RECENT_SESSION_LIMIT);
    recent
}

/// Dashboard KPIs relative to `now`.
///
/// The 30-day window covers dated climbs from `now - 30 days` through
/// `now`, inclusive, by calendar date. `sessions` are the user's stored
/// sessions; they count toward the totals even before a climb is logged.
pub fn dashboard_view(
    records: &[ClimbRecord],
    sessions: &[SessionRecord],
    grades: &GradeTable,
    now: DateTime<Utc>,
) -> DashboardView {
    let end = now.date_naive();
    let start = end - Duration::days(RECENT_WINDOW_DAYS);
    let window: Vec<&ClimbRecord> = records
        .iter()
        .filter(|record| in_window(record, start, end))
        .collect();

    let total_sessions = records
        .iter()
        .map(|record| record.session.clone())
        .chain(sessions.iter().map(|session| SessionRef::Id(session.id)))
        .collect::<HashSet<_>>()
        .len();

    DashboardView {
        hardest_send_30_days: hardest_successful(window.iter().copied(), grades)
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        total_sessions,
        current_project: current_project(&window, grades)
            .unwrap_or(NOT_AVAILABLE)
            .to_string(),
        pyramid_data: grade_pyramid(records),
        recent_sessions: recent_sessions(records, sessions, grades),
    }
}

#[cfg(test)]
#[path = "dashboard_tests.rs"]
mod dashboard_tests;
