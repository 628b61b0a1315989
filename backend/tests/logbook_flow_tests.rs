//! Ingestion through the local store, then every view over the result.

mod support;

use chrono::{TimeZone, Utc};

use climb_log::api::{ClimbLog, GradeTable, LegacyClimbEntry, SessionOrder, SessionRef};
use climb_log::db::repositories::LocalRepository;
use climb_log::db::{self, ClimbRepository};

use climb_log::services;

use support::{climb, date};

fn entry(discipline: &str, grade: &str, ascent: &str) -> LegacyClimbEntry {
    LegacyClimbEntry {
        discipline: Some(discipline.to_string()),
        grade: Some(grade.to_string()),
        ascent_type: Some(ascent.to_string()),
        gym: Some("Vital".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_legacy_and_live_sessions_aggregate_together() {
    let repo = LocalRepository::new();
    let grades = GradeTable::default();
    let april = Utc.with_ymd_and_hms(2024, 4, 20, 18, 0, 0).unwrap();
    let may = Utc.with_ymd_and_hms(2024, 5, 10, 19, 0, 0).unwrap();

    db::save_new_session(
        &repo,
        &[
            entry("Bouldering", "V4", "Send"),
            entry("Sport Climbing", "6a", "Flash"),
        ],
        Some("ana"),
        None,
        april,
    )
    .await
    .unwrap();

    let live = db::start_session(&repo, Some("ana"), Some("Boulderwelt"), may)
        .await
        .unwrap();
    for (grade, ascent) in [("V6", "Attempt"), ("V5", "Send"), ("V5", "Attempt")] {
        let log = ClimbLog {
            session_id: Some(live.id),
            climbing_type: Some("Bouldering".to_string()),
            grade: Some(grade.to_string()),
            ascent_type: Some(ascent.to_string()),
            ..Default::default()
        };
        db::log_climb(&repo, &log, may).await.unwrap();
    }
    db::end_session(&repo, live.id, may).await.unwrap();

    let climbs = db::fetch_user_climbs(&repo, "ana").await.unwrap();
    assert_eq!(climbs.len(), 5);

    let stats = services::dashboard_stats(&climbs, &grades);
    assert_eq!(stats.total_sessions, 2);
    assert_eq!(stats.hardest_boulder, "V5");
    assert_eq!(stats.hardest_sport, "6a");

    let sessions = services::sessions_view(&climbs, &grades, SessionOrder::Recent);
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].session, SessionRef::Id(live.id));
    assert_eq!(sessions[0].session_name, "Boulderwelt");
    assert_eq!(sessions[0].summary.total_climbs, 3);
    assert_eq!(sessions[1].session_name, "Session from 2024-04-20");
    assert_eq!(sessions[1].location.as_deref(), Some("Vital"));

    let profile = services::profile_view(&climbs, &grades);
    let months: Vec<_> = profile.progress.iter().map(|p| p.month.as_str()).collect();
    assert_eq!(months, ["2024-04", "2024-05"]);
    assert_eq!(profile.progress[1].hardest_grade.as_deref(), Some("V5"));

    let stored = db::fetch_user_sessions(&repo, "ana").await.unwrap();
    assert_eq!(stored.len(), 1);

    let dashboard = services::dashboard_view(&climbs, &stored, &grades, may);
    assert_eq!(dashboard.current_project, "V6");
    assert_eq!(dashboard.hardest_send_30_days, "6a");
    assert_eq!(dashboard.total_sessions, 2);
    assert_eq!(dashboard.recent_sessions.len(), 2);
    assert_eq!(dashboard.pyramid_data.get("V5"), Some(&1));
}

#[tokio::test]
async fn test_started_session_shows_on_dashboard_before_first_climb() {
    let repo = LocalRepository::new();
    let grades = GradeTable::default();
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 17, 30, 0).unwrap();

    let live = db::start_session(&repo, Some("ana"), None, now)
        .await
        .unwrap();

    let climbs = db::fetch_user_climbs(&repo, "ana").await.unwrap();
    let stored = db::fetch_user_sessions(&repo, "ana").await.unwrap();
    assert!(climbs.is_empty());

    let dashboard = services::dashboard_view(&climbs, &stored, &grades, now);
    assert_eq!(dashboard.total_sessions, 1);
    assert_eq!(dashboard.recent_sessions.len(), 1);
    assert_eq!(dashboard.recent_sessions[0].id, SessionRef::Id(live.id));
    assert_eq!(dashboard.recent_sessions[0].name, format!("Session {}", live.id));
    assert_eq!(dashboard.recent_sessions[0].date.as_deref(), Some("2024-06-01"));
    assert_eq!(dashboard.hardest_send_30_days, "N/A");
}

#[tokio::test]
async fn test_seeded_records_stay_per_user() {
    let repo = LocalRepository::new();
    repo.seed([
        climb("ana", "Mon", "Bouldering", "V3", "Send").with_date(date(2024, 1, 8)),
        climb("bob", "Mon", "Bouldering", "V9", "Send").with_date(date(2024, 1, 8)),
    ]);

    let ana = repo.fetch_climbs(Some("ana")).await.unwrap();
    let everyone = repo.fetch_climbs(None).await.unwrap();
    assert_eq!(ana.len(), 1);
    assert_eq!(everyone.len(), 2);

    let stats = services::dashboard_stats(&ana, &GradeTable::default());
    assert_eq!(stats.hardest_send, "V3");
}

#[tokio::test]
async fn test_rejected_batch_leaves_store_untouched() {
    let repo = LocalRepository::new();
    let mut broken = entry("Bouldering", "V2", "Send");
    broken.grade = None;

    let result = db::save_new_session(
        &repo,
        &[entry("Bouldering", "V1", "Send"), broken],
        Some("ana"),
        Some("Evening"),
        Utc::now(),
    )
    .await;

    assert!(result.is_err());
    assert_eq!(repo.climb_count(), 0);
}
