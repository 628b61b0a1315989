use std::collections::HashSet;

use crate::grades::GradeTable;
use crate::models::{ClimbRecord, DISCIPLINE_BOULDERING, DISCIPLINE_SPORT};
use crate::routes::stats::DashboardStats;
use crate::routes::NOT_AVAILABLE;

/// Number of distinct sessions referenced by the records.
pub fn total_sessions(records: &[ClimbRecord]) -> usize {
    records
        .iter()
        .map(|record| &record.session)
        .collect::<HashSet<_>>()
        .len()
}

/// Hardest ranked grade among Send/Flash records.
pub fn hardest_successful<'a, I>(records: I, grades: &GradeTable) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a ClimbRecord>,
{
    grades
        .min_by_rank(
            records.into_iter().filter(|record| record.is_successful()),
            |record| record.grade_label(),
        )
        .and_then(ClimbRecord::grade_label)
}

/// Hardest ranked successful grade within one discipline.
pub fn hardest_in_discipline<'a>(
    records: &'a [ClimbRecord],
    discipline: &str,
    grades: &GradeTable,
) -> Option<&'a str> {
    hardest_successful(
        records
            .iter()
            .filter(|record| record.is_discipline(discipline)),
        grades,
    )
}

/// Headline statistics: session count plus hardest sends.
pub fn dashboard_stats(records: &[ClimbRecord], grades: &GradeTable) -> DashboardStats {
    if records.is_empty() {
        return DashboardStats::default();
    }

    let or_na = |grade: Option<&str>| grade.unwrap_or(NOT_AVAILABLE).to_string();

    DashboardStats {
        total_sessions: total_sessions(records),
        hardest_boulder: or_na(hardest_in_discipline(records, DISCIPLINE_BOULDERING, grades)),
        hardest_sport: or_na(hardest_in_discipline(records, DISCIPLINE_SPORT, grades)),
        hardest_send: or_na(hardest_successful(records, grades)),
    }
}

#[cfg(test)]
#[path = "stats_tests.rs"]
mod stats_tests;
