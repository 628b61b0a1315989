use crate::models::ClimbRecord;
use crate::routes::pyramid::GradePyramid;

/// Count Send/Flash records per grade label.
///
/// Buckets are keyed by the trimmed label as logged, not by rank, so labels
/// missing from the grade table still get a bucket.
pub fn grade_pyramid(records: &[ClimbRecord]) -> GradePyramid {
    let mut pyramid = GradePyramid::new();
    for grade in records
        .iter()
        .filter(|record| record.is_successful())
        .filter_map(ClimbRecord::grade_label)
    {
        *pyramid.entry(grade.to_string()).or_insert(0) += 1;
    }
    pyramid
}
