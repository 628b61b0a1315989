//! Aggregation engine.
//!
//! Pure functions over canonical [`ClimbRecord`](crate::models::ClimbRecord)
//! slices already scoped to one climber by the caller. Nothing here touches
//! a store or mutates its input; every function accepts empty input and
//! returns the zero/"N/A" form of its result.

pub mod dashboard;
pub mod profile;
pub mod pyramid;
pub mod sessions;
pub mod stats;

pub use dashboard::dashboard_view;
pub use profile::{profile_view, progress_by_month};
pub use pyramid::grade_pyramid;
pub use sessions::{session_summary, sessions_view};
pub use stats::{dashboard_stats, hardest_in_discipline, hardest_successful, total_sessions};
