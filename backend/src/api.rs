//! Public API surface for the climbing log backend.
//!
//! This file consolidates the DTO types for the HTTP API.
//! All types derive Serialize/Deserialize for JSON serialization.

pub use crate::grades::GradeTable;
pub use crate::models::{ClimbId, ClimbRecord, NewSession, SessionId, SessionRecord, SessionRef};
pub use crate::routes::dashboard::{DashboardView, RecentSession};
pub use crate::routes::ingestion::{ClimbLog, LegacyClimbEntry, SavedSession};
pub use crate::routes::profile::{ProfileView, ProgressPoint};
pub use crate::routes::pyramid::GradePyramid;
pub use crate::routes::sessions::{SessionOrder, SessionSummary, SessionView};
pub use crate::routes::stats::DashboardStats;
pub use crate::routes::NOT_AVAILABLE;
