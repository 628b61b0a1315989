//! View and input types, one module per endpoint family.

pub mod dashboard;
pub mod ingestion;
pub mod profile;
pub mod pyramid;
pub mod sessions;
pub mod stats;

/// Placeholder returned wherever no grade qualifies.
pub const NOT_AVAILABLE: &str = "N/A";
