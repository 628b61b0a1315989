//! Climb persistence trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{ClimbId, ClimbRecord};

/// Storage for climb rows, whichever schema generation they use.
///
/// Implementations return records already in canonical form, with
/// session-level fields (name, location, date) filled from the owning
/// session where the store keeps them separately.
#[async_trait]
pub trait ClimbRepository: Send + Sync {
    /// Check if the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// All climbs, or only those belonging to `user_name` when given.
    ///
    /// An unknown user yields an empty list, never an error.
    async fn fetch_climbs(&self, user_name: Option<&str>) -> RepositoryResult<Vec<ClimbRecord>>;

    /// Insert one climb and return its assigned id.
    ///
    /// A record pointing at a session id that does not exist is rejected
    /// with a validation error.
    async fn insert_climb(&self, climb: &ClimbRecord) -> RepositoryResult<ClimbId>;

    /// Insert every climb or none of them.
    ///
    /// # Returns
    /// * `Ok(n)` - number of rows written, always `climbs.len()`
    /// * `Err(RepositoryError)` - nothing was written
    async fn insert_climb_batch(&self, climbs: &[ClimbRecord]) -> RepositoryResult<usize>;
}
