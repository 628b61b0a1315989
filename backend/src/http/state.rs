//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::grades::GradeTable;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Climb store
    pub repository: Arc<dyn FullRepository>,
    /// Ordering used for every "hardest" computation
    pub grades: Arc<GradeTable>,
}

impl AppState {
    /// State with the built-in grade table.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_grades(repository, GradeTable::default())
    }

    pub fn with_grades(repository: Arc<dyn FullRepository>, grades: GradeTable) -> Self {
        Self {
            repository,
            grades: Arc::new(grades),
        }
    }
}
