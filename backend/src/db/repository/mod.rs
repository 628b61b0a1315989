//! Repository trait definitions for the climb store.
//!
//! Responsibilities are split across focused traits so each adapter stays
//! small and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`climb`]: Climb reads and writes, including atomic batch insert
//! - [`session`]: Session lifecycle for the relational schema
//!
//! # Convenience Trait Bound
//!
//! For functions that need every capability, use [`FullRepository`]:
//!
//! ```ignore
//! async fn my_service<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<()> {
//!     let session = repo.insert_session(&new_session).await?;
//!     repo.insert_climb(&ClimbRecord::new(session.id)).await?;
//!     Ok(())
//! }
//! ```

pub mod climb;
pub mod error;
pub mod session;

pub use error::{ErrorContext, RepositoryError, RepositoryResult, Subject};

pub use climb::ClimbRepository;
pub use session::SessionRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing both traits.
pub trait FullRepository: ClimbRepository + SessionRepository {}

impl<T> FullRepository for T where T: ClimbRepository + SessionRepository {}
