//! Repository trait definitions for storage operations.
//!
//! This module provides a collection of focused repository traits that
//! abstract the storage backend. By splitting responsibilities across
//! multiple traits, implementations can be more focused and testable.
//!
//! # Module Organization
//!
//! - [`error`]: Error types for repository operations
//! - [`directory`]: Entity directory lookups, search and refresh markers
//! - [`record`]: Owned schedule records and the replace cycle
//!
//! # Trait Composition
//!
//! A complete repository implementation implements both traits:
//!
//! ```ignore
//! impl DirectoryRepository for MyRepo { ... }
//! impl RecordRepository for MyRepo { ... }
//! ```
//!
//! For functions that need the whole storage surface, use the
//! [`FullRepository`] trait bound:
//!
//! ```ignore
//! async fn refresh<R: FullRepository>(repo: &R, owner: EntityId) -> RepositoryResult<()> {
//!     repo.delete_for_owner(owner).await?;
//!     // ...
//!     Ok(())
//! }
//! ```

pub mod directory;
pub mod error;
pub mod record;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use directory::DirectoryRepository;
pub use record::RecordRepository;

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type that implements both repository
/// traits. Use this as a convenient bound when an operation spans the
/// directory and the record store — the refresh cycle does.
pub trait FullRepository: DirectoryRepository + RecordRepository {}

// Blanket implementation: any type implementing both traits automatically implements FullRepository
impl<T> FullRepository for T where T: DirectoryRepository + RecordRepository {}
