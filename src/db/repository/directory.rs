//! Entity directory repository trait.
//!
//! One row per lookup subject (group, auditorium or teacher), keyed
//! externally by `(variant, external_id)`.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Entity, HourMarker, Variant};

/// Repository trait for the entity directory.
///
/// The directory is read-heavy: lookups and substring search never mutate
/// state. Writes happen on two paths only — lazy population via
/// [`upsert_entity`](DirectoryRepository::upsert_entity) and the refresh
/// marker update at the end of a successful refresh cycle.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// Check if the storage backend is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if the backend is reachable
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Insert or update a directory entity.
    ///
    /// Keyed on `(variant, external_id)`. On update the process-local id and
    /// the refresh marker are preserved; `search_key` is recomputed from the
    /// new display name in both cases.
    ///
    /// # Returns
    /// * `Ok(Entity)` - The stored row, including its assigned id
    /// * `Err(RepositoryError)` - If the operation fails
    async fn upsert_entity(
        &self,
        variant: Variant,
        external_id: i64,
        display_name: &str,
    ) -> RepositoryResult<Entity>;

    /// Look up an entity by its external identifier.
    ///
    /// # Returns
    /// * `Ok(Some(Entity))` - The matching row
    /// * `Ok(None)` - No entity with this id exists for the variant
    /// * `Err(RepositoryError)` - If the operation fails
    async fn get_by_external_id(
        &self,
        variant: Variant,
        external_id: i64,
    ) -> RepositoryResult<Option<Entity>>;

    /// Find entities whose `search_key` contains `needle` as a substring.
    ///
    /// `needle` must already be case-folded; length policy is the caller's
    /// concern. Results are sorted lexicographically by `display_name` so
    /// repeated searches are deterministic.
    async fn search(&self, variant: Variant, needle: &str) -> RepositoryResult<Vec<Entity>>;

    /// Set the refresh marker of an entity.
    ///
    /// # Returns
    /// * `Ok(())` - Marker updated
    /// * `Err(RepositoryError::NotFound)` - If the entity doesn't exist
    /// * `Err(RepositoryError)` - If the operation fails
    async fn mark_refreshed(
        &self,
        variant: Variant,
        external_id: i64,
        marker: &HourMarker,
    ) -> RepositoryResult<()>;
}
