//! Schedule record repository trait.
//!
//! Owned timetable entries, replaced wholesale by refresh cycles.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{EntityId, RawRecord, ScheduleRecord};

/// Repository trait for schedule records.
///
/// The store never merges: a refresh cycle deletes every record an entity
/// owns and bulk-inserts the freshly imported set, so the stored content for
/// an entity always reflects exactly one completed import.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Delete all records owned by an entity.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records deleted (0 if none existed)
    /// * `Err(RepositoryError)` - If the operation fails
    async fn delete_for_owner(&self, owner: EntityId) -> RepositoryResult<usize>;

    /// Bulk-insert imported records under a single owner.
    ///
    /// Record ids are assigned in input order, which makes insertion order
    /// the stable tie-breaker for display sorting.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of records inserted
    /// * `Err(RepositoryError)` - If the operation fails
    async fn insert_records(
        &self,
        owner: EntityId,
        records: &[RawRecord],
    ) -> RepositoryResult<usize>;

    /// Read all records owned by an entity in display order: ascending by
    /// `date`, then `pair_name`, then record id.
    async fn records_for_owner(&self, owner: EntityId) -> RepositoryResult<Vec<ScheduleRecord>>;
}
