//! In-memory local repository implementation.
//!
//! This module provides a local implementation of all repository traits
//! suitable for unit testing and local development. All data is stored in
//! memory using HashMap structures, providing fast, deterministic, and
//! isolated execution.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{Entity, EntityId, HourMarker, RawRecord, RecordId, ScheduleRecord, Variant};

/// In-memory local repository.
///
/// Stores the entity directory and all schedule records in memory, making it
/// ideal for unit tests and local development that need isolation and speed.
///
/// # Example
/// ```
/// use timetable_core::db::repositories::LocalRepository;
/// use timetable_core::db::DirectoryRepository;
/// use timetable_core::models::Variant;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let repo = LocalRepository::new();
/// repo.upsert_entity(Variant::Group, 42, "CS-101").await.unwrap();
/// let found = repo.get_by_external_id(Variant::Group, 42).await.unwrap();
/// assert!(found.is_some());
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    entities: HashMap<(Variant, i64), Entity>,
    records: HashMap<RecordId, ScheduleRecord>,

    // ID counters
    next_entity_id: i64,
    next_record_id: i64,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            records: HashMap::new(),
            next_entity_id: 1,
            next_record_id: 1,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        let mut data = self.data.write();
        data.is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of directory entities stored.
    pub fn entity_count(&self) -> usize {
        self.data.read().entities.len()
    }

    /// Get the number of schedule records stored, across all owners.
    pub fn record_count(&self) -> usize {
        self.data.read().records.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        let data = self.data.read();
        if !data.is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Storage is not healthy".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DirectoryRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self.data.read();
        Ok(data.is_healthy)
    }

    async fn upsert_entity(
        &self,
        variant: Variant,
        external_id: i64,
        display_name: &str,
    ) -> RepositoryResult<Entity> {
        self.check_health()?;

        let mut data = self.data.write();
        let entity = match data.entities.get_mut(&(variant, external_id)) {
            Some(existing) => {
                existing.display_name = display_name.to_string();
                existing.search_key = Entity::search_key_for(display_name);
                existing.clone()
            }
            None => {
                let id = EntityId(data.next_entity_id);
                data.next_entity_id += 1;

                let entity = Entity {
                    id,
                    variant,
                    external_id,
                    display_name: display_name.to_string(),
                    search_key: Entity::search_key_for(display_name),
                    last_refreshed_at: None,
                };
                data.entities.insert((variant, external_id), entity.clone());
                entity
            }
        };

        Ok(entity)
    }

    async fn get_by_external_id(
        &self,
        variant: Variant,
        external_id: i64,
    ) -> RepositoryResult<Option<Entity>> {
        self.check_health()?;

        let data = self.data.read();
        Ok(data.entities.get(&(variant, external_id)).cloned())
    }

    async fn search(&self, variant: Variant, needle: &str) -> RepositoryResult<Vec<Entity>> {
        self.check_health()?;

        let data = self.data.read();
        let mut hits: Vec<Entity> = data
            .entities
            .values()
            .filter(|e| e.variant == variant && e.search_key.contains(needle))
            .cloned()
            .collect();

        // external_id as secondary key in case two entities share a name
        hits.sort_by(|a, b| {
            a.display_name
                .cmp(&b.display_name)
                .then(a.external_id.cmp(&b.external_id))
        });
        Ok(hits)
    }

    async fn mark_refreshed(
        &self,
        variant: Variant,
        external_id: i64,
        marker: &HourMarker,
    ) -> RepositoryResult<()> {
        self.check_health()?;

        let mut data = self.data.write();
        let entity = data.entities.get_mut(&(variant, external_id)).ok_or_else(|| {
            RepositoryError::NotFound(format!("{} {} not found", variant, external_id))
        })?;
        entity.last_refreshed_at = Some(marker.clone());
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for LocalRepository {
    async fn delete_for_owner(&self, owner: EntityId) -> RepositoryResult<usize> {
        self.check_health()?;

        let mut data = self.data.write();
        let before = data.records.len();
        data.records.retain(|_, r| r.owner_id != owner);
        Ok(before - data.records.len())
    }

    async fn insert_records(
        &self,
        owner: EntityId,
        records: &[RawRecord],
    ) -> RepositoryResult<usize> {
        self.check_health()?;

        let mut data = self.data.write();
        for raw in records {
            let id = RecordId(data.next_record_id);
            data.next_record_id += 1;

            data.records.insert(
                id,
                ScheduleRecord {
                    id,
                    owner_id: owner,
                    date: raw.date,
                    pair_name: raw.pair_name.clone(),
                    details: raw.details.clone(),
                },
            );
        }
        Ok(records.len())
    }

    async fn records_for_owner(&self, owner: EntityId) -> RepositoryResult<Vec<ScheduleRecord>> {
        self.check_health()?;

        let data = self.data.read();
        let mut records: Vec<ScheduleRecord> = data
            .records
            .values()
            .filter(|r| r.owner_id == owner)
            .cloned()
            .collect();

        records.sort_by(|a, b| a.display_key().cmp(&b.display_key()));
        Ok(records)
    }
}
