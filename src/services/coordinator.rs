//! Freshness coordinator: the cache/synchronization state machine.
//!
//! For a single `(variant, external_id)` key a resolve call moves through
//! the states Fresh, Stale, Refreshing and Error:
//!
//! ```text
//!            marker == current hour
//!  lookup ──────────────────────────────▶ Fresh ──▶ read sorted
//!     │
//!     │ marker differs                 import ok
//!     ▼                              ┌───────────▶ Fresh ──▶ read sorted
//!   Stale ──▶ Refreshing (per-key lock)
//!                                    └───────────▶ Error ──▶ empty result,
//!                                      import fails          marker untouched
//! ```
//!
//! Refreshes for the same key are serialized by a per-key async mutex;
//! concurrent callers wait for the in-flight replace and then answer from
//! the new complete set, never from a partially-deleted one. Different keys
//! refresh independently and in parallel.

use log::{info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::importer::ImporterGateway;
use crate::models::{Entity, HourMarker, ScheduleRecord, Variant};

/// Directory searches at or below this many characters return no hits.
///
/// The original service used differing thresholds per variant (>2 for
/// groups, >3 elsewhere); this crate uses one threshold for all variants.
pub const MIN_QUERY_LEN: usize = 3;

/// Search hits across all three directory variants.
#[derive(Debug, Clone, Default)]
pub struct DirectoryHits {
    pub groups: Vec<Entity>,
    pub auditoriums: Vec<Entity>,
    pub teachers: Vec<Entity>,
}

impl DirectoryHits {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.auditoriums.is_empty() && self.teachers.is_empty()
    }
}

/// Decides staleness, serializes refresh per entity, performs the replace
/// cycle and reads records back in display order.
///
/// Collaborators are injected at construction: a repository implementing the
/// storage traits and an importer gateway for the remote source. The
/// coordinator itself holds no schedule state — only the per-key lock table
/// that serializes refreshes.
pub struct FreshnessCoordinator<R> {
    repo: Arc<R>,
    importer: Arc<dyn ImporterGateway>,
    refresh_locks: Mutex<HashMap<(Variant, i64), Arc<tokio::sync::Mutex<()>>>>,
}

impl<R: FullRepository + 'static> FreshnessCoordinator<R> {
    /// Create a coordinator over a repository and an importer gateway.
    pub fn new(repo: Arc<R>, importer: Arc<dyn ImporterGateway>) -> Self {
        Self {
            repo,
            importer,
            refresh_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve the schedule for `(variant, external_id)` against the current
    /// wall-clock hour.
    ///
    /// Returns the entity's records in display order, refreshing them from
    /// the remote source first if the cached set is stale. An unknown
    /// external id and a failed import both produce `Ok(vec![])`; only
    /// storage failures surface as `Err`.
    pub async fn resolve(
        &self,
        variant: Variant,
        external_id: i64,
    ) -> RepositoryResult<Vec<ScheduleRecord>> {
        self.resolve_at(variant, external_id, &HourMarker::now()).await
    }

    /// [`resolve`](Self::resolve) against an explicit hour marker.
    ///
    /// The marker is normally the current hour; taking it as a parameter
    /// keeps staleness decisions deterministic under test.
    pub async fn resolve_at(
        &self,
        variant: Variant,
        external_id: i64,
        marker: &HourMarker,
    ) -> RepositoryResult<Vec<ScheduleRecord>> {
        let Some(entity) = self.repo.get_by_external_id(variant, external_id).await? else {
            // Not-found is a normal outcome here; the caller renders it as
            // "nothing found".
            return Ok(Vec::new());
        };

        if entity.last_refreshed_at.as_ref() == Some(marker) {
            return self.repo.records_for_owner(entity.id).await;
        }

        let lock = self.refresh_lock(variant, external_id);
        let guard = lock.lock_owned().await;
        self.refresh_detached(guard, variant, external_id, marker.clone())
            .await?;

        self.repo.records_for_owner(entity.id).await
    }

    /// Search one directory variant by free-text query.
    ///
    /// The query is case-folded before matching; queries of
    /// [`MIN_QUERY_LEN`] characters or fewer return no hits rather than
    /// erroring. Hits come back sorted by display name.
    pub async fn search(&self, variant: Variant, query: &str) -> RepositoryResult<Vec<Entity>> {
        let query = query.trim();
        if query.chars().count() <= MIN_QUERY_LEN {
            return Ok(Vec::new());
        }
        self.repo.search(variant, &query.to_lowercase()).await
    }

    /// Search all three directory variants with one query.
    pub async fn search_all(&self, query: &str) -> RepositoryResult<DirectoryHits> {
        Ok(DirectoryHits {
            groups: self.search(Variant::Group, query).await?,
            auditoriums: self.search(Variant::Auditorium, query).await?,
            teachers: self.search(Variant::Teacher, query).await?,
        })
    }

    /// Get or create the refresh lock for a key.
    fn refresh_lock(&self, variant: Variant, external_id: i64) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.refresh_locks.lock();
        locks.entry((variant, external_id)).or_default().clone()
    }

    /// Run the refresh cycle on a spawned task that owns the per-key guard.
    ///
    /// Spawning shields the replace from caller cancellation: once the
    /// delete has started, the import and reinsert run to completion even if
    /// the caller that triggered them has gone away, and the guard is
    /// released by the task, not by the (possibly dropped) caller future.
    async fn refresh_detached(
        &self,
        guard: tokio::sync::OwnedMutexGuard<()>,
        variant: Variant,
        external_id: i64,
        marker: HourMarker,
    ) -> RepositoryResult<()> {
        let repo = Arc::clone(&self.repo);
        let importer = Arc::clone(&self.importer);

        let handle = tokio::spawn(async move {
            let _guard = guard;
            refresh_if_stale(repo.as_ref(), importer.as_ref(), variant, external_id, &marker).await
        });

        handle
            .await
            .map_err(|e| RepositoryError::InternalError(format!("refresh task failed: {}", e)))?
    }
}

/// Replace an entity's records from the remote source unless a concurrent
/// caller already did so for this hour.
///
/// Runs with the per-key lock held. The marker re-check after acquiring the
/// lock is what collapses N concurrent stale resolves into one import.
async fn refresh_if_stale<R: FullRepository>(
    repo: &R,
    importer: &dyn ImporterGateway,
    variant: Variant,
    external_id: i64,
    marker: &HourMarker,
) -> RepositoryResult<()> {
    let Some(entity) = repo.get_by_external_id(variant, external_id).await? else {
        return Ok(());
    };
    if entity.last_refreshed_at.as_ref() == Some(marker) {
        return Ok(());
    }

    let deleted = repo.delete_for_owner(entity.id).await?;
    info!(
        "Refreshing {} {} for hour {} ({} cached records dropped)",
        variant, external_id, marker, deleted
    );

    match importer.import(variant, external_id).await {
        Ok(records) => {
            repo.insert_records(entity.id, &records).await?;
            repo.mark_refreshed(variant, external_id, marker).await?;
            info!(
                "Imported {} records for {} {}",
                records.len(),
                variant,
                external_id
            );
            Ok(())
        }
        Err(e) => {
            // Marker stays untouched so the next resolve retries the import;
            // until then the entity simply has no records.
            warn!("Import failed for {} {}: {}", variant, external_id, e);
            Ok(())
        }
    }
}
