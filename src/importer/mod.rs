//! Importer gateway: the boundary to the remote schedule source.
//!
//! The coordinator treats the remote source as an opaque, possibly slow,
//! possibly failing operation that produces a fresh, complete set of
//! timetable entries for one entity. How the data is fetched and parsed is
//! an external collaborator's concern; timeout policy belongs to the
//! implementation, and a timeout is reported like any other failure.

use async_trait::async_trait;

use crate::models::{RawRecord, Variant};

/// Error type for import operations.
///
/// Every variant is non-fatal to the caller of the coordinator: a failed
/// import surfaces as an empty result and leaves the refresh marker
/// untouched, so the next request retries.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Remote source unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Import timed out after {0}s")]
    Timeout(u64),

    #[error("Invalid payload from remote source: {0}")]
    InvalidPayload(String),
}

/// Gateway for fetching a fresh, complete set of timetable entries for one
/// entity from the remote source.
///
/// Implementations route on the variant (groups, auditoriums and teachers
/// live on different remote pages) and must return the *entire* schedule for
/// the entity: the caller replaces, never merges.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ImporterGateway: Send + Sync {
    /// Fetch all timetable entries for `(variant, external_id)`.
    ///
    /// # Returns
    /// * `Ok(Vec<RawRecord>)` - The complete fresh schedule (may be empty)
    /// * `Err(ImportError)` - If the fetch failed or timed out
    async fn import(&self, variant: Variant, external_id: i64)
        -> Result<Vec<RawRecord>, ImportError>;
}
