//! High-level service layer.
//!
//! This module contains the business logic that sits on top of the
//! repository traits: the freshness coordinator that decides when cached
//! schedules are stale and serializes their replacement, and the pure
//! formatting functions that turn query results into display text.

pub mod coordinator;
pub mod formatter;

pub use coordinator::{DirectoryHits, FreshnessCoordinator, MIN_QUERY_LEN};
