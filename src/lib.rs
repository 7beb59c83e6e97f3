//! # Timetable Core
//!
//! Freshness-gated caching engine for a university class-schedule lookup
//! service.
//!
//! The authoritative timetable lives on a remote, slow-to-query source, so
//! this crate keeps a local copy of schedule records per lookup subject
//! (group, auditorium or teacher) and refreshes it at most once per
//! wall-clock hour. Lookups return records in a deterministic display order;
//! a substring search over the subject directory produces selectable
//! suggestions an outer command layer can turn into follow-up lookups.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types — entities, schedule records, hour markers
//! - [`db`]: Repository traits and the in-memory storage backend
//! - [`importer`]: Gateway trait for fetching fresh schedules from the remote source
//! - [`services`]: The freshness coordinator, directory search and response formatting
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use timetable_core::db::repositories::LocalRepository;
//! use timetable_core::models::Variant;
//! use timetable_core::services::FreshnessCoordinator;
//! # use timetable_core::importer::{ImporterGateway, ImportError};
//! # use timetable_core::models::RawRecord;
//! # struct RemoteImporter;
//! # #[async_trait::async_trait]
//! # impl ImporterGateway for RemoteImporter {
//! #     async fn import(&self, _: Variant, _: i64) -> Result<Vec<RawRecord>, ImportError> {
//! #         Ok(vec![])
//! #     }
//! # }
//!
//! # async fn example() -> timetable_core::db::RepositoryResult<()> {
//! let repo = Arc::new(LocalRepository::new());
//! let coordinator = FreshnessCoordinator::new(repo, Arc::new(RemoteImporter));
//!
//! let _records = coordinator.resolve(Variant::Group, 42).await?;
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod importer;
pub mod models;
pub mod services;
