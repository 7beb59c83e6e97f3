//! Domain models for the schedule cache.
//!
//! This module defines the fundamental data structures of the system: lookup
//! subjects (entities), the timetable records they own, and the
//! hour-granularity freshness marker that gates cache refreshes.

pub mod entity;
pub mod record;
pub mod time;

pub use entity::*;
pub use record::*;
pub use time::*;
