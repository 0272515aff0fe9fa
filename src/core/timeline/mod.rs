//! Subtitle Timeline Module
//!
//! The ordered collection of subtitle entries across all languages, plus the
//! editing operations that preserve its invariants:
//! - `end_time > start_time` for every entry, at all times
//! - entries of a language are kept in non-decreasing `start_time` order,
//!   ties broken by insertion order
//! - ids are unique across the whole collection (add is an upsert)

mod models;

pub use models::{SubtitlePatch, SubtitleTimeline};
