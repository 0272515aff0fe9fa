//! Subtitle System Module
//!
//! Provides subtitle functionality for Sublingo including:
//! - The subtitle entry data model
//! - The time codec (SRT/VTT clock formats, editor short format)
//! - SRT and VTT format parsing and export
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use sublingo::core::subtitles::{export_vtt, Subtitle};
//!
//! let subtitles = vec![
//!     Subtitle::create(0.0, 2.5, "Hello World", "en"),
//!     Subtitle::create(3.0, 5.5, "Welcome to Sublingo", "en"),
//! ];
//! let vtt = export_vtt(&subtitles)?;
//! ```

mod formats;
mod models;
pub mod timecode;

// Re-export models
pub use models::Subtitle;

// Re-export format functions
pub use formats::{export_srt, export_vtt, parse_srt, parse_vtt, ParseError};

// Re-export the time codec
pub use timecode::{format_clock, format_clock_short, parse_clock, parse_clock_short, ClockStyle};
