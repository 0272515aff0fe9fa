//! Subtitle Data Model
//!
//! Defines the subtitle entry: one timed line of text in one language.
//! Field names serialize to the backend wire format (`startTime`, `endTime`,
//! `originalText`).

use serde::{Deserialize, Serialize};

use crate::core::{LanguageCode, SubtitleId, TimeSec};

// =============================================================================
// Subtitle Entry
// =============================================================================

/// A single subtitle entry with text and timing
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtitle {
    /// Unique identifier
    pub id: SubtitleId,
    /// Start time in seconds
    pub start_time: TimeSec,
    /// End time in seconds (strictly greater than start)
    pub end_time: TimeSec,
    /// Subtitle text (may contain line breaks)
    pub text: String,
    /// Language code (e.g. "en", "es", "ja")
    pub language: LanguageCode,
    /// Pre-translation source text, set only on translated entries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl Subtitle {
    /// Creates a new subtitle with the given id, timing, and text
    pub fn new(id: &str, start_time: TimeSec, end_time: TimeSec, text: &str, language: &str) -> Self {
        Self {
            id: id.to_string(),
            start_time,
            end_time,
            text: text.to_string(),
            language: language.to_string(),
            original_text: None,
        }
    }

    /// Creates a subtitle with an auto-generated ID
    pub fn create(start_time: TimeSec, end_time: TimeSec, text: &str, language: &str) -> Self {
        Self::new(
            &ulid::Ulid::new().to_string(),
            start_time,
            end_time,
            text,
            language,
        )
    }

    /// Sets the pre-translation source text
    pub fn with_original_text(mut self, original_text: &str) -> Self {
        self.original_text = Some(original_text.to_string());
        self
    }

    /// Returns the duration of this subtitle in seconds
    pub fn duration(&self) -> TimeSec {
        self.end_time - self.start_time
    }

    /// Returns true if the subtitle covers the given playhead time.
    ///
    /// The interval is closed on both ends: a subtitle ending at 2.0 is
    /// still active at exactly 2.0.
    pub fn is_active_at(&self, time: TimeSec) -> bool {
        time >= self.start_time && time <= self.end_time
    }

    /// Returns true if this subtitle overlaps another in time
    pub fn overlaps(&self, other: &Subtitle) -> bool {
        self.start_time < other.end_time && self.end_time > other.start_time
    }
}

// =============================================================================
// Tests
// =============================================================================
