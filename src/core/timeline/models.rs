//! Subtitle Timeline Model
//!
//! Implements `SubtitleTimeline`, the ordered interval structure behind the
//! editor, and `SubtitlePatch` for partial updates.

use serde::{Deserialize, Serialize};

use crate::core::{
    subtitles::Subtitle, CoreError, CoreResult, LanguageCode, SubtitleId, TimeSec,
};

// =============================================================================
// Range Validation
// =============================================================================

fn is_valid_time(value: TimeSec) -> bool {
    value.is_finite() && value >= 0.0
}

/// Validates a subtitle time range: both ends finite and non-negative,
/// end strictly after start.
fn validate_range(start_time: TimeSec, end_time: TimeSec) -> CoreResult<()> {
    if !is_valid_time(start_time) || !is_valid_time(end_time) {
        return Err(CoreError::Validation(
            "Subtitle times must be finite and non-negative".to_string(),
        ));
    }
    if end_time <= start_time {
        return Err(CoreError::InvalidRange(start_time, end_time));
    }
    Ok(())
}

// =============================================================================
// Subtitle Patch
// =============================================================================

/// Partial update for a subtitle entry. Unset fields are left unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitlePatch {
    pub start_time: Option<TimeSec>,
    pub end_time: Option<TimeSec>,
    pub text: Option<String>,
}

impl SubtitlePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_start_time(mut self, start_time: TimeSec) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_end_time(mut self, end_time: TimeSec) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_time_range(mut self, start_time: TimeSec, end_time: TimeSec) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }
}

// =============================================================================
// Subtitle Timeline
// =============================================================================

/// The full ordered collection of subtitle entries for all languages,
/// together with the active selection.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleTimeline {
    /// All entries, kept sorted by start time (stable across languages)
    subtitles: Vec<Subtitle>,
    /// Currently selected entry, if any
    selected_id: Option<SubtitleId>,
}

impl SubtitleTimeline {
    /// Creates an empty timeline
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates an entry's time range without inserting it
    pub fn validate_entry(subtitle: &Subtitle) -> CoreResult<()> {
        validate_range(subtitle.start_time, subtitle.end_time)
    }

    /// Adds a subtitle, keeping the collection sorted.
    ///
    /// Ids are unique across the collection: adding an entry whose id
    /// already exists replaces the existing entry (this is what makes
    /// re-translation idempotent).
    pub fn add(&mut self, subtitle: Subtitle) -> CoreResult<()> {
        validate_range(subtitle.start_time, subtitle.end_time)?;

        if let Some(existing) = self.subtitles.iter_mut().find(|s| s.id == subtitle.id) {
            *existing = subtitle;
        } else {
            self.subtitles.push(subtitle);
        }
        self.sort_subtitles();
        Ok(())
    }

    /// Merges a patch into the entry matching `id`.
    ///
    /// If the merged fields would violate `end_time > start_time` the entry
    /// is left untouched and `InvalidRange` is returned. The collection is
    /// re-sorted only when the start time changed.
    pub fn update(&mut self, id: &str, patch: SubtitlePatch) -> CoreResult<()> {
        let subtitle = self
            .subtitles
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CoreError::SubtitleNotFound(id.to_string()))?;

        let new_start = patch.start_time.unwrap_or(subtitle.start_time);
        let new_end = patch.end_time.unwrap_or(subtitle.end_time);
        validate_range(new_start, new_end)?;

        let start_changed = new_start != subtitle.start_time;
        subtitle.start_time = new_start;
        subtitle.end_time = new_end;
        if let Some(text) = patch.text {
            subtitle.text = text;
        }

        if start_changed {
            self.sort_subtitles();
        }
        Ok(())
    }

    /// Removes the entry matching `id`, returning it.
    ///
    /// A missing id is a no-op, not an error. Removing the selected entry
    /// clears the selection.
    pub fn remove(&mut self, id: &str) -> Option<Subtitle> {
        let pos = self.subtitles.iter().position(|s| s.id == id)?;
        let removed = self.subtitles.remove(pos);
        if self.selected_id.as_deref() == Some(id) {
            self.selected_id = None;
        }
        Some(removed)
    }

    /// Atomically swaps the entire collection (used after a fresh
    /// transcription completes).
    ///
    /// Every incoming entry is validated before anything is replaced; a
    /// single malformed entry leaves the timeline unchanged. The selection
    /// is cleared unless its id survives the swap.
    pub fn replace_all(&mut self, subtitles: Vec<Subtitle>) -> CoreResult<()> {
        for sub in &subtitles {
            validate_range(sub.start_time, sub.end_time)?;
        }

        self.subtitles = subtitles;
        self.sort_subtitles();

        if let Some(selected) = &self.selected_id {
            if !self.subtitles.iter().any(|s| &s.id == selected) {
                self.selected_id = None;
            }
        }
        Ok(())
    }

    /// Returns the entry active at the given playhead time for a language.
    ///
    /// The interval is closed on both ends; if entries overlap, the one
    /// with the earliest start time wins.
    pub fn active_at(&self, time: TimeSec, language: &str) -> Option<&Subtitle> {
        self.subtitles
            .iter()
            .find(|s| s.language == language && s.is_active_at(time))
    }

    /// Returns the entries for a language in display order
    pub fn by_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a Subtitle> {
        self.subtitles.iter().filter(move |s| s.language == language)
    }

    /// Returns the subtitle texts for a language, in display order
    pub fn texts_for(&self, language: &str) -> Vec<String> {
        self.by_language(language).map(|s| s.text.clone()).collect()
    }

    /// Gets an entry by id
    pub fn get(&self, id: &str) -> Option<&Subtitle> {
        self.subtitles.iter().find(|s| s.id == id)
    }

    /// Returns the number of entries across all languages
    pub fn len(&self) -> usize {
        self.subtitles.len()
    }

    /// Returns true if the timeline has no entries
    pub fn is_empty(&self) -> bool {
        self.subtitles.is_empty()
    }

    /// Returns the number of entries for a language
    pub fn count_for(&self, language: &str) -> usize {
        self.by_language(language).count()
    }

    /// Returns the selected entry id, if any
    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Sets or clears the selection. Selecting a missing id is an error.
    pub fn select(&mut self, id: Option<&str>) -> CoreResult<()> {
        match id {
            Some(id) => {
                if self.get(id).is_none() {
                    return Err(CoreError::SubtitleNotFound(id.to_string()));
                }
                self.selected_id = Some(id.to_string());
            }
            None => self.selected_id = None,
        }
        Ok(())
    }

    /// Returns the distinct languages present, in first-appearance order
    pub fn languages(&self) -> Vec<LanguageCode> {
        let mut languages: Vec<LanguageCode> = Vec::new();
        for sub in &self.subtitles {
            if !languages.contains(&sub.language) {
                languages.push(sub.language.clone());
            }
        }
        languages
    }

    /// Sorts entries by start time. The sort is stable, so equal start
    /// times keep their insertion order.
    fn sort_subtitles(&mut self) {
        self.subtitles.sort_by(|a, b| {
            a.start_time
                .partial_cmp(&b.start_time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
