//! Application Store Module
//!
//! The process-wide state container: subtitle timeline, language set, video
//! source, job tracker, and the in-progress translation set. Mutation
//! methods are the only write path and preserve invariants atomically per
//! operation.
//!
//! Every mutation broadcasts a `StoreEvent` so UI layers can subscribe and
//! re-render; the store itself never depends on any subscriber being
//! present.

use std::collections::HashSet;

use tokio::sync::broadcast;

use crate::core::{
    backend::VideoSource,
    jobs::{Job, JobKind, JobTicket, JobTracker},
    subtitles::Subtitle,
    timeline::{SubtitlePatch, SubtitleTimeline},
    CoreError, CoreResult, LanguageCode, SubtitleId,
};

/// Broadcast channel capacity. Slow subscribers that fall further behind
/// than this lose oldest events, not correctness: the store remains the
/// source of truth.
const EVENT_CHANNEL_CAPACITY: usize = 64;

// =============================================================================
// Store Events
// =============================================================================

/// State change notifications broadcast to subscribers
#[derive(Clone, Debug, PartialEq)]
pub enum StoreEvent {
    SubtitleAdded { id: SubtitleId },
    SubtitleModified { id: SubtitleId },
    SubtitleDeleted { id: SubtitleId },
    SubtitlesReplaced { count: usize },
    TranslationsMerged { language: LanguageCode, count: usize },
    SelectionChanged { id: Option<SubtitleId> },
    VideoSourceChanged,
    OriginalLanguageChanged { language: LanguageCode },
    TargetLanguageAdded { language: LanguageCode },
    TargetLanguageRemoved { language: LanguageCode },
    JobStarted { kind: JobKind },
    JobProgress { kind: JobKind, progress: u8 },
    JobCompleted { kind: JobKind },
    JobFailed { kind: JobKind, error: String },
    TranslationStarted { language: LanguageCode },
    TranslationSettled { language: LanguageCode },
    StoreReset,
}

// =============================================================================
// Application Store
// =============================================================================

/// Exclusive owner of the application state
pub struct AppStore {
    timeline: SubtitleTimeline,
    original_language: LanguageCode,
    target_languages: Vec<LanguageCode>,
    video_source: Option<VideoSource>,
    jobs: JobTracker,
    translating: HashSet<LanguageCode>,
    events: broadcast::Sender<StoreEvent>,
}

impl AppStore {
    /// Creates a store with the given original (transcription source) language
    pub fn new(original_language: &str) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            timeline: SubtitleTimeline::new(),
            original_language: original_language.to_string(),
            target_languages: Vec::new(),
            video_source: None,
            jobs: JobTracker::new(),
            translating: HashSet::new(),
            events,
        }
    }

    /// Subscribes to state change events
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: StoreEvent) {
        // No subscribers is fine; the store is still the source of truth.
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The subtitle timeline (read-only; mutate through store methods)
    pub fn timeline(&self) -> &SubtitleTimeline {
        &self.timeline
    }

    /// The transcription source language
    pub fn original_language(&self) -> &str {
        &self.original_language
    }

    /// Languages with successfully merged translations, in first-success order
    pub fn target_languages(&self) -> &[LanguageCode] {
        &self.target_languages
    }

    /// Original language followed by the target languages
    pub fn available_languages(&self) -> Vec<LanguageCode> {
        let mut languages = vec![self.original_language.clone()];
        languages.extend(self.target_languages.iter().cloned());
        languages
    }

    /// The selected video source, if any
    pub fn video_source(&self) -> Option<&VideoSource> {
        self.video_source.as_ref()
    }

    /// The current job record for a kind, if any
    pub fn job(&self, kind: JobKind) -> Option<&Job> {
        self.jobs.get(kind)
    }

    /// Returns true while a translation for the language is in flight
    pub fn is_translating(&self, language: &str) -> bool {
        self.translating.contains(language)
    }

    // =========================================================================
    // Video / Language Mutations
    // =========================================================================

    /// Selects or clears the video source
    pub fn set_video_source(&mut self, source: Option<VideoSource>) {
        self.video_source = source;
        self.emit(StoreEvent::VideoSourceChanged);
    }

    /// Changes the transcription source language
    pub fn set_original_language(&mut self, language: &str) {
        self.original_language = language.to_string();
        self.target_languages.retain(|l| l != language);
        self.emit(StoreEvent::OriginalLanguageChanged {
            language: language.to_string(),
        });
    }

    /// Records a target language; deduplicated, never the original
    pub fn add_target_language(&mut self, language: &str) -> CoreResult<()> {
        if language == self.original_language {
            return Err(CoreError::Validation(format!(
                "'{}' is already the original language",
                language
            )));
        }
        if !self.target_languages.iter().any(|l| l == language) {
            self.target_languages.push(language.to_string());
            self.emit(StoreEvent::TargetLanguageAdded {
                language: language.to_string(),
            });
        }
        Ok(())
    }

    /// Removes a language from the target set. The language's subtitles are
    /// kept; only the tag is dropped.
    pub fn remove_target_language(&mut self, language: &str) {
        let before = self.target_languages.len();
        self.target_languages.retain(|l| l != language);
        if self.target_languages.len() != before {
            self.emit(StoreEvent::TargetLanguageRemoved {
                language: language.to_string(),
            });
        }
    }

    // =========================================================================
    // Subtitle Mutations
    // =========================================================================

    /// Adds a subtitle entry (upsert by id)
    pub fn add_subtitle(&mut self, subtitle: Subtitle) -> CoreResult<()> {
        let id = subtitle.id.clone();
        self.timeline.add(subtitle)?;
        self.emit(StoreEvent::SubtitleAdded { id });
        Ok(())
    }

    /// Applies a partial update to a subtitle entry
    pub fn update_subtitle(&mut self, id: &str, patch: SubtitlePatch) -> CoreResult<()> {
        self.timeline.update(id, patch)?;
        self.emit(StoreEvent::SubtitleModified { id: id.to_string() });
        Ok(())
    }

    /// Deletes a subtitle entry; missing ids are a no-op
    pub fn delete_subtitle(&mut self, id: &str) {
        if self.timeline.remove(id).is_some() {
            self.emit(StoreEvent::SubtitleDeleted { id: id.to_string() });
        }
    }

    /// Atomically replaces the whole timeline (fresh transcription)
    pub fn replace_subtitles(&mut self, subtitles: Vec<Subtitle>) -> CoreResult<()> {
        let count = subtitles.len();
        self.timeline.replace_all(subtitles)?;
        self.emit(StoreEvent::SubtitlesReplaced { count });
        Ok(())
    }

    /// Selects a subtitle entry, or clears the selection with `None`
    pub fn select_subtitle(&mut self, id: Option<&str>) -> CoreResult<()> {
        self.timeline.select(id)?;
        self.emit(StoreEvent::SelectionChanged {
            id: id.map(|s| s.to_string()),
        });
        Ok(())
    }

    /// Merges translated entries into the timeline and records the target
    /// language.
    ///
    /// Entries are validated up front so a bad entry cannot leave a partial
    /// merge behind. Re-merging the same language replaces the previous
    /// entries (deterministic ids + upsert).
    pub fn merge_translations(
        &mut self,
        entries: Vec<Subtitle>,
        target_language: &str,
    ) -> CoreResult<usize> {
        if target_language == self.original_language {
            return Err(CoreError::Validation(format!(
                "'{}' is already the original language",
                target_language
            )));
        }

        for entry in &entries {
            SubtitleTimeline::validate_entry(entry)?;
        }

        let count = entries.len();
        for entry in entries {
            self.timeline.add(entry)?;
        }

        self.add_target_language(target_language)?;
        self.emit(StoreEvent::TranslationsMerged {
            language: target_language.to_string(),
            count,
        });
        Ok(count)
    }

    // =========================================================================
    // Job Mutations
    // =========================================================================

    /// Begins a new job of a kind, superseding any previous one, and moves
    /// it straight to processing.
    pub fn begin_job(&mut self, kind: JobKind) -> JobTicket {
        let ticket = self.jobs.begin(kind);
        self.jobs.start(&ticket);
        self.emit(StoreEvent::JobStarted { kind });
        ticket
    }

    /// Returns true if the ticket still refers to the current job of its kind
    pub fn job_is_current(&self, ticket: &JobTicket) -> bool {
        self.jobs.is_current(ticket)
    }

    /// Raises a job's advisory progress. Returns false if the ticket is stale.
    pub fn job_progress(&mut self, ticket: &JobTicket, progress: u8) -> bool {
        if self.jobs.set_progress(ticket, progress) {
            self.emit(StoreEvent::JobProgress {
                kind: ticket.kind(),
                progress,
            });
            true
        } else {
            false
        }
    }

    /// Completes a job. Returns false if the ticket is stale.
    pub fn complete_job(&mut self, ticket: &JobTicket) -> bool {
        if self.jobs.complete(ticket) {
            self.emit(StoreEvent::JobCompleted {
                kind: ticket.kind(),
            });
            true
        } else {
            false
        }
    }

    /// Fails a job with a message. Returns false if the ticket is stale.
    pub fn fail_job(&mut self, ticket: &JobTicket, error: &str) -> bool {
        if self.jobs.fail(ticket, error) {
            self.emit(StoreEvent::JobFailed {
                kind: ticket.kind(),
                error: error.to_string(),
            });
            true
        } else {
            false
        }
    }

    // =========================================================================
    // Translation In-Progress Set
    // =========================================================================

    /// Marks a target language as having a translation in flight
    pub fn begin_translation(&mut self, language: &str) -> CoreResult<()> {
        if !self.translating.insert(language.to_string()) {
            return Err(CoreError::TranslationInProgress(language.to_string()));
        }
        self.emit(StoreEvent::TranslationStarted {
            language: language.to_string(),
        });
        Ok(())
    }

    /// Clears the in-flight mark for a language (success or failure)
    pub fn settle_translation(&mut self, language: &str) {
        if self.translating.remove(language) {
            self.emit(StoreEvent::TranslationSettled {
                language: language.to_string(),
            });
        }
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Restores the initial state, keeping existing subscriptions alive
    pub fn reset(&mut self, original_language: &str) {
        self.timeline = SubtitleTimeline::new();
        self.original_language = original_language.to_string();
        self.target_languages.clear();
        self.video_source = None;
        self.jobs.clear();
        self.translating.clear();
        self.emit(StoreEvent::StoreReset);
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new("en")
    }
}

// =============================================================================
// Tests
// =============================================================================
