//! Sublingo Core Library
//!
//! Engine of an AI-assisted video subtitle studio: the subtitle timeline
//! and its edit operations, SRT/VTT codecs, the job state machine for
//! backend-bound requests, translation merging, and the typed client for
//! the external transcription/translation/render backend.
//!
//! Video decode/playback and all visual presentation live outside this
//! crate; UI layers subscribe to `AppStore` events and read state through
//! its accessors.

pub mod core;

use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{
    backend::{segments_to_subtitles, SubtitleBackend},
    fs,
    jobs::JobKind,
    render::RenderSettings,
    store::AppStore,
    subtitles::{export_srt, export_vtt, Subtitle},
    translate::translated_entries,
    CoreError, CoreResult,
};

// =============================================================================
// Logging
// =============================================================================

/// Initializes the global tracing subscriber.
///
/// Respects `RUST_LOG`; defaults to `info`. Safe to call more than once —
/// later calls are ignored.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

// =============================================================================
// Subtitle Session
// =============================================================================

/// An editing session: the application store wired to a backend.
///
/// The session owns the control flow between UI triggers and state: it runs
/// the backend request, tracks it through the job state machine, and folds
/// successful responses back into the timeline. Responses of superseded
/// requests are dropped without touching state.
pub struct SubtitleSession {
    store: AppStore,
    backend: Arc<dyn SubtitleBackend>,
}

impl SubtitleSession {
    /// Creates a session with English as the original language
    pub fn new(backend: Arc<dyn SubtitleBackend>) -> Self {
        Self::with_language(backend, "en")
    }

    /// Creates a session with the given original language
    pub fn with_language(backend: Arc<dyn SubtitleBackend>, original_language: &str) -> Self {
        Self {
            store: AppStore::new(original_language),
            backend,
        }
    }

    /// The application store (read access)
    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// The application store (mutation methods)
    pub fn store_mut(&mut self) -> &mut AppStore {
        &mut self.store
    }

    // =========================================================================
    // Transcription
    // =========================================================================

    /// Transcribes the selected video and replaces the timeline with the
    /// resulting original-language entries. Returns the entry count.
    pub async fn transcribe(&mut self) -> CoreResult<usize> {
        let source = self
            .store
            .video_source()
            .cloned()
            .ok_or(CoreError::NoVideoSource)?;
        let language = self.store.original_language().to_string();

        let ticket = self.store.begin_job(JobKind::Transcribe);
        match self.backend.transcribe(&source, &language).await {
            Ok(response) => {
                if !self.store.job_is_current(&ticket) {
                    tracing::debug!("Dropping superseded transcription response");
                    return Ok(0);
                }

                let subtitles = segments_to_subtitles(&response.segments, &language);
                let count = subtitles.len();
                match self.store.replace_subtitles(subtitles) {
                    Ok(()) => {
                        self.store.complete_job(&ticket);
                        tracing::info!(count, %language, "Transcription merged");
                        Ok(count)
                    }
                    Err(e) => {
                        self.store.fail_job(&ticket, &e.to_string());
                        Err(e)
                    }
                }
            }
            Err(e) => {
                self.store.fail_job(&ticket, &e.to_string());
                Err(e)
            }
        }
    }

    // =========================================================================
    // Translation
    // =========================================================================

    /// Translates the original-language subtitles into `target_language`
    /// and merges the result as new entries. Returns the merged count.
    pub async fn translate(&mut self, target_language: &str) -> CoreResult<usize> {
        let original = self.store.original_language().to_string();
        if target_language == original {
            return Err(CoreError::Validation(format!(
                "'{}' is already the original language",
                target_language
            )));
        }

        if !crate::core::is_supported_language(target_language) {
            tracing::warn!(target_language, "Language is not in the supported catalog");
        }

        let sources: Vec<Subtitle> = self.store.timeline().by_language(&original).cloned().collect();
        if sources.is_empty() {
            return Err(CoreError::NoSubtitles(original));
        }

        self.store.begin_translation(target_language)?;
        let texts: Vec<String> = sources.iter().map(|s| s.text.clone()).collect();
        let ticket = self.store.begin_job(JobKind::Translate);

        let result = self
            .backend
            .translate(&texts, &original, target_language)
            .await;
        self.store.settle_translation(target_language);

        match result {
            Ok(translations) => {
                if !self.store.job_is_current(&ticket) {
                    tracing::debug!(target_language, "Dropping superseded translation response");
                    return Ok(0);
                }

                let merged = translated_entries(&sources, &translations, target_language)
                    .and_then(|entries| self.store.merge_translations(entries, target_language));
                match merged {
                    Ok(count) => {
                        self.store.complete_job(&ticket);
                        tracing::info!(count, target_language, "Translation merged");
                        Ok(count)
                    }
                    Err(e) => {
                        self.store.fail_job(&ticket, &e.to_string());
                        Err(e)
                    }
                }
            }
            Err(e) => {
                self.store.fail_job(&ticket, &e.to_string());
                Err(e)
            }
        }
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Renders the video with burned-in subtitles for a language via the
    /// backend. Returns the artifact's download URL.
    pub async fn export_video(
        &mut self,
        settings: &RenderSettings,
        language: &str,
    ) -> CoreResult<String> {
        settings.validate()?;

        let source = self
            .store
            .video_source()
            .cloned()
            .ok_or(CoreError::NoVideoSource)?;
        let subtitles: Vec<Subtitle> = self.store.timeline().by_language(language).cloned().collect();
        if subtitles.is_empty() {
            return Err(CoreError::NoSubtitles(language.to_string()));
        }

        let ticket = self.store.begin_job(JobKind::Render);
        match self
            .backend
            .export_video(&source, &subtitles, settings, language)
            .await
        {
            Ok(download_url) => {
                // A stale ticket leaves the newer job record untouched; the
                // URL itself is still returned to the caller that asked.
                self.store.complete_job(&ticket);
                Ok(download_url)
            }
            Err(e) => {
                self.store.fail_job(&ticket, &e.to_string());
                Err(e)
            }
        }
    }

    /// Encodes a language's subtitles as SRT text
    pub fn export_srt(&self, language: &str) -> CoreResult<String> {
        let subtitles: Vec<Subtitle> = self.store.timeline().by_language(language).cloned().collect();
        export_srt(&subtitles)
    }

    /// Encodes a language's subtitles as WebVTT text
    pub fn export_vtt(&self, language: &str) -> CoreResult<String> {
        let subtitles: Vec<Subtitle> = self.store.timeline().by_language(language).cloned().collect();
        export_vtt(&subtitles)
    }

    /// Writes a language's subtitles to disk as an `.srt` file
    pub fn save_srt(&self, language: &str, path: &str) -> CoreResult<PathBuf> {
        let content = self.export_srt(language)?;
        let path = fs::validate_output_path(path, "outputPath")?;
        fs::atomic_write_text(&path, &content)?;
        Ok(path)
    }

    /// Writes a language's subtitles to disk as a `.vtt` file
    pub fn save_vtt(&self, language: &str, path: &str) -> CoreResult<PathBuf> {
        let content = self.export_vtt(language)?;
        let path = fs::validate_output_path(path, "outputPath")?;
        fs::atomic_write_text(&path, &content)?;
        Ok(path)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::core::backend::{TranscribeResponse, TranscriptSegment, VideoSource};
    use crate::core::jobs::JobStatus;

    // -------------------------------------------------------------------------
    // Mock Backend
    // -------------------------------------------------------------------------

    #[derive(Default)]
    struct MockBackend {
        segments: Vec<TranscriptSegment>,
        /// Canned translations by target language; unset languages get
        /// `"[lang] text"` echoes.
        translations: Mutex<HashMap<String, Vec<String>>>,
        fail: bool,
    }

    impl MockBackend {
        fn with_segments(segments: Vec<(f64, f64, &str)>) -> Self {
            Self {
                segments: segments
                    .into_iter()
                    .map(|(start, end, text)| TranscriptSegment {
                        start,
                        end,
                        text: text.to_string(),
                    })
                    .collect(),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn set_translations(&self, language: &str, translations: Vec<&str>) {
            self.translations.lock().unwrap().insert(
                language.to_string(),
                translations.into_iter().map(String::from).collect(),
            );
        }
    }

    #[async_trait]
    impl SubtitleBackend for MockBackend {
        fn name(&self) -> &str {
            "mock"
        }

        async fn transcribe(
            &self,
            _source: &VideoSource,
            language: &str,
        ) -> CoreResult<TranscribeResponse> {
            if self.fail {
                return Err(CoreError::BackendUnavailable("connection refused".into()));
            }
            Ok(TranscribeResponse {
                segments: self.segments.clone(),
                language: Some(language.to_string()),
                duration: self.segments.last().map(|s| s.end).unwrap_or(0.0),
            })
        }

        async fn translate(
            &self,
            subtitles: &[String],
            _source_language: &str,
            target_language: &str,
        ) -> CoreResult<Vec<String>> {
            if self.fail {
                return Err(CoreError::BackendUnavailable("connection refused".into()));
            }
            if let Some(canned) = self.translations.lock().unwrap().get(target_language) {
                return Ok(canned.clone());
            }
            Ok(subtitles
                .iter()
                .map(|s| format!("[{}] {}", target_language, s))
                .collect())
        }

        async fn export_video(
            &self,
            _source: &VideoSource,
            _subtitles: &[Subtitle],
            _settings: &RenderSettings,
            _language: &str,
        ) -> CoreResult<String> {
            if self.fail {
                return Err(CoreError::BackendUnavailable("connection refused".into()));
            }
            Ok("/download/out.mp4".to_string())
        }
    }

    fn session_with(backend: MockBackend) -> SubtitleSession {
        let mut session = SubtitleSession::new(Arc::new(backend));
        session
            .store_mut()
            .set_video_source(Some(VideoSource::url("https://example.com/talk.mp4")));
        session
    }

    // -------------------------------------------------------------------------
    // Transcription Flow Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_transcribe_replaces_timeline() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, " Hi "), (2.0, 4.0, "Bye")]);
        let mut session = session_with(backend);

        let count = session.transcribe().await.unwrap();
        assert_eq!(count, 2);

        let timeline = session.store().timeline();
        assert_eq!(timeline.count_for("en"), 2);
        assert_eq!(timeline.get("sub_0").unwrap().text, "Hi");

        let job = session.store().job(JobKind::Transcribe).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
    }

    #[tokio::test]
    async fn test_transcribe_requires_video_source() {
        let mut session = SubtitleSession::new(Arc::new(MockBackend::default()));

        let err = session.transcribe().await.unwrap_err();
        assert!(matches!(err, CoreError::NoVideoSource));
        assert!(session.store().job(JobKind::Transcribe).is_none());
    }

    #[tokio::test]
    async fn test_transcribe_backend_failure_fails_job() {
        let mut session = session_with(MockBackend::failing());

        let err = session.transcribe().await.unwrap_err();
        assert!(matches!(err, CoreError::BackendUnavailable(_)));

        let job = session.store().job(JobKind::Transcribe).unwrap();
        assert_eq!(job.status, JobStatus::Error);
        assert!(job.error.as_deref().unwrap().contains("connection refused"));
        assert!(session.store().timeline().is_empty());
    }

    // -------------------------------------------------------------------------
    // Translation Flow Tests
    // -------------------------------------------------------------------------

    async fn transcribed_session(backend: MockBackend) -> SubtitleSession {
        let mut session = session_with(backend);
        session.transcribe().await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_translate_merges_entries() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi"), (2.0, 4.0, "Bye")]);
        backend.set_translations("es", vec!["Hola", "Adiós"]);
        let mut session = transcribed_session(backend).await;

        let count = session.translate("es").await.unwrap();
        assert_eq!(count, 2);

        let store = session.store();
        assert_eq!(store.timeline().count_for("es"), 2);
        assert_eq!(store.target_languages(), &["es"]);
        assert!(!store.is_translating("es"));

        let first = store.timeline().by_language("es").next().unwrap();
        assert_eq!(first.id, "sub_0-es");
        assert_eq!(first.text, "Hola");
        assert_eq!(first.original_text.as_deref(), Some("Hi"));

        assert_eq!(
            store.job(JobKind::Translate).unwrap().status,
            JobStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_translate_shape_mismatch_leaves_timeline_unchanged() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi"), (2.0, 4.0, "Bye")]);
        backend.set_translations("es", vec!["Hola"]);
        let mut session = transcribed_session(backend).await;

        let err = session.translate("es").await.unwrap_err();
        assert!(matches!(err, CoreError::TranslationShapeMismatch { .. }));

        let store = session.store();
        assert_eq!(store.timeline().count_for("es"), 0);
        assert!(store.target_languages().is_empty());
        assert!(!store.is_translating("es"));
        assert_eq!(
            store.job(JobKind::Translate).unwrap().status,
            JobStatus::Error
        );
    }

    #[tokio::test]
    async fn test_translate_rejects_original_language() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi")]);
        let mut session = transcribed_session(backend).await;

        let err = session.translate("en").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_translate_requires_source_subtitles() {
        let mut session = session_with(MockBackend::default());

        let err = session.translate("es").await.unwrap_err();
        assert!(matches!(err, CoreError::NoSubtitles(_)));
    }

    #[tokio::test]
    async fn test_translate_backend_failure_settles_in_progress_set() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi")]);
        let mut session = transcribed_session(backend).await;

        // Swap in a failing backend for the translate call
        session.backend = Arc::new(MockBackend::failing());

        let err = session.translate("es").await.unwrap_err();
        assert!(matches!(err, CoreError::BackendUnavailable(_)));
        assert!(!session.store().is_translating("es"));
        assert_eq!(
            session.store().job(JobKind::Translate).unwrap().status,
            JobStatus::Error
        );
    }

    // -------------------------------------------------------------------------
    // Export Flow Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_export_video_returns_download_url() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi")]);
        let mut session = transcribed_session(backend).await;

        let url = session
            .export_video(&RenderSettings::default(), "en")
            .await
            .unwrap();
        assert_eq!(url, "/download/out.mp4");
        assert_eq!(
            session.store().job(JobKind::Render).unwrap().status,
            JobStatus::Completed
        );
    }

    #[tokio::test]
    async fn test_export_video_requires_subtitles() {
        let mut session = session_with(MockBackend::default());

        let err = session
            .export_video(&RenderSettings::default(), "en")
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NoSubtitles(_)));
    }

    #[tokio::test]
    async fn test_export_video_validates_settings() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi")]);
        let mut session = transcribed_session(backend).await;

        let mut settings = RenderSettings::default();
        settings.font_color = "white".to_string();

        let err = session.export_video(&settings, "en").await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(session.store().job(JobKind::Render).is_none());
    }

    #[tokio::test]
    async fn test_export_srt_and_vtt() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi"), (2.0, 4.0, "Bye")]);
        let session = transcribed_session(backend).await;

        let srt = session.export_srt("en").unwrap();
        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,000\nHi\n\n2\n00:00:02,000 --> 00:00:04,000\nBye\n"
        );

        let vtt = session.export_vtt("en").unwrap();
        assert!(vtt.starts_with("WEBVTT\n\n"));
        assert!(vtt.contains("00:00:02.000 --> 00:00:04.000"));

        // Empty partition encodes to the empty artifacts
        assert_eq!(session.export_srt("fr").unwrap(), "");
        assert_eq!(session.export_vtt("fr").unwrap(), "WEBVTT\n\n");
    }

    #[tokio::test]
    async fn test_save_srt_writes_file() {
        let backend = MockBackend::with_segments(vec![(0.0, 2.0, "Hi")]);
        let session = transcribed_session(backend).await;

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("subtitles_en.srt");
        let written = session
            .save_srt("en", &path.to_string_lossy())
            .unwrap();

        let content = std::fs::read_to_string(written).unwrap();
        assert_eq!(content, "1\n00:00:00,000 --> 00:00:02,000\nHi\n");
    }
}
