//! Backend Client Module
//!
//! Defines the trait and types for the external transcription / translation
//! / video-rendering backend reached over HTTP. The engine never runs AI
//! models itself; everything heavy is delegated through this seam, which is
//! a trait so tests can substitute a mock.

mod http;

pub use http::HttpBackend;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::{render::RenderSettings, subtitles::Subtitle, CoreResult, TimeSec};

// =============================================================================
// Limits
// =============================================================================

/// Maximum size of an uploaded video file (hosting platform limit)
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

// =============================================================================
// Video Source
// =============================================================================

/// The video a request operates on: a local file to upload, or a URL the
/// backend downloads itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum VideoSource {
    /// Local video file uploaded as a multipart body
    File { path: PathBuf },
    /// Remote video URL forwarded to the backend
    Url { url: String },
}

impl VideoSource {
    /// Creates a file source
    pub fn file(path: impl AsRef<Path>) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates a URL source
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }
}

// =============================================================================
// Transcription Types
// =============================================================================

/// One timed segment of transcribed speech
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment start in seconds
    pub start: TimeSec,
    /// Segment end in seconds
    pub end: TimeSec,
    /// Transcribed text
    pub text: String,
}

/// Response of the transcription endpoint
#[derive(Clone, Debug, Deserialize)]
pub struct TranscribeResponse {
    /// Timed segments in playback order
    pub segments: Vec<TranscriptSegment>,
    /// Language the backend detected or was told
    #[serde(default)]
    pub language: Option<String>,
    /// Total audio duration in seconds
    #[serde(default)]
    pub duration: f64,
}

/// Maps transcription segments to subtitle entries with generated
/// sequential ids, trimmed text, and the given language.
pub fn segments_to_subtitles(segments: &[TranscriptSegment], language: &str) -> Vec<Subtitle> {
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            Subtitle::new(
                &format!("sub_{}", index),
                segment.start,
                segment.end,
                segment.text.trim(),
                language,
            )
        })
        .collect()
}

// =============================================================================
// Backend Trait
// =============================================================================

/// The external AI backend reached over HTTP.
///
/// All methods map a non-success response to `BackendError` and transport
/// failures to `BackendUnavailable`; there is no automatic retry.
#[async_trait]
pub trait SubtitleBackend: Send + Sync {
    /// Returns the backend name for logging
    fn name(&self) -> &str;

    /// Transcribes the video's speech into timed segments
    async fn transcribe(
        &self,
        source: &VideoSource,
        language: &str,
    ) -> CoreResult<TranscribeResponse>;

    /// Translates subtitle texts, preserving order and length
    async fn translate(
        &self,
        subtitles: &[String],
        source_language: &str,
        target_language: &str,
    ) -> CoreResult<Vec<String>>;

    /// Renders the video with burned-in subtitles; returns the download URL
    async fn export_video(
        &self,
        source: &VideoSource,
        subtitles: &[Subtitle],
        settings: &RenderSettings,
        language: &str,
    ) -> CoreResult<String>;

    /// Lightweight connectivity check
    async fn health_check(&self) -> CoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// Backend Configuration
// =============================================================================

/// Connection settings for the HTTP backend
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendConfig {
    /// Base URL of the backend service
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BackendConfig {
    /// Default backend base URL (local development server)
    pub const DEFAULT_BASE_URL: &'static str = "http://localhost:8000";

    /// Environment variable overriding the base URL
    pub const BASE_URL_ENV: &'static str = "SUBLINGO_BACKEND_URL";

    /// Builds the config from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let base_url = std::env::var(Self::BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Sets the base URL, trimming any trailing slash
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout_secs: 300,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_to_subtitles() {
        let segments = vec![
            TranscriptSegment {
                start: 0.0,
                end: 2.0,
                text: "  Hello  ".to_string(),
            },
            TranscriptSegment {
                start: 2.0,
                end: 4.5,
                text: "world".to_string(),
            },
        ];

        let subs = segments_to_subtitles(&segments, "en");
        assert_eq!(subs.len(), 2);

        assert_eq!(subs[0].id, "sub_0");
        assert_eq!(subs[0].text, "Hello");
        assert_eq!(subs[0].language, "en");

        assert_eq!(subs[1].id, "sub_1");
        assert_eq!(subs[1].start_time, 2.0);
        assert_eq!(subs[1].end_time, 4.5);
    }

    #[test]
    fn test_transcribe_response_deserialization() {
        let json = r#"{
            "segments": [
                {"start": 0.0, "end": 1.5, "text": "Hi"},
                {"start": 1.5, "end": 3.0, "text": "there"}
            ],
            "language": "en",
            "duration": 3.0
        }"#;

        let response: TranscribeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.segments.len(), 2);
        assert_eq!(response.language.as_deref(), Some("en"));
        assert_eq!(response.duration, 3.0);
    }

    #[test]
    fn test_transcribe_response_optional_fields() {
        let json = r#"{"segments": []}"#;
        let response: TranscribeResponse = serde_json::from_str(json).unwrap();
        assert!(response.segments.is_empty());
        assert!(response.language.is_none());
        assert_eq!(response.duration, 0.0);
    }

    #[test]
    fn test_backend_config_default() {
        let config = BackendConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.timeout_secs, 300);
    }

    #[test]
    fn test_backend_config_with_base_url_trims_slash() {
        let config = BackendConfig::default().with_base_url("https://api.example.com/");
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn test_video_source_constructors() {
        let file = VideoSource::file("/videos/talk.mp4");
        assert!(matches!(file, VideoSource::File { .. }));

        let url = VideoSource::url("https://example.com/talk.mp4");
        assert_eq!(
            url,
            VideoSource::Url {
                url: "https://example.com/talk.mp4".to_string()
            }
        );
    }
}
