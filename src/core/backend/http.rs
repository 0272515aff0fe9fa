//! HTTP Backend Implementation
//!
//! Implements the `SubtitleBackend` trait against the real backend service:
//! - `POST /api/transcribe` — multipart (video file or URL + language)
//! - `POST /api/translate` — JSON
//! - `POST /api/export-video` — multipart (video + subtitles + settings)
//! - `GET /health` — connectivity check

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use super::{
    BackendConfig, SubtitleBackend, TranscribeResponse, VideoSource, MAX_UPLOAD_BYTES,
};
use crate::core::{render::RenderSettings, subtitles::Subtitle, CoreError, CoreResult};

// =============================================================================
// HTTP Backend
// =============================================================================

/// Backend client over reqwest
pub struct HttpBackend {
    config: BackendConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a new HTTP backend client
    pub fn new(config: BackendConfig) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CoreError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Creates a client from the environment configuration
    pub fn from_env() -> CoreResult<Self> {
        Self::new(BackendConfig::from_env())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Attaches the video to a multipart form: a binary `video` part for
    /// local files, a `video_url` text field for remote URLs.
    async fn attach_video(&self, form: Form, source: &VideoSource) -> CoreResult<Form> {
        match source {
            VideoSource::File { path } => {
                let meta = tokio::fs::metadata(path).await.map_err(|_| {
                    CoreError::Validation(format!("Video file not found: {}", path.display()))
                })?;
                if !meta.is_file() {
                    return Err(CoreError::Validation(format!(
                        "Video path is not a file: {}",
                        path.display()
                    )));
                }
                if meta.len() > MAX_UPLOAD_BYTES {
                    return Err(CoreError::Validation(format!(
                        "Video file exceeds the {} MiB upload limit",
                        MAX_UPLOAD_BYTES / (1024 * 1024)
                    )));
                }

                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "video.mp4".to_string());
                let bytes = tokio::fs::read(path).await?;
                let part = Part::bytes(bytes)
                    .file_name(file_name)
                    .mime_str("application/octet-stream")
                    .map_err(|e| CoreError::Internal(format!("Invalid mime type: {}", e)))?;

                Ok(form.part("video", part))
            }
            VideoSource::Url { url } => Ok(form.text("video_url", url.clone())),
        }
    }

    /// Surfaces a non-success status as `BackendError`
    async fn check_status(response: reqwest::Response) -> CoreResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .unwrap_or_else(|_| status.to_string());
        Err(CoreError::BackendError {
            status: status.as_u16(),
            message,
        })
    }

    fn transport_error(error: reqwest::Error) -> CoreError {
        CoreError::BackendUnavailable(error.to_string())
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Serialize)]
struct TranslateRequest<'a> {
    subtitles: &'a [String],
    source_language: &'a str,
    target_language: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<String>,
}

#[derive(Deserialize)]
struct ExportVideoResponse {
    download_url: String,
    #[serde(default)]
    #[allow(dead_code)]
    filename: Option<String>,
}

// =============================================================================
// Trait Implementation
// =============================================================================

#[async_trait]
impl SubtitleBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn transcribe(
        &self,
        source: &VideoSource,
        language: &str,
    ) -> CoreResult<TranscribeResponse> {
        tracing::info!(language, "Requesting transcription");

        let form = Form::new().text("language", language.to_string());
        let form = self.attach_video(form, source).await?;

        let response = self
            .client
            .post(self.endpoint("/api/transcribe"))
            .multipart(form)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let response = Self::check_status(response).await?;
        let result: TranscribeResponse = response.json().await.map_err(Self::transport_error)?;

        tracing::info!(segments = result.segments.len(), "Transcription received");
        Ok(result)
    }

    async fn translate(
        &self,
        subtitles: &[String],
        source_language: &str,
        target_language: &str,
    ) -> CoreResult<Vec<String>> {
        tracing::info!(
            count = subtitles.len(),
            source_language,
            target_language,
            "Requesting translation"
        );

        let request = TranslateRequest {
            subtitles,
            source_language,
            target_language,
        };

        let response = self
            .client
            .post(self.endpoint("/api/translate"))
            .json(&request)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let response = Self::check_status(response).await?;
        let result: TranslateResponse = response.json().await.map_err(Self::transport_error)?;

        Ok(result.translations)
    }

    async fn export_video(
        &self,
        source: &VideoSource,
        subtitles: &[Subtitle],
        settings: &RenderSettings,
        language: &str,
    ) -> CoreResult<String> {
        tracing::info!(language, count = subtitles.len(), "Requesting video export");

        let form = Form::new()
            .text("subtitles", serde_json::to_string(subtitles)?)
            .text("settings", serde_json::to_string(settings)?)
            .text("language", language.to_string());
        let form = self.attach_video(form, source).await?;

        let response = self
            .client
            .post(self.endpoint("/api/export-video"))
            .multipart(form)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let response = Self::check_status(response).await?;
        let result: ExportVideoResponse = response.json().await.map_err(Self::transport_error)?;

        Ok(result.download_url)
    }

    async fn health_check(&self) -> CoreResult<()> {
        let response = self
            .client
            .get(self.endpoint("/health"))
            .send()
            .await
            .map_err(Self::transport_error)?;
        Self::check_status(response).await?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backend::BackendConfig;

    #[test]
    fn test_endpoint_joining() {
        let backend = HttpBackend::new(
            BackendConfig::default().with_base_url("http://backend:8000/"),
        )
        .unwrap();

        assert_eq!(
            backend.endpoint("/api/transcribe"),
            "http://backend:8000/api/transcribe"
        );
    }

    #[test]
    fn test_translate_request_wire_format() {
        let subtitles = vec!["Hi".to_string(), "Bye".to_string()];
        let request = TranslateRequest {
            subtitles: &subtitles,
            source_language: "en",
            target_language: "es",
        };

        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(
            json,
            r#"{"subtitles":["Hi","Bye"],"source_language":"en","target_language":"es"}"#
        );
    }

    #[test]
    fn test_export_video_response_parsing() {
        let json = r#"{"download_url":"/download/out.mp4","filename":"out.mp4"}"#;
        let response: ExportVideoResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.download_url, "/download/out.mp4");
    }

    #[tokio::test]
    async fn test_attach_video_rejects_missing_file() {
        let backend = HttpBackend::new(BackendConfig::default()).unwrap();
        let source = VideoSource::file("/nonexistent/video.mp4");

        let result = backend.attach_video(Form::new(), &source).await;
        assert!(matches!(result.unwrap_err(), CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn test_attach_video_accepts_url() {
        let backend = HttpBackend::new(BackendConfig::default()).unwrap();
        let source = VideoSource::url("https://example.com/talk.mp4");

        assert!(backend.attach_video(Form::new(), &source).await.is_ok());
    }
}
