//! Sublingo Error Definitions
//!
//! Defines error types used throughout the crate.

use thiserror::Error;

use super::{LanguageCode, SubtitleId, TimeSec};

/// Core engine error types
#[derive(Error, Debug)]
pub enum CoreError {
    // =========================================================================
    // Timeline Errors
    // =========================================================================
    #[error("Invalid subtitle time range: {0}~{1} seconds")]
    InvalidRange(TimeSec, TimeSec),

    #[error("Subtitle not found: {0}")]
    SubtitleNotFound(SubtitleId),

    // =========================================================================
    // Time Codec Errors
    // =========================================================================
    #[error("Invalid time value: {0}")]
    InvalidTime(String),

    // =========================================================================
    // Translation Errors
    // =========================================================================
    #[error("Translation shape mismatch: expected {expected} translations, got {actual}")]
    TranslationShapeMismatch { expected: usize, actual: usize },

    #[error("Translation already in progress for language: {0}")]
    TranslationInProgress(LanguageCode),

    #[error("No subtitles available for language: {0}")]
    NoSubtitles(LanguageCode),

    // =========================================================================
    // Backend Errors
    // =========================================================================
    #[error("No video source selected")]
    NoVideoSource,

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Backend error (HTTP {status}): {message}")]
    BackendError { status: u16, message: String },

    // =========================================================================
    // General Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Core engine result type
pub type CoreResult<T> = Result<T, CoreError>;
