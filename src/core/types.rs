//! Sublingo Core Type Definitions
//!
//! Defines fundamental types used throughout the crate.

// =============================================================================
// ID Types
// =============================================================================

/// Subtitle entry unique identifier.
///
/// User-created entries use ULIDs; transcription results use generated
/// sequential ids; translated entries derive their id from the source entry
/// and the target language.
pub type SubtitleId = String;

/// Job unique identifier (ULID)
pub type JobId = String;

// =============================================================================
// Time and Language Types
// =============================================================================

/// Time in seconds (floating point)
pub type TimeSec = f64;

/// ISO 639-1 language code (e.g. "en", "es", "ja")
pub type LanguageCode = String;

// =============================================================================
// Language Catalog
// =============================================================================

/// Languages the transcription/translation backend supports, as
/// `(code, display name)` pairs.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
];

/// Returns the display name for a supported language code.
pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Returns true if the language code is in the supported catalog.
pub fn is_supported_language(code: &str) -> bool {
    language_name(code).is_some()
}
