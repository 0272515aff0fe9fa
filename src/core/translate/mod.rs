//! Translation Merge Module
//!
//! Combines a freshly translated text array with its source-language
//! entries into new timeline entries tagged with the target language.
//!
//! The translated id is derived deterministically from the source id and
//! the target language, so re-translating the same language produces the
//! same ids and the timeline's upsert semantics replace instead of
//! duplicate.

use crate::core::{subtitles::Subtitle, CoreError, CoreResult, SubtitleId};

// =============================================================================
// Id Derivation
// =============================================================================

/// Derives the id of a translated entry from its source entry and target
/// language.
pub fn translation_id(source_id: &str, target_language: &str) -> SubtitleId {
    format!("{}-{}", source_id, target_language)
}

// =============================================================================
// Merge Construction
// =============================================================================

/// Builds translated entries from positionally corresponding source entries
/// and translation strings.
///
/// The lists must have the same length; a mismatch fails with
/// `TranslationShapeMismatch` and nothing is constructed — never truncate or
/// pad. Each translated entry shares its source's time range, carries the
/// source text in `original_text`, and falls back to the source text when
/// the backend returned an empty translation.
pub fn translated_entries(
    sources: &[Subtitle],
    translations: &[String],
    target_language: &str,
) -> CoreResult<Vec<Subtitle>> {
    if translations.len() != sources.len() {
        return Err(CoreError::TranslationShapeMismatch {
            expected: sources.len(),
            actual: translations.len(),
        });
    }

    let entries = sources
        .iter()
        .zip(translations)
        .map(|(source, translation)| {
            let text = if translation.is_empty() {
                source.text.as_str()
            } else {
                translation.as_str()
            };
            Subtitle::new(
                &translation_id(&source.id, target_language),
                source.start_time,
                source.end_time,
                text,
                target_language,
            )
            .with_original_text(&source.text)
        })
        .collect();

    Ok(entries)
}

// =============================================================================
// Tests
// =============================================================================
