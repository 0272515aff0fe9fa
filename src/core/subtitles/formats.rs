//! Subtitle Format Codecs
//!
//! Export and import of the two standard subtitle text formats:
//! - SRT (SubRip)
//! - VTT (WebVTT)
//!
//! Exporters are pure functions of their input list: the same entries in the
//! same order always produce byte-identical output, so exported artifacts
//! are stable across runs.

use super::models::Subtitle;
use super::timecode::{format_clock, parse_clock, ClockStyle};
use crate::core::CoreResult;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during subtitle file parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Invalid timestamp format
    InvalidTimestamp(String),
    /// Invalid cue format
    InvalidFormat(String),
    /// Missing required data
    MissingData(String),
    /// Unexpected end of input
    UnexpectedEnd,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimestamp(s) => write!(f, "Invalid timestamp: {}", s),
            Self::InvalidFormat(s) => write!(f, "Invalid format: {}", s),
            Self::MissingData(s) => write!(f, "Missing data: {}", s),
            Self::UnexpectedEnd => write!(f, "Unexpected end of input"),
        }
    }
}

impl std::error::Error for ParseError {}

// =============================================================================
// SRT Export
// =============================================================================

/// Exports subtitles to SRT format.
///
/// Entries are emitted in the given order as
/// `index\nstart --> end\ntext\n` blocks joined by a single blank line.
/// Empty input produces an empty string.
pub fn export_srt(subtitles: &[Subtitle]) -> CoreResult<String> {
    let mut blocks = Vec::with_capacity(subtitles.len());

    for (index, sub) in subtitles.iter().enumerate() {
        let start = format_clock(sub.start_time, ClockStyle::Srt)?;
        let end = format_clock(sub.end_time, ClockStyle::Srt)?;
        blocks.push(format!("{}\n{} --> {}\n{}\n", index + 1, start, end, sub.text));
    }

    Ok(blocks.join("\n"))
}

// =============================================================================
// VTT Export
// =============================================================================

/// Exports subtitles to WebVTT format.
///
/// Emits the literal `WEBVTT` header, a blank line, then
/// `start --> end\ntext\n` blocks (no numeric index) joined by a single
/// blank line. Empty input produces `"WEBVTT\n\n"`.
pub fn export_vtt(subtitles: &[Subtitle]) -> CoreResult<String> {
    let mut blocks = Vec::with_capacity(subtitles.len());

    for sub in subtitles {
        let start = format_clock(sub.start_time, ClockStyle::Vtt)?;
        let end = format_clock(sub.end_time, ClockStyle::Vtt)?;
        blocks.push(format!("{} --> {}\n{}\n", start, end, sub.text));
    }

    let mut output = String::from("WEBVTT\n\n");
    output.push_str(&blocks.join("\n"));
    Ok(output)
}

// =============================================================================
// SRT Import
// =============================================================================

/// Parses SRT (SubRip) content into subtitle entries tagged with `language`.
///
/// # SRT Format
///
/// ```text
/// 1
/// 00:00:01,000 --> 00:00:04,000
/// First subtitle text
///
/// 2
/// 00:00:05,500 --> 00:00:08,000
/// Second subtitle text
/// with multiple lines
/// ```
pub fn parse_srt(content: &str, language: &str) -> Result<Vec<Subtitle>, ParseError> {
    let mut subtitles = Vec::new();
    let mut lines = content.lines().peekable();
    let mut index = 0;

    while lines.peek().is_some() {
        // Skip empty lines
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }

        if lines.peek().is_none() {
            break;
        }

        // Sequence number (not validated; export regenerates it)
        let _seq = lines.next().ok_or(ParseError::UnexpectedEnd)?;

        let timestamp_line = lines.next().ok_or(ParseError::UnexpectedEnd)?;
        let (start_time, end_time) = parse_timestamp_line(timestamp_line)?;

        let text = collect_cue_text(&mut lines)?;

        let id = format!("srt_{}", index);
        subtitles.push(Subtitle::new(&id, start_time, end_time, &text, language));
        index += 1;
    }

    Ok(subtitles)
}

// =============================================================================
// VTT Import
// =============================================================================

/// Parses WebVTT content into subtitle entries tagged with `language`.
///
/// Handles optional cue identifiers, cue settings after the end timestamp,
/// and strips inline `<...>` styling tags.
pub fn parse_vtt(content: &str, language: &str) -> Result<Vec<Subtitle>, ParseError> {
    let mut subtitles = Vec::new();
    let mut lines = content.lines().peekable();
    let mut index = 0;

    // WEBVTT header is mandatory
    if let Some(first_line) = lines.next() {
        if !first_line.starts_with("WEBVTT") {
            return Err(ParseError::InvalidFormat(
                "VTT file must start with WEBVTT".to_string(),
            ));
        }
    }

    // Skip any header metadata up to the first blank line
    while lines.peek().is_some_and(|l| !l.trim().is_empty()) {
        lines.next();
    }

    while lines.peek().is_some() {
        while lines.peek().is_some_and(|l| l.trim().is_empty()) {
            lines.next();
        }

        if lines.peek().is_none() {
            break;
        }

        // A cue may start with an identifier line before the timestamps
        let first_line = lines.next().ok_or(ParseError::UnexpectedEnd)?;
        let timestamp_line = if first_line.contains("-->") {
            first_line
        } else {
            lines.next().ok_or(ParseError::UnexpectedEnd)?
        };

        let (start_time, end_time) = parse_timestamp_line(timestamp_line)?;

        let raw_text = collect_cue_text(&mut lines)?;
        let text = raw_text
            .lines()
            .map(strip_vtt_tags)
            .collect::<Vec<_>>()
            .join("\n");

        let id = format!("vtt_{}", index);
        subtitles.push(Subtitle::new(&id, start_time, end_time, &text, language));
        index += 1;
    }

    Ok(subtitles)
}

// =============================================================================
// Parsing Helpers
// =============================================================================

/// Parses a timestamp line (e.g. `00:00:01,000 --> 00:00:04,000`),
/// tolerating trailing VTT cue settings after the end timestamp.
fn parse_timestamp_line(line: &str) -> Result<(f64, f64), ParseError> {
    let parts: Vec<&str> = line.split("-->").collect();
    if parts.len() != 2 {
        return Err(ParseError::InvalidFormat(format!(
            "Expected 'start --> end' format: {}",
            line
        )));
    }

    let start_str = parts[0].trim();
    let end_part = parts[1].trim();
    let end_str = end_part.split_whitespace().next().unwrap_or(end_part);

    let start = parse_clock(start_str)
        .map_err(|_| ParseError::InvalidTimestamp(start_str.to_string()))?;
    let end =
        parse_clock(end_str).map_err(|_| ParseError::InvalidTimestamp(end_str.to_string()))?;

    Ok((start, end))
}

/// Collects cue text lines until the next blank line
fn collect_cue_text(
    lines: &mut std::iter::Peekable<std::str::Lines<'_>>,
) -> Result<String, ParseError> {
    let mut text_lines = Vec::new();
    while let Some(line) = lines.peek() {
        if line.trim().is_empty() {
            break;
        }
        text_lines.push(lines.next().unwrap().to_string());
    }

    if text_lines.is_empty() {
        return Err(ParseError::MissingData("Subtitle text".to_string()));
    }

    Ok(text_lines.join("\n"))
}

/// Strips VTT formatting tags (`<...>`) from a line of text
fn strip_vtt_tags(text: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

// =============================================================================
// Tests
// =============================================================================
