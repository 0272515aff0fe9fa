//! Subtitle Time Codec
//!
//! Converts between floating-point seconds and the textual clock formats
//! used by export (`HH:MM:SS,mmm` / `HH:MM:SS.mmm`) and by the manual
//! time-entry UI (`M:SS`).
//!
//! Export clocks truncate every field toward zero; a subtitle at 3725.250s
//! formats as `01:02:05,250` (SRT) and `01:02:05.250` (VTT).

use crate::core::{CoreError, CoreResult, TimeSec};

// =============================================================================
// Clock Styles
// =============================================================================

/// Clock style for full export timestamps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockStyle {
    /// SubRip style: `HH:MM:SS,mmm`
    Srt,
    /// WebVTT style: `HH:MM:SS.mmm`
    Vtt,
}

impl ClockStyle {
    /// Separator between seconds and milliseconds
    fn millis_separator(&self) -> char {
        match self {
            Self::Srt => ',',
            Self::Vtt => '.',
        }
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats seconds as a full export clock (`01:02:05,250` / `01:02:05.250`).
///
/// All fields are truncated toward zero, never rounded. Negative or
/// non-finite input is rejected.
pub fn format_clock(seconds: TimeSec, style: ClockStyle) -> CoreResult<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(CoreError::InvalidTime(format!(
            "clock time must be finite and non-negative, got {seconds}"
        )));
    }

    let hours = (seconds / 3600.0) as u64;
    let minutes = ((seconds % 3600.0) / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    let millis = ((seconds % 1.0) * 1000.0) as u64;

    Ok(format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours,
        minutes,
        secs,
        style.millis_separator(),
        millis
    ))
}

/// Formats seconds as the short scrubbing label (`M:SS`).
///
/// Minutes are unbounded in width; seconds are zero-padded to 2 digits.
/// Display only, never used for export.
pub fn format_clock_short(seconds: TimeSec) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    format!("{}:{:02}", minutes, secs)
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses the short `M:SS` editor format back into seconds.
///
/// Fails unless the input is exactly two `:`-separated numeric components.
pub fn parse_clock_short(text: &str) -> CoreResult<TimeSec> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 2 {
        return Err(CoreError::InvalidTime(text.to_string()));
    }

    let minutes = parse_component(parts[0], text)?;
    let seconds = parse_component(parts[1], text)?;

    Ok(minutes * 60.0 + seconds)
}

/// Parses a full subtitle-file timestamp into seconds.
///
/// Accepts `HH:MM:SS,mmm` (SRT), `HH:MM:SS.mmm` (VTT), and the short VTT
/// form `MM:SS.mmm`.
pub fn parse_clock(text: &str) -> CoreResult<TimeSec> {
    let normalized = text.replace(',', ".");
    let parts: Vec<&str> = normalized.split(':').collect();

    match parts.len() {
        2 => {
            let minutes = parse_component(parts[0], text)?;
            let seconds = parse_component(parts[1], text)?;
            Ok(minutes * 60.0 + seconds)
        }
        3 => {
            let hours = parse_component(parts[0], text)?;
            let minutes = parse_component(parts[1], text)?;
            let seconds = parse_component(parts[2], text)?;
            Ok(hours * 3600.0 + minutes * 60.0 + seconds)
        }
        _ => Err(CoreError::InvalidTime(text.to_string())),
    }
}

fn parse_component(component: &str, original: &str) -> CoreResult<TimeSec> {
    let value: f64 = component
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidTime(original.to_string()))?;
    if !value.is_finite() {
        return Err(CoreError::InvalidTime(original.to_string()));
    }
    Ok(value)
}

// =============================================================================
// Tests
// =============================================================================
