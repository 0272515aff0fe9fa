//! Render Settings Module
//!
//! Settings for the burned-subtitle video export performed by the backend.
//! Field names and enum values serialize to the backend wire format
//! (`{"quality":"medium","fontSize":"medium","fontColor":"#ffffff",...}`).

use serde::{Deserialize, Serialize};

use crate::core::{CoreError, CoreResult};

// =============================================================================
// Enumerated Options
// =============================================================================

/// Output video quality
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoQuality {
    /// 720p
    Low,
    /// 1080p
    #[default]
    Medium,
    /// 1440p
    High,
}

impl VideoQuality {
    /// Output resolution as (width, height)
    pub fn resolution(&self) -> (u32, u32) {
        match self {
            Self::Low => (1280, 720),
            Self::Medium => (1920, 1080),
            Self::High => (2560, 1440),
        }
    }

    /// x264 CRF value (lower = better quality)
    pub fn crf(&self) -> u8 {
        match self {
            Self::Low => 28,
            Self::Medium => 23,
            Self::High => 18,
        }
    }
}

/// Burned subtitle font size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl SubtitleFontSize {
    /// Font size in points
    pub fn size_pt(&self) -> u32 {
        match self {
            Self::Small => 20,
            Self::Medium => 28,
            Self::Large => 36,
        }
    }
}

/// Vertical position of burned subtitles
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitlePosition {
    Top,
    Center,
    #[default]
    Bottom,
}

impl SubtitlePosition {
    /// ASS/SSA numpad alignment value used by the render backend
    pub fn ass_alignment(&self) -> u8 {
        match self {
            Self::Top => 2,
            Self::Center => 6,
            Self::Bottom => 10,
        }
    }
}

// =============================================================================
// Render Settings
// =============================================================================

/// Settings for a burned-subtitle video export
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    /// Output quality preset
    pub quality: VideoQuality,
    /// Subtitle font size preset
    pub font_size: SubtitleFontSize,
    /// Subtitle text color (hex string, e.g. "#ffffff")
    pub font_color: String,
    /// Subtitle background color (hex string)
    pub background_color: String,
    /// Vertical subtitle position
    pub position: SubtitlePosition,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            quality: VideoQuality::Medium,
            font_size: SubtitleFontSize::Medium,
            font_color: "#ffffff".to_string(),
            background_color: "#000000".to_string(),
            position: SubtitlePosition::Bottom,
        }
    }
}

impl RenderSettings {
    /// Validates the free-form color fields
    pub fn validate(&self) -> CoreResult<()> {
        for (label, color) in [
            ("fontColor", &self.font_color),
            ("backgroundColor", &self.background_color),
        ] {
            if !is_hex_color(color) {
                return Err(CoreError::Validation(format!(
                    "{} must be a hex color string, got '{}'",
                    label, color
                )));
            }
        }
        Ok(())
    }
}

/// Returns true for `#RGB`, `#RRGGBB`, and `#RRGGBBAA` color strings
fn is_hex_color(value: &str) -> bool {
    let Some(hex) = value.strip_prefix('#') else {
        return false;
    };
    matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

// =============================================================================
// Tests
// =============================================================================
