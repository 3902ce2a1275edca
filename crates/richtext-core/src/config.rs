//! Presentation values for paragraph and link spans.
//!
//! The span algebra never reads these; they travel with the engine so a renderer can draw
//! bullets, quote stripes and links consistently. Dimensions are in density-independent pixels
//! until converted with [`FormatStyle::to_pixels`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque blue (ARGB).
pub const DEFAULT_ACCENT_COLOR: u32 = 0xFF00_00FF;

#[derive(Debug, Error)]
/// Errors produced while reading a [`FormatStyle`].
pub enum StyleConfigError {
    #[error("invalid style JSON: {0}")]
    /// JSON parsing or shape mismatch.
    Json(#[from] serde_json::Error),

    #[error("invalid style value for '{field}': {reason}")]
    /// A value parsed but is unusable.
    InvalidValue {
        /// Offending field name.
        field: &'static str,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Colors (ARGB) and dimensions used to render formatted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatStyle {
    /// Bullet dot color.
    pub bullet_color: u32,
    /// Bullet dot radius.
    pub bullet_radius: u32,
    /// Gap between bullet and text.
    pub bullet_gap: u32,
    /// Link text color; `0` means "use the host's default link color".
    pub link_color: u32,
    /// Whether links are underlined.
    pub link_underline: bool,
    /// Quote stripe color.
    pub quote_color: u32,
    /// Quote stripe width.
    pub quote_stripe_width: u32,
    /// Gap between stripe and text.
    pub quote_gap: u32,
}

impl Default for FormatStyle {
    fn default() -> Self {
        Self {
            bullet_color: DEFAULT_ACCENT_COLOR,
            bullet_radius: 2,
            bullet_gap: 8,
            link_color: 0,
            link_underline: true,
            quote_color: DEFAULT_ACCENT_COLOR,
            quote_stripe_width: 2,
            quote_gap: 8,
        }
    }
}

impl FormatStyle {
    /// Parse a style from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, StyleConfigError> {
        let style: Self = serde_json::from_str(json)?;
        style.validate()?;
        Ok(style)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, StyleConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<(), StyleConfigError> {
        if self.quote_stripe_width == 0 {
            return Err(StyleConfigError::InvalidValue {
                field: "quote_stripe_width",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    /// Convert every dimension from dp to pixels for a display `density` (pixels per dp).
    pub fn to_pixels(&self, density: f32) -> Self {
        let px = |dp: u32| (dp as f32 * density).round().max(0.0) as u32;
        Self {
            bullet_radius: px(self.bullet_radius),
            bullet_gap: px(self.bullet_gap),
            quote_stripe_width: px(self.quote_stripe_width),
            quote_gap: px(self.quote_gap),
            ..self.clone()
        }
    }
}
