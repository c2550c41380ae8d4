//! Appearance Configuration and Colors
//!
//! The board owns an [`AppearanceConfig`] (body color, uniform scale and the
//! audio-reactive flag) and hands the core a snapshot every tick. This module
//! also holds the surface-agnostic [`Color`] type and the fixed palette used
//! by eyes and particles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest scale the settings panel offers
pub const MIN_SCALE: f32 = 0.6;

/// Largest scale the settings panel offers
pub const MAX_SCALE: f32 = 1.4;

/// Error returned for malformed hex colors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Missing leading `#`
    #[error("Color must start with '#': {0}")]
    MissingHash(String),

    /// Wrong number of hex digits
    #[error("Color must have 3, 6 or 8 hex digits: {0}")]
    BadLength(String),

    /// Non-hex characters
    #[error("Invalid hex digits in color: {0}")]
    InvalidDigit(String),
}

/// Surface-agnostic RGBA color
///
/// ```
/// use sidekick_core::Color;
///
/// let sky: Color = "#BAE6FD".parse().unwrap();
/// assert_eq!(sky, Color::rgb(0xBA, 0xE6, 0xFD));
/// assert_eq!(sky.to_hex(), "#bae6fd");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component (0-255)
    pub r: u8,
    /// Green component (0-255)
    pub g: u8,
    /// Blue component (0-255)
    pub b: u8,
    /// Alpha component (0=transparent, 255=opaque)
    pub a: u8,
}

impl Color {
    /// Create a fully opaque color from RGB components
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color with explicit alpha channel
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color from a packed `0xRRGGBB` value
    #[must_use]
    pub const fn from_rgb_u32(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError`] when the string is not a hex color.
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let trimmed = hex.trim();
        let digits = trimmed
            .strip_prefix('#')
            .ok_or_else(|| ColorParseError::MissingHash(hex.to_string()))?;

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(hex.to_string()));
        }

        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorParseError::InvalidDigit(hex.to_string()));

        match digits.len() {
            3 => {
                let nibble = |i: usize| byte(&digits[i..=i]).map(|v| v * 17);
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
            )),
            8 => Ok(Self::rgba(
                byte(&digits[0..2])?,
                byte(&digits[2..4])?,
                byte(&digits[4..6])?,
                byte(&digits[6..8])?,
            )),
            _ => Err(ColorParseError::BadLength(hex.to_string())),
        }
    }

    /// Convert to a CSS-style hex string (#rrggbb or #rrggbbaa)
    #[must_use]
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Same color with alpha scaled by `opacity` (0.0-1.0)
    #[must_use]
    pub fn with_opacity(&self, opacity: f32) -> Self {
        let alpha = (f32::from(self.a) * opacity.clamp(0.0, 1.0)).round() as u8;
        Self { a: alpha, ..*self }
    }

    /// Composite this color over `background` ("source over")
    ///
    /// Particles fading out and the translucent shadow both land here, so
    /// the backdrop may itself be translucent.
    #[must_use]
    pub fn blend_over(&self, background: Color) -> Color {
        match self.a {
            255 => return *self,
            0 => return background,
            _ => {}
        }

        let src = f32::from(self.a) / 255.0;
        let keep = f32::from(background.a) / 255.0 * (1.0 - src);
        let alpha = src + keep;
        if alpha <= 0.0 {
            return Color::rgba(0, 0, 0, 0);
        }
        let mix = |fg: u8, bg: u8| {
            ((f32::from(fg) * src + f32::from(bg) * keep) / alpha).round() as u8
        };

        Color::rgba(
            mix(self.r, background.r),
            mix(self.g, background.g),
            mix(self.b, background.b),
            (alpha * 255.0).round() as u8,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        ColorPreset::Sky.color()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Fixed colors used by the face and particle effects
pub mod palette {
    use super::Color;

    /// Default eye color
    pub const EYE_DARK: Color = Color::from_rgb_u32(0x1E293B);
    /// Eye color while in love
    pub const EYE_ROSE: Color = Color::from_rgb_u32(0xE11D48);
    /// Eye sparkle
    pub const EYE_SHINE: Color = Color::from_rgb_u32(0xFFFFFF);
    /// Cheek blush
    pub const CHEEK_ROSE: Color = Color::from_rgb_u32(0xFB7185);
    /// Mouth strokes
    pub const MOUTH_DARK: Color = Color::from_rgb_u32(0x1E293B);
    /// Silly tongue
    pub const TONGUE: Color = Color::from_rgb_u32(0xFB7185);
    /// Sleepy breath bubble
    pub const BUBBLE: Color = Color::from_rgb_u32(0xBFDBFE);
    /// Antenna stalk and unlit bulb
    pub const ANTENNA_GREY: Color = Color::from_rgb_u32(0x94A3B8);
    /// Lit antenna bulb
    pub const BULB_GOLD: Color = Color::from_rgb_u32(0xFCD34D);
    /// Ground shadow
    pub const SHADOW: Color = Color::from_rgb_u32(0x000000);

    /// Confetti colors, chosen uniformly per piece
    pub const CONFETTI: [Color; 5] = [
        Color::from_rgb_u32(0xFCD34D),
        Color::from_rgb_u32(0xF87171),
        Color::from_rgb_u32(0x60A5FA),
        Color::from_rgb_u32(0x34D399),
        Color::from_rgb_u32(0xA78BFA),
    ];
    /// Rain streaks
    pub const RAIN: Color = Color::from_rgb_u32(0x60A5FA);
    /// Floating hearts
    pub const HEART: Color = Color::from_rgb_u32(0xF43F5E);
    /// Angry steam puffs
    pub const STEAM: Color = Color::from_rgb_u32(0x475569);
    /// Sleepy Zs
    pub const GLYPH: Color = Color::from_rgb_u32(0x94A3B8);
    /// Idea sparkles
    pub const STAR: Color = Color::from_rgb_u32(0xFCD34D);
}

// ============================================================================
// Presets
// ============================================================================

/// Named body colors offered by the settings panel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreset {
    /// Sky blue (default)
    #[default]
    Sky,
    /// Mint green
    Mint,
    /// Soft pink
    Pink,
    /// Violet
    Violet,
    /// Gold
    Gold,
    /// Cloud grey
    Cloud,
}

impl ColorPreset {
    /// All presets in panel order
    pub const ALL: [ColorPreset; 6] = [
        ColorPreset::Sky,
        ColorPreset::Mint,
        ColorPreset::Pink,
        ColorPreset::Violet,
        ColorPreset::Gold,
        ColorPreset::Cloud,
    ];

    /// Body color for this preset
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Self::Sky => Color::from_rgb_u32(0xBAE6FD),
            Self::Mint => Color::from_rgb_u32(0xA7F3D0),
            Self::Pink => Color::from_rgb_u32(0xFBCFE8),
            Self::Violet => Color::from_rgb_u32(0xDDD6FE),
            Self::Gold => Color::from_rgb_u32(0xFDE68A),
            Self::Cloud => Color::from_rgb_u32(0xE2E8F0),
        }
    }

    /// Lower-case preset name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sky => "sky",
            Self::Mint => "mint",
            Self::Pink => "pink",
            Self::Violet => "violet",
            Self::Gold => "gold",
            Self::Cloud => "cloud",
        }
    }

    /// Look up a preset by name, ignoring case
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Preset matching an exact color, if any
    #[must_use]
    pub fn from_color(color: Color) -> Option<Self> {
        Self::ALL.into_iter().find(|preset| preset.color() == color)
    }

    /// Next preset, wrapping around
    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// Parse either a preset name or a hex color
///
/// # Errors
///
/// Returns [`ColorParseError`] when the value is neither.
pub fn parse_color_setting(value: &str) -> Result<Color, ColorParseError> {
    match ColorPreset::from_name(value) {
        Some(preset) => Ok(preset.color()),
        None => Color::from_hex(value),
    }
}

// ============================================================================
// Appearance
// ============================================================================

/// Externally owned appearance snapshot
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppearanceConfig {
    /// Body color
    pub color: Color,
    /// Uniform scale factor (practical range 0.6-1.4)
    pub scale: f32,
    /// Whether the body pulses with microphone volume
    pub audio_reactive: bool,
}

impl AppearanceConfig {
    /// Create an appearance from its parts
    #[must_use]
    pub const fn new(color: Color, scale: f32, audio_reactive: bool) -> Self {
        Self {
            color,
            scale,
            audio_reactive,
        }
    }

    /// Set the scale, clamped to the settings panel's range
    #[must_use]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self
    }

    /// Set the body color
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the audio-reactive flag
    #[must_use]
    pub fn with_audio_reactive(mut self, audio_reactive: bool) -> Self {
        self.audio_reactive = audio_reactive;
        self
    }

    /// Scale to use for sizing, never zero or negative
    ///
    /// Collaborators pre-validate the scale; a bad value still renders at 1.0.
    #[must_use]
    pub fn effective_scale(&self) -> f32 {
        if self.scale.is_finite() && self.scale > 0.0 {
            self.scale
        } else {
            1.0
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self::new(ColorPreset::Sky.color(), 1.0, false)
    }
}
