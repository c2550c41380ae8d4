//! Theme and Colors
//!
//! Terminal palette for the sidekick surface. Character and particle colors
//! come from the core palette; this module only adds the chrome around them.

use ratatui::style::Color;

use sidekick_core::Color as CoreColor;

// ============================================================================
// Stage
// ============================================================================

/// Stage background behind the character
pub const STAGE_BG: CoreColor = CoreColor::rgb(15, 23, 42);

/// Particle layer background (fully transparent)
pub const PARTICLE_BG: CoreColor = CoreColor::rgba(0, 0, 0, 0);

// ============================================================================
// UI Colors
// ============================================================================

/// Reaction bar group titles
pub const GROUP_TITLE: Color = Color::Rgb(148, 163, 184);

/// Key hints
pub const KEY_HINT: Color = Color::Rgb(252, 211, 77);

/// Highlight for the action currently showing
pub const ACTIVE: Color = Color::Rgb(186, 230, 253);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Convert a core color to a terminal color, dropping alpha
pub fn to_ratatui(color: CoreColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}
