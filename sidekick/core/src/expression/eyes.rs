//! Per-side eye resolution
//!
//! Eyes resolve through an ordered rule list: the first rule whose
//! predicate matches decides the key and the channel overrides for each
//! side. Closure (transition or blink) and the glance fidget sit at the top
//! so they always win over the expressive asymmetric overrides.

use serde::{Deserialize, Serialize};

use super::Fidget;
use crate::action::Action;
use crate::animation::{Channel, VariantKey};
use crate::appearance::{palette, Color};

/// Vertical extent of an open eye, relative to its full height
pub const EYE_OPEN: f32 = 1.0;

/// Vertical extent of a closed eye (a thin slit, never fully zero)
pub const EYE_CLOSED: f32 = 0.1;

/// Which eye
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EyeSide {
    /// Viewer's left
    Left,
    /// Viewer's right
    Right,
}

/// Inputs the eye rules look at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EyeContext {
    /// Current action
    pub action: Action,
    /// Anticipation window is open
    pub transitioning: bool,
    /// Blink pulse is active
    pub blinking: bool,
    /// Active idle fidget
    pub fidget: Option<Fidget>,
}

impl EyeContext {
    /// Whether the eyes render as closed slits
    #[must_use]
    pub fn eyes_closed(&self) -> bool {
        self.transitioning || self.blinking || self.action == Action::Sleepy
    }

    /// Relative vertical extent of both eyes
    #[must_use]
    pub fn openness(&self) -> f32 {
        if self.eyes_closed() {
            EYE_CLOSED
        } else {
            EYE_OPEN
        }
    }

    /// Whether sparkle highlights are drawn
    #[must_use]
    pub fn shows_highlights(&self) -> bool {
        !self.eyes_closed()
    }
}

/// Resolved animation target for one eye
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeTarget {
    /// Table key
    pub key: VariantKey,
    /// Channel values layered over the table entry
    pub overrides: &'static [(Channel, f32)],
}

struct EyeRule {
    applies: fn(&EyeContext) -> bool,
    key: VariantKey,
    left: &'static [(Channel, f32)],
    right: &'static [(Channel, f32)],
}

const NONE: &[(Channel, f32)] = &[];

static EYE_RULES: [EyeRule; 8] = [
    EyeRule {
        applies: |ctx| ctx.transitioning,
        key: VariantKey::Transition,
        left: NONE,
        right: NONE,
    },
    EyeRule {
        applies: |ctx| ctx.blinking,
        key: VariantKey::Transition,
        left: NONE,
        right: NONE,
    },
    EyeRule {
        applies: |ctx| ctx.fidget == Some(Fidget::Glance) && ctx.action == Action::Idle,
        key: VariantKey::FidgetGlance,
        left: NONE,
        right: NONE,
    },
    EyeRule {
        applies: |ctx| ctx.action == Action::Confused,
        key: VariantKey::Action(Action::Confused),
        left: &[(Channel::ScaleY, 0.5), (Channel::Y, -2.0)],
        right: &[(Channel::ScaleY, 1.2), (Channel::Y, 2.0)],
    },
    EyeRule {
        applies: |ctx| ctx.action == Action::Sad,
        key: VariantKey::Action(Action::Sad),
        left: &[(Channel::RotateZ, 15.0)],
        right: &[(Channel::RotateZ, -15.0)],
    },
    EyeRule {
        applies: |ctx| ctx.action == Action::Angry,
        key: VariantKey::Action(Action::Angry),
        left: &[(Channel::RotateZ, 20.0)],
        right: &[(Channel::RotateZ, -20.0)],
    },
    EyeRule {
        applies: |ctx| ctx.action == Action::Silly,
        key: VariantKey::Action(Action::Silly),
        left: &[(Channel::Scale, 1.4), (Channel::Y, -3.0)],
        right: &[(Channel::Scale, 0.8), (Channel::Y, 3.0)],
    },
    EyeRule {
        applies: |ctx| ctx.action == Action::Sleepy,
        key: VariantKey::Action(Action::Sleepy),
        left: NONE,
        right: NONE,
    },
];

/// Resolve the animation target for one eye
///
/// `base` is the controller's effective eye key, used when no rule matches.
#[must_use]
pub fn resolve_eye(ctx: &EyeContext, base: VariantKey, side: EyeSide) -> EyeTarget {
    let Some(rule) = EYE_RULES.iter().find(|rule| (rule.applies)(ctx)) else {
        return EyeTarget {
            key: base,
            overrides: NONE,
        };
    };

    let overrides = match side {
        EyeSide::Left => rule.left,
        EyeSide::Right => rule.right,
    };
    EyeTarget {
        key: rule.key,
        overrides,
    }
}

/// Iris color for the current action
#[must_use]
pub fn eye_tint(action: Action) -> Color {
    if action == Action::Love {
        palette::EYE_ROSE
    } else {
        palette::EYE_DARK
    }
}
