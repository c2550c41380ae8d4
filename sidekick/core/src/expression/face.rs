//! Secondary face features
//!
//! Mouth, cheeks, antenna and gloss are pure functions of the action, the
//! active fidget and how long each has been running.

use serde::{Deserialize, Serialize};

use super::eyes::EyeContext;
use super::Fidget;
use crate::action::Action;
use crate::animation::{Channel, Easing, Timing, Track};
use crate::appearance::{palette, Color};

/// Mouth shape drawn under the eyes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mouth {
    /// No mouth
    #[default]
    Hidden,
    /// Small outlined ring (thinking)
    Ring,
    /// Open oval (surprised)
    Oval,
    /// Smile arc (happy)
    Smile,
    /// Tongue poking out (silly)
    Tongue,
    /// Flat line (angry)
    Flat,
    /// Pulsing breath bubble (sleepy)
    Bubble,
}

/// Mouth shape for an action
#[must_use]
pub fn mouth_for(action: Action) -> Mouth {
    match action {
        Action::Thinking => Mouth::Ring,
        Action::Surprised => Mouth::Oval,
        Action::Happy => Mouth::Smile,
        Action::Silly => Mouth::Tongue,
        Action::Angry => Mouth::Flat,
        Action::Sleepy => Mouth::Bubble,
        _ => Mouth::Hidden,
    }
}

/// Cheek blush opacity for an action
#[must_use]
pub fn cheek_blush(action: Action) -> f32 {
    match action {
        Action::Happy | Action::Love | Action::Silly => 0.6,
        _ => 0.2,
    }
}

const ANTENNA_NOD: Track = Track::new(
    Channel::RotateZ,
    &[0.0, -10.0, 10.0, 0.0],
    Timing::once(0.5, &[Easing::EaseInOut]),
);
const ANTENNA_WIGGLE: Track = Track::new(
    Channel::RotateZ,
    &[0.0, -5.0, 5.0, 0.0],
    Timing::once(0.5, &[Easing::EaseInOut]),
);
const BULB_GLOW: Track = Track::new(
    Channel::Scale,
    &[1.0, 1.5, 1.0],
    Timing::once(0.6, &[Easing::EaseInOut]),
);
const BREATH_BUBBLE: Track = Track::new(
    Channel::Scale,
    &[1.0, 1.2, 1.0],
    Timing::looping(2.0, &[Easing::EaseInOut]),
);
const GLOSS_SHIFT: Track = Track::new(
    Channel::X,
    &[0.0, 5.0, -5.0, 0.0],
    Timing::once(2.0, &[Easing::EaseInOut]),
);

/// Antenna stalk and bulb
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AntennaPose {
    /// Stalk sway in degrees, pivoting at its base
    pub sway_deg: f32,
    /// Bulb scale
    pub bulb_scale: f32,
    /// Bulb color
    pub bulb_color: Color,
    /// Whether the bulb casts a glow
    pub glowing: bool,
}

/// Everything on the face besides the eyes' transforms
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FaceFeatures {
    /// Mouth shape
    pub mouth: Mouth,
    /// Mouth scale (pulses for the breath bubble)
    pub mouth_scale: f32,
    /// Blush opacity on both cheeks
    pub cheek_opacity: f32,
    /// Antenna
    pub antenna: AntennaPose,
    /// Sideways shift of the gloss highlight in px
    pub gloss_offset_x: f32,
    /// Whether eye sparkles are drawn
    pub eye_highlights: bool,
}

impl FaceFeatures {
    /// Derive face features
    ///
    /// `action_secs` is how long the current action has been showing and
    /// `fidget_secs` how long the active fidget has been running.
    #[must_use]
    pub fn derive(eyes: &EyeContext, action_secs: f32, fidget_secs: Option<f32>) -> Self {
        let action = eyes.action;
        let fidget = eyes.fidget.zip(fidget_secs);

        let sway_deg = match (action, fidget) {
            (Action::Nod, _) => ANTENNA_NOD.sample(0.0, action_secs),
            (_, Some((Fidget::Wiggle, secs))) => ANTENNA_WIGGLE.sample(0.0, secs),
            _ => 0.0,
        };

        let glowing = action == Action::Idea;
        let antenna = AntennaPose {
            sway_deg,
            bulb_scale: if glowing {
                BULB_GLOW.sample(1.0, action_secs)
            } else {
                1.0
            },
            bulb_color: if glowing {
                palette::BULB_GOLD
            } else {
                palette::ANTENNA_GREY
            },
            glowing,
        };

        let mouth = mouth_for(action);
        let mouth_scale = if mouth == Mouth::Bubble {
            BREATH_BUBBLE.sample(1.0, action_secs)
        } else {
            1.0
        };

        let gloss_offset_x = match fidget {
            Some((Fidget::Glance, secs)) => GLOSS_SHIFT.sample(0.0, secs),
            _ => 0.0,
        };

        Self {
            mouth,
            mouth_scale,
            cheek_opacity: cheek_blush(action),
            antenna,
            gloss_offset_x,
            eye_highlights: eyes.shows_highlights(),
        }
    }
}
