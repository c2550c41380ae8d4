//! Action Vocabulary
//!
//! The closed set of trigger states the sidekick reacts to. Exactly one
//! [`Action`] is current at any time; it is owned by the communication board
//! and handed to the core as a read-only input on every tick.
//!
//! Actions fall into four conceptual groups:
//!
//! - **Neutral**: `Idle`, `Waiting`, `Listening`
//! - **Gestures**: `Nod`, `Shake`, `Emphasis`
//! - **Cognitive**: `Thinking`, `Confused`, `Idea`
//! - **Emotions**: `Happy`, `Sad`, `Surprised`, `Love`, `Sleepy`, `Angry`, `Silly`

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A discrete expressive trigger for the sidekick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Resting; breathing loop with occasional fidgets
    #[default]
    Idle,
    /// Waiting for the user; gentle sway
    Waiting,
    /// Listening; small pulse
    Listening,
    /// Agreeing nod
    Nod,
    /// Disagreeing shake
    Shake,
    /// "Look at this" pop
    Emphasis,
    /// Deep in thought; slow spin
    Thinking,
    /// Puzzled head tilt
    Confused,
    /// Lightbulb moment; jump and spin
    Idea,
    /// Joyful jump with confetti
    Happy,
    /// Slumped with rain
    Sad,
    /// Tall startled stretch
    Surprised,
    /// Floating hearts
    Love,
    /// Drowsy breathing with drifting Zs
    Sleepy,
    /// Trembling with steam
    Angry,
    /// Goofy wobble
    Silly,
}

/// Conceptual grouping of actions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionGroup {
    /// Resting and attentive states
    Neutral,
    /// Short communicative gestures
    Gesture,
    /// Thought-related states
    Cognitive,
    /// Emotional expressions
    Emotion,
}

/// Error returned when parsing an unknown action name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sidekick action: {0}")]
pub struct UnknownActionError(pub String);

impl Action {
    /// Every action, in declaration order
    pub const ALL: [Action; 16] = [
        Action::Idle,
        Action::Waiting,
        Action::Listening,
        Action::Nod,
        Action::Shake,
        Action::Emphasis,
        Action::Thinking,
        Action::Confused,
        Action::Idea,
        Action::Happy,
        Action::Sad,
        Action::Surprised,
        Action::Love,
        Action::Sleepy,
        Action::Angry,
        Action::Silly,
    ];

    /// Actions that never auto-expire back to `Idle`
    pub const PERSISTENT: [Action; 6] = [
        Action::Idle,
        Action::Thinking,
        Action::Waiting,
        Action::Sad,
        Action::Sleepy,
        Action::Angry,
    ];

    /// Group this action belongs to
    #[must_use]
    pub const fn group(self) -> ActionGroup {
        match self {
            Self::Idle | Self::Waiting | Self::Listening => ActionGroup::Neutral,
            Self::Nod | Self::Shake | Self::Emphasis => ActionGroup::Gesture,
            Self::Thinking | Self::Confused | Self::Idea => ActionGroup::Cognitive,
            Self::Happy
            | Self::Sad
            | Self::Surprised
            | Self::Love
            | Self::Sleepy
            | Self::Angry
            | Self::Silly => ActionGroup::Emotion,
        }
    }

    /// Whether this action stays current until the board changes it
    ///
    /// Non-persistent actions schedule a completion signal after a fixed hold.
    #[must_use]
    pub const fn is_persistent(self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Thinking | Self::Waiting | Self::Sad | Self::Sleepy | Self::Angry
        )
    }

    /// Canonical upper-case name (e.g. `"HAPPY"`)
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Waiting => "WAITING",
            Self::Listening => "LISTENING",
            Self::Nod => "NOD",
            Self::Shake => "SHAKE",
            Self::Emphasis => "EMPHASIS",
            Self::Thinking => "THINKING",
            Self::Confused => "CONFUSED",
            Self::Idea => "IDEA",
            Self::Happy => "HAPPY",
            Self::Sad => "SAD",
            Self::Surprised => "SURPRISED",
            Self::Love => "LOVE",
            Self::Sleepy => "SLEEPY",
            Self::Angry => "ANGRY",
            Self::Silly => "SILLY",
        }
    }

    /// Short child-friendly label shown on reaction buttons
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Rest",
            Self::Waiting => "Wait",
            Self::Listening => "Listen",
            Self::Nod => "Yes",
            Self::Shake => "No",
            Self::Emphasis => "Look",
            Self::Thinking => "Think",
            Self::Confused => "Hmm?",
            Self::Idea => "Idea!",
            Self::Happy => "Happy",
            Self::Sad => "Sad",
            Self::Surprised => "Wow!",
            Self::Love => "Love",
            Self::Sleepy => "Tired",
            Self::Angry => "Mad",
            Self::Silly => "Silly",
        }
    }

    /// Look up an action by name, ignoring case
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|action| action.name().eq_ignore_ascii_case(name))
    }

    /// Look up an action by name, failing closed to `Idle`
    ///
    /// The sidekick is display-only, so an unrecognized trigger keeps the
    /// character on screen in its resting pose instead of surfacing an error.
    #[must_use]
    pub fn from_name_or_idle(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::warn!(action = name, "Unknown action, falling back to IDLE");
            Self::Idle
        })
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownActionError(s.to_string()))
    }
}
