//! Motion Variant Tables
//!
//! Per-layer motion descriptors keyed by [`VariantKey`]. The data encodes
//! anticipation (counter-motion before the main move), squash-and-stretch
//! (inverse `scale_x`/`scale_y` pairs) and follow-through as multi-phase
//! keyframes with explicit phase offsets.
//!
//! Not every key has an entry for every layer; see [`descriptor`].

use super::timing::{Easing, Timing, ANTICIPATION, ELASTIC_OUT, HEAVY, SOFT_SPLINE};
use super::{Channel as C, Layer, MotionDescriptor, Track, VariantKey};
use crate::action::Action;

const LINEAR: &[Easing] = &[Easing::Linear];
const EASE_OUT: &[Easing] = &[Easing::EaseOut];
const EASE_IN_OUT: &[Easing] = &[Easing::EaseInOut];
const SPRING: &[Easing] = &[Easing::EaseOutBack];
const JUMP_EASINGS: &[Easing] = &[ANTICIPATION, Easing::EaseOut, ELASTIC_OUT];

const JUMP_TIMES: &[f32] = &[0.0, 0.15, 0.5, 1.0];
const IDEA_TIMES: &[f32] = &[0.0, 0.1, 0.5, 1.0];

/// Tween for targets declared without explicit timing
const SETTLE: Timing = Timing::once(0.3, EASE_OUT);

const fn track(channel: C, keyframes: &'static [f32], timing: Timing) -> Track {
    Track::new(channel, keyframes, timing)
}

// ============================================================================
// Body
// ============================================================================

const BREATH: Timing = Timing::looping(4.5, EASE_IN_OUT);
static BODY_IDLE: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, -6.0, 0.0], BREATH),
        track(C::ScaleY, &[1.0, 1.02, 1.0], BREATH),
        track(C::ScaleX, &[1.0, 0.98, 1.0], BREATH),
        track(C::RotateZ, &[0.0], SETTLE),
    ],
};

const ANTICIPATE: Timing = Timing::once(0.15, EASE_OUT);
static BODY_TRANSITION: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::ScaleY, &[0.85], ANTICIPATE),
        track(C::ScaleX, &[1.15], ANTICIPATE),
        track(C::Y, &[8.0], ANTICIPATE),
    ],
};

static BODY_FIDGET_WIGGLE: MotionDescriptor = MotionDescriptor {
    tracks: &[track(
        C::RotateZ,
        &[0.0, -3.0, 3.0, -2.0, 2.0, 0.0],
        Timing::once(0.6, EASE_IN_OUT),
    )],
};

const HOP: Timing = Timing::once(0.4, EASE_OUT);
static BODY_FIDGET_BOUNCE: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, -10.0, 0.0], HOP),
        track(C::ScaleY, &[1.0, 1.1, 1.0], HOP),
    ],
};

const NOD: Timing = Timing::once(0.7, &[SOFT_SPLINE]);
static BODY_NOD: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, 8.0, -4.0, 8.0, 0.0], NOD),
        track(C::RotateX, &[0.0, 15.0, -5.0, 5.0, 0.0], NOD),
        track(C::ScaleY, &[1.0, 0.95, 1.05, 0.98, 1.0], NOD),
    ],
};

const SHAKE: Timing = Timing::once(0.6, LINEAR);
static BODY_SHAKE: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::X, &[0.0, -10.0, 10.0, -6.0, 6.0, -3.0, 3.0, 0.0], SHAKE),
        track(C::RotateZ, &[0.0, -3.0, 3.0, -2.0, 2.0, -1.0, 1.0, 0.0], SHAKE),
        track(C::Scale, &[1.0], SHAKE),
    ],
};

const JUMP: Timing = Timing::once(0.7, JUMP_EASINGS).with_times(JUMP_TIMES);
static BODY_HAPPY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, 15.0, -40.0, 0.0], JUMP),
        track(C::ScaleY, &[1.0, 0.7, 1.2, 1.0], JUMP),
        track(C::ScaleX, &[1.0, 1.3, 0.8, 1.0], JUMP),
        track(C::RotateZ, &[0.0, 0.0, -5.0, 0.0], JUMP),
    ],
};

const SLUMP: Timing = Timing::once(1.2, &[HEAVY]);
static BODY_SAD: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, 25.0], SLUMP),
        track(C::ScaleY, &[1.0, 0.9], SLUMP),
        track(C::ScaleX, &[1.0, 1.08], SLUMP),
        track(C::RotateX, &[10.0], SLUMP),
    ],
};

const POP: Timing = Timing::once(0.5, &[ELASTIC_OUT]);
static BODY_EMPHASIS: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.0, 0.9, 1.3, 1.0], POP),
        track(C::Y, &[0.0, 5.0, -10.0, 0.0], POP),
        track(C::RotateZ, &[0.0, -2.0, 2.0, 0.0], POP),
    ],
};

const PONDER: Timing = Timing::yoyo(1.5, EASE_IN_OUT);
static BODY_THINKING: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::RotateZ, &[0.0, 360.0], Timing::looping(3.0, LINEAR)),
        track(C::Y, &[0.0, -5.0, 0.0], PONDER),
        track(C::Scale, &[1.0, 0.95, 1.0], PONDER),
    ],
};

const SPIN_JUMP: Timing = Timing::once(0.9, &[ANTICIPATION]).with_times(IDEA_TIMES);
static BODY_IDEA: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, 10.0, -35.0, 0.0], SPIN_JUMP),
        track(C::Scale, &[1.0, 0.8, 1.15, 1.0], SPIN_JUMP),
        track(C::RotateZ, &[0.0, 0.0, 360.0, 360.0], SPIN_JUMP),
    ],
};

const TILT: Timing = Timing::once(1.2, EASE_IN_OUT).with_times(&[0.0, 0.2, 0.5, 0.8, 1.0]);
static BODY_CONFUSED: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::RotateZ, &[0.0, -15.0, 10.0, -5.0, 0.0], TILT),
        track(C::X, &[0.0, -15.0, 15.0, -5.0, 0.0], TILT),
        track(C::Scale, &[1.0], Timing::once(1.2, EASE_IN_OUT)),
    ],
};

static BODY_WAITING: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::RotateZ, &[-3.0, 3.0], Timing::yoyo(2.0, EASE_IN_OUT)),
        track(C::X, &[-2.0, 2.0], Timing::yoyo(3.0, EASE_IN_OUT)),
        track(C::Y, &[0.0, 2.0], Timing::yoyo(0.5, EASE_OUT)),
    ],
};

const STARTLE: Timing = Timing::once(0.4, SPRING);
static BODY_SURPRISED: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.0, 1.4, 1.3], STARTLE),
        track(C::Y, &[0.0, -20.0, -15.0], STARTLE),
        track(C::ScaleY, &[1.0, 1.5, 1.3], STARTLE),
        track(C::ScaleX, &[1.0, 0.8, 0.9], STARTLE),
    ],
};

const HEARTBEAT: Timing = Timing::looping(1.5, EASE_IN_OUT).with_repeat_delay(0.5);
static BODY_LOVE: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.0, 1.05, 1.0, 1.05, 1.0], HEARTBEAT),
        track(C::Y, &[0.0, -5.0, 0.0, -5.0, 0.0], HEARTBEAT),
        track(C::RotateZ, &[0.0, -3.0, 3.0, -3.0, 0.0], HEARTBEAT),
    ],
};

const DOZE: Timing = Timing::looping(5.0, EASE_IN_OUT);
static BODY_SLEEPY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, 4.0, 0.0], DOZE),
        track(C::ScaleY, &[1.0, 0.96, 1.0], DOZE),
        track(C::ScaleX, &[1.0, 1.02, 1.0], DOZE),
        track(C::RotateZ, &[0.0, 1.0, 0.0, -1.0, 0.0], DOZE),
    ],
};

static BODY_ANGRY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::X, &[-1.0, 1.0, -2.0, 2.0, -1.0, 1.0], Timing::looping(0.2, LINEAR)),
        track(C::Y, &[0.0, 2.0], Timing::once(0.2, EASE_IN_OUT)),
        track(C::Scale, &[1.05], SETTLE),
    ],
};

const WOBBLE: Timing = Timing::looping(1.2, EASE_IN_OUT).with_repeat_delay(0.5);
static BODY_SILLY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[0.0, -15.0, 0.0, -8.0, 0.0], WOBBLE),
        track(C::RotateZ, &[0.0, 15.0, -15.0, 5.0, -5.0, 0.0], WOBBLE),
        track(C::ScaleX, &[1.0, 0.9, 1.1, 0.95, 1.0], WOBBLE),
        track(C::ScaleY, &[1.0, 1.1, 0.9, 1.05, 1.0], WOBBLE),
    ],
};

static BODY_LISTENING: MotionDescriptor = MotionDescriptor {
    tracks: &[track(
        C::Scale,
        &[1.0, 1.05],
        Timing::yoyo(0.3, EASE_IN_OUT),
    )],
};

fn body(key: VariantKey) -> Option<&'static MotionDescriptor> {
    let descriptor = match key {
        VariantKey::Transition => &BODY_TRANSITION,
        VariantKey::FidgetWiggle => &BODY_FIDGET_WIGGLE,
        VariantKey::FidgetBounce => &BODY_FIDGET_BOUNCE,
        VariantKey::FidgetGlance => return None,
        VariantKey::Action(action) => match action {
            Action::Idle => &BODY_IDLE,
            Action::Waiting => &BODY_WAITING,
            Action::Listening => &BODY_LISTENING,
            Action::Nod => &BODY_NOD,
            Action::Shake => &BODY_SHAKE,
            Action::Emphasis => &BODY_EMPHASIS,
            Action::Thinking => &BODY_THINKING,
            Action::Confused => &BODY_CONFUSED,
            Action::Idea => &BODY_IDEA,
            Action::Happy => &BODY_HAPPY,
            Action::Sad => &BODY_SAD,
            Action::Surprised => &BODY_SURPRISED,
            Action::Love => &BODY_LOVE,
            Action::Sleepy => &BODY_SLEEPY,
            Action::Angry => &BODY_ANGRY,
            Action::Silly => &BODY_SILLY,
        },
    };
    Some(descriptor)
}

// ============================================================================
// Shadow
// ============================================================================

static SHADOW_IDLE: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.0], Timing::once(4.5, EASE_IN_OUT)),
        track(C::Opacity, &[0.3], Timing::once(4.5, EASE_IN_OUT)),
    ],
};

static SHADOW_TRANSITION: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.2], Timing::once(0.15, EASE_IN_OUT)),
        track(C::Opacity, &[0.4], Timing::once(0.15, EASE_IN_OUT)),
    ],
};

static SHADOW_HAPPY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.0, 1.2, 0.5, 1.0], JUMP),
        track(C::Opacity, &[0.3, 0.4, 0.1, 0.3], JUMP),
    ],
};

static SHADOW_IDEA: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.0, 1.1, 0.4, 1.0], SPIN_JUMP),
        track(C::Opacity, &[0.3, 0.4, 0.1, 0.3], SPIN_JUMP),
    ],
};

static SHADOW_SURPRISED: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[0.6], Timing::once(0.3, EASE_IN_OUT)),
        track(C::Opacity, &[0.1], Timing::once(0.3, EASE_IN_OUT)),
    ],
};

static SHADOW_SAD: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.2], Timing::once(1.0, EASE_IN_OUT)),
        track(C::Opacity, &[0.5], Timing::once(1.0, EASE_IN_OUT)),
    ],
};

static SHADOW_NOD: MotionDescriptor = MotionDescriptor {
    tracks: &[track(
        C::Scale,
        &[1.0, 1.1, 1.0, 1.1, 1.0],
        Timing::once(0.7, EASE_IN_OUT),
    )],
};

static SHADOW_EMPHASIS: MotionDescriptor = MotionDescriptor {
    tracks: &[track(
        C::Scale,
        &[1.0, 1.2, 0.8, 1.0],
        Timing::once(0.5, EASE_IN_OUT),
    )],
};

fn shadow(key: VariantKey) -> Option<&'static MotionDescriptor> {
    match key {
        VariantKey::Transition => Some(&SHADOW_TRANSITION),
        VariantKey::Action(Action::Idle) => Some(&SHADOW_IDLE),
        VariantKey::Action(Action::Happy) => Some(&SHADOW_HAPPY),
        VariantKey::Action(Action::Idea) => Some(&SHADOW_IDEA),
        VariantKey::Action(Action::Surprised) => Some(&SHADOW_SURPRISED),
        VariantKey::Action(Action::Sad) => Some(&SHADOW_SAD),
        VariantKey::Action(Action::Nod) => Some(&SHADOW_NOD),
        VariantKey::Action(Action::Emphasis) => Some(&SHADOW_EMPHASIS),
        _ => None,
    }
}

// ============================================================================
// Eyes
// ============================================================================

static EYE_IDLE: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.0], SETTLE),
        track(C::Y, &[0.0], SETTLE),
        track(C::RotateZ, &[0.0], SETTLE),
    ],
};

const BLINK: Timing = Timing::once(0.15, EASE_IN_OUT);
static EYE_TRANSITION: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::ScaleY, &[0.1], BLINK),
        track(C::Y, &[3.0], BLINK),
    ],
};

static EYE_FIDGET_GLANCE: MotionDescriptor = MotionDescriptor {
    tracks: &[track(
        C::X,
        &[0.0, -5.0, -5.0, 5.0, 5.0, 0.0],
        Timing::once(2.0, EASE_IN_OUT).with_times(&[0.0, 0.2, 0.4, 0.6, 0.8, 1.0]),
    )],
};

static EYE_CENTERED: MotionDescriptor = MotionDescriptor {
    tracks: &[track(C::X, &[0.0], SETTLE)],
};

const EYE_NOD_TIMING: Timing = Timing::once(0.7, EASE_IN_OUT);
static EYE_NOD: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::ScaleY, &[1.0, 0.1, 1.0], EYE_NOD_TIMING),
        track(C::Y, &[0.0, 2.0, 0.0], EYE_NOD_TIMING),
    ],
};

static EYE_SHAKE: MotionDescriptor = MotionDescriptor {
    tracks: &[track(
        C::X,
        &[-1.0, 1.0],
        Timing::once(0.5, EASE_IN_OUT),
    )],
};

const SQUINT: Timing = Timing::once(0.4, SPRING);
static EYE_HAPPY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::ScaleY, &[0.3], SQUINT),
        track(C::ScaleX, &[1.2], SQUINT),
        track(C::Y, &[-3.0], SQUINT),
    ],
};

static EYE_SAD: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::RotateZ, &[-15.0], SETTLE),
        track(C::Y, &[5.0], SETTLE),
        track(C::ScaleY, &[1.1], SETTLE),
    ],
};

static EYE_SURPRISED: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.5], SETTLE),
        track(C::Y, &[-2.0], SETTLE),
    ],
};

static EYE_ANGRY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[3.0], SETTLE),
        track(C::RotateZ, &[-15.0], SETTLE),
        track(C::ScaleY, &[0.9], SETTLE),
    ],
};

static EYE_SLEEPY: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::ScaleY, &[0.1], SETTLE),
        track(C::Y, &[3.0], SETTLE),
    ],
};

static EYE_ENLARGED: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.2], SETTLE),
        track(C::Y, &[0.0], SETTLE),
    ],
};

static EYE_CONFUSED: MotionDescriptor = MotionDescriptor {
    tracks: &[track(C::ScaleY, &[1.0], SETTLE)],
};

static EYE_IDEA: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Scale, &[1.3], SETTLE),
        track(C::Y, &[-3.0], SETTLE),
    ],
};

static EYE_WAITING: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::X, &[3.0], SETTLE),
        track(C::Y, &[3.0], SETTLE),
    ],
};

static EYE_EMPHASIS: MotionDescriptor = MotionDescriptor {
    tracks: &[track(C::Scale, &[1.2], SETTLE)],
};

static EYE_THINKING: MotionDescriptor = MotionDescriptor {
    tracks: &[
        track(C::Y, &[-2.0], SETTLE),
        track(C::X, &[2.0], SETTLE),
    ],
};

fn eye(key: VariantKey) -> Option<&'static MotionDescriptor> {
    let descriptor = match key {
        VariantKey::Transition => &EYE_TRANSITION,
        VariantKey::FidgetGlance => &EYE_FIDGET_GLANCE,
        VariantKey::FidgetWiggle | VariantKey::FidgetBounce => &EYE_CENTERED,
        VariantKey::Action(action) => match action {
            Action::Idle => &EYE_IDLE,
            Action::Nod => &EYE_NOD,
            Action::Shake => &EYE_SHAKE,
            Action::Happy => &EYE_HAPPY,
            Action::Sad => &EYE_SAD,
            Action::Surprised => &EYE_SURPRISED,
            Action::Angry => &EYE_ANGRY,
            Action::Sleepy => &EYE_SLEEPY,
            Action::Silly | Action::Love => &EYE_ENLARGED,
            Action::Confused => &EYE_CONFUSED,
            Action::Idea => &EYE_IDEA,
            Action::Waiting => &EYE_WAITING,
            Action::Emphasis => &EYE_EMPHASIS,
            Action::Thinking => &EYE_THINKING,
            Action::Listening => return None,
        },
    };
    Some(descriptor)
}

/// Look up the descriptor for a layer and key
///
/// Returns `None` where a layer has no entry for the key (e.g. most actions
/// on the shadow, `FidgetGlance` on the body). Callers hold the pose.
#[must_use]
pub fn descriptor(layer: Layer, key: VariantKey) -> Option<&'static MotionDescriptor> {
    match layer {
        Layer::Body => body(key),
        Layer::Eye => eye(key),
        Layer::Shadow => shadow(key),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const ALL_KEYS: [VariantKey; 4] = [
        VariantKey::Transition,
        VariantKey::FidgetWiggle,
        VariantKey::FidgetGlance,
        VariantKey::FidgetBounce,
    ];

    fn every_key() -> impl Iterator<Item = VariantKey> {
        Action::ALL
            .into_iter()
            .map(VariantKey::Action)
            .chain(ALL_KEYS)
    }

    #[test]
    fn test_every_action_has_a_body_motion() {
        for action in Action::ALL {
            assert!(
                descriptor(Layer::Body, VariantKey::Action(action)).is_some(),
                "{action} has no body motion"
            );
        }
        assert!(descriptor(Layer::Body, VariantKey::FidgetGlance).is_none());
    }

    #[test]
    fn test_shadow_entries_are_sparse() {
        let with_shadow = every_key()
            .filter(|key| descriptor(Layer::Shadow, *key).is_some())
            .count();
        assert_eq!(with_shadow, 8);
        assert!(descriptor(Layer::Shadow, VariantKey::Action(Action::Angry)).is_none());
    }

    #[test]
    fn test_listening_eyes_have_no_entry() {
        assert!(descriptor(Layer::Eye, VariantKey::Action(Action::Listening)).is_none());
        assert!(descriptor(Layer::Eye, VariantKey::FidgetGlance).is_some());
    }

    #[test]
    fn test_confused_holds_scale_without_phase_times() {
        let confused = descriptor(Layer::Body, VariantKey::Action(Action::Confused)).unwrap();
        let scale = confused.track(C::Scale).unwrap();
        assert_eq!(scale.keyframes, &[1.0]);
        assert!(scale.timing.times.is_none());
        assert!(confused.track(C::RotateZ).unwrap().timing.times.is_some());
    }

    #[test]
    fn test_tables_are_well_formed() {
        for layer in [Layer::Body, Layer::Eye, Layer::Shadow] {
            for key in every_key() {
                let Some(descriptor) = descriptor(layer, key) else {
                    continue;
                };
                for track in descriptor.tracks {
                    assert!(!track.keyframes.is_empty(), "{layer:?}/{key:?} empty track");
                    assert!(track.timing.duration_secs > 0.0);
                    if let Some(times) = track.timing.times {
                        assert_eq!(
                            times.len(),
                            track.keyframes.len(),
                            "{layer:?}/{key:?} {:?} times mismatch",
                            track.channel
                        );
                        assert!(times.windows(2).all(|w| w[0] <= w[1]));
                        assert!(times.first() == Some(&0.0) && times.last() == Some(&1.0));
                    }
                }
                let channels: HashSet<_> = descriptor.tracks.iter().map(|t| t.channel).collect();
                assert_eq!(
                    channels.len(),
                    descriptor.tracks.len(),
                    "{layer:?}/{key:?} duplicate channel"
                );
            }
        }
    }

    #[test]
    fn test_happy_jump_has_anticipation_then_stretch() {
        let happy = descriptor(Layer::Body, VariantKey::Action(Action::Happy)).unwrap();
        let y = happy.track(C::Y).unwrap();
        let scale_y = happy.track(C::ScaleY).unwrap();
        let scale_x = happy.track(C::ScaleX).unwrap();

        // Dip down and squash before the jump
        assert!(y.sample(0.0, 0.7 * 0.15) > 10.0);
        assert!(scale_y.sample(1.0, 0.7 * 0.15) < 0.8);
        assert!(scale_x.sample(1.0, 0.7 * 0.15) > 1.2);

        // Airborne and stretched
        assert!(y.sample(0.0, 0.35) < -35.0);
        assert!(scale_y.sample(1.0, 0.35) > 1.1);

        assert!(y.sample(0.0, 0.7).abs() < 1e-3);
    }

    #[test]
    fn test_repeating_states_never_finish() {
        for action in [Action::Idle, Action::Thinking, Action::Love, Action::Sleepy] {
            let motion = descriptor(Layer::Body, VariantKey::Action(action)).unwrap();
            assert!(!motion.is_finished(60.0), "{action} stopped repeating");
        }
        let nod = descriptor(Layer::Body, VariantKey::Action(Action::Nod)).unwrap();
        assert!(nod.is_finished(0.7));
    }
}
