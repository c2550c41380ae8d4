//! Animation System - Layered Pose Interpolation
//!
//! The sidekick is drawn as three independently posed layers (body, eyes,
//! shadow). Each layer looks up a [`MotionDescriptor`] by [`VariantKey`] in
//! the static [`tables`] and a single generic [`LayerAnimator`] samples it.
//!
//! # Architecture
//!
//! ```text
//! ExpressionController (effective keys)
//!     │
//!     ├─→ LayerAnimator(Body)   ─→ tables::descriptor(Body, key)
//!     ├─→ LayerAnimator(Eye) x2 ─→ tables::descriptor(Eye, key) + side overrides
//!     └─→ LayerAnimator(Shadow) ─→ tables::descriptor(Shadow, key)
//! ```
//!
//! Descriptors are pure data. There is no per-action code path: every key
//! flows through [`Track::sample`].

pub mod tables;
mod timing;

pub use timing::{Easing, Repeat, Timing, ANTICIPATION, ELASTIC_OUT, HEAVY, SOFT_SPLINE};

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Timing used for single-value channel overrides
pub const OVERRIDE_TIMING: Timing = Timing::once(0.3, &[Easing::EaseOut]);

/// An animatable pose property
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Horizontal offset in px
    X,
    /// Vertical offset in px (positive is down)
    Y,
    /// Uniform scale, multiplied into both axes
    Scale,
    /// Horizontal scale
    ScaleX,
    /// Vertical scale
    ScaleY,
    /// In-plane rotation in degrees
    RotateZ,
    /// Forward tilt in degrees
    RotateX,
    /// Opacity in `[0, 1]`
    Opacity,
}

impl Channel {
    /// Every channel
    pub const ALL: [Channel; 8] = [
        Channel::X,
        Channel::Y,
        Channel::Scale,
        Channel::ScaleX,
        Channel::ScaleY,
        Channel::RotateZ,
        Channel::RotateX,
        Channel::Opacity,
    ];
}

/// Sampled transform of one layer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Horizontal offset in px
    pub x: f32,
    /// Vertical offset in px
    pub y: f32,
    /// Uniform scale
    pub scale: f32,
    /// Horizontal scale
    pub scale_x: f32,
    /// Vertical scale
    pub scale_y: f32,
    /// In-plane rotation in degrees
    pub rotate_z: f32,
    /// Forward tilt in degrees
    pub rotate_x: f32,
    /// Opacity
    pub opacity: f32,
}

impl Pose {
    /// Identity transform, fully opaque
    pub const REST: Pose = Pose {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotate_z: 0.0,
        rotate_x: 0.0,
        opacity: 1.0,
    };

    /// Read a channel
    #[must_use]
    pub const fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::X => self.x,
            Channel::Y => self.y,
            Channel::Scale => self.scale,
            Channel::ScaleX => self.scale_x,
            Channel::ScaleY => self.scale_y,
            Channel::RotateZ => self.rotate_z,
            Channel::RotateX => self.rotate_x,
            Channel::Opacity => self.opacity,
        }
    }

    /// Write a channel
    pub fn set(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::X => self.x = value,
            Channel::Y => self.y = value,
            Channel::Scale => self.scale = value,
            Channel::ScaleX => self.scale_x = value,
            Channel::ScaleY => self.scale_y = value,
            Channel::RotateZ => self.rotate_z = value,
            Channel::RotateX => self.rotate_x = value,
            Channel::Opacity => self.opacity = value,
        }
    }

    /// Net horizontal scale (`scale * scale_x`)
    #[must_use]
    pub fn effective_scale_x(&self) -> f32 {
        self.scale * self.scale_x
    }

    /// Net vertical scale (`scale * scale_y`)
    ///
    /// Forward tilt foreshortens the layer vertically.
    #[must_use]
    pub fn effective_scale_y(&self) -> f32 {
        self.scale * self.scale_y * self.rotate_x.to_radians().cos().abs()
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::REST
    }
}

/// Keyframes for one channel
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    /// Channel driven by this track
    pub channel: Channel,
    /// One target, or an ordered multi-phase sequence
    pub keyframes: &'static [f32],
    /// Duration, easing and repeat
    pub timing: Timing,
}

impl Track {
    /// Create a track
    #[must_use]
    pub const fn new(channel: Channel, keyframes: &'static [f32], timing: Timing) -> Self {
        Self {
            channel,
            keyframes,
            timing,
        }
    }

    /// Sample the channel value `elapsed_secs` after the track started
    ///
    /// A single keyframe tweens from `from`; sequences start at their own
    /// first keyframe.
    #[must_use]
    pub fn sample(&self, from: f32, elapsed_secs: f32) -> f32 {
        let progress = self.timing.progress(elapsed_secs);

        match self.keyframes {
            [] => from,
            [target] => lerp(from, *target, self.timing.easing_for(0).apply(progress)),
            frames => {
                let (segment, local) = self.locate(frames.len(), progress);
                let eased = self.timing.easing_for(segment).apply(local);
                lerp(frames[segment], frames[segment + 1], eased)
            }
        }
    }

    /// Segment index and local progress for a sequence of `count` keyframes
    fn locate(&self, count: usize, progress: f32) -> (usize, f32) {
        let last_segment = count - 1;
        #[allow(clippy::cast_precision_loss)]
        let offset = |i: usize| -> f32 {
            match self.timing.times {
                Some(times) if times.len() == count => times[i],
                _ => i as f32 / last_segment as f32,
            }
        };

        let mut segment = 0;
        while segment + 1 < last_segment && progress >= offset(segment + 1) {
            segment += 1;
        }

        let start = offset(segment);
        let width = offset(segment + 1) - start;
        let local = if width > 0.0 {
            ((progress - start) / width).clamp(0.0, 1.0)
        } else {
            1.0
        };
        (segment, local)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Motion for one layer under one key
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionDescriptor {
    /// Channel tracks; channels not listed ease back to rest
    pub tracks: &'static [Track],
}

impl MotionDescriptor {
    /// Track driving `channel`, if any
    #[must_use]
    pub fn track(&self, channel: Channel) -> Option<&'static Track> {
        self.tracks.iter().find(|track| track.channel == channel)
    }

    /// Whether every track has played through (never true for repeating tracks)
    #[must_use]
    pub fn is_finished(&self, elapsed_secs: f32) -> bool {
        self.tracks
            .iter()
            .all(|track| track.timing.is_finished(elapsed_secs))
    }
}

/// Lookup key for the motion tables
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantKey {
    /// Pose for a board action
    Action(Action),
    /// Anticipation squash and eye close between actions
    Transition,
    /// Idle wiggle
    FidgetWiggle,
    /// Idle sideways glance
    FidgetGlance,
    /// Idle hop
    FidgetBounce,
}

impl From<Action> for VariantKey {
    fn from(action: Action) -> Self {
        Self::Action(action)
    }
}

/// An independently posed part of the sidekick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    /// Body, including face and antenna
    Body,
    /// One eye
    Eye,
    /// Ground shadow
    Shadow,
}

impl Layer {
    /// Pose before any motion has played
    #[must_use]
    pub const fn rest_pose(self) -> Pose {
        match self {
            Self::Shadow => Pose {
                opacity: 0.3,
                ..Pose::REST
            },
            Self::Body | Self::Eye => Pose::REST,
        }
    }
}

/// Samples the active descriptor of one layer over time
///
/// Changing the key or overrides restarts playback from the pose last
/// sampled, so interrupted motions blend instead of snapping. Channels the
/// new descriptor does not name ease back to the layer's rest value; a key
/// with no descriptor freezes the whole pose.
#[derive(Clone, Debug)]
pub struct LayerAnimator {
    layer: Layer,
    key: Option<VariantKey>,
    overrides: &'static [(Channel, f32)],
    from: Pose,
    current: Pose,
    started_at: Duration,
}

impl LayerAnimator {
    /// Create an animator resting at the layer's default pose
    #[must_use]
    pub fn new(layer: Layer) -> Self {
        let rest = layer.rest_pose();
        Self {
            layer,
            key: None,
            overrides: &[],
            from: rest,
            current: rest,
            started_at: Duration::ZERO,
        }
    }

    /// Layer this animator drives
    #[must_use]
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Active key, if any has been set
    #[must_use]
    pub fn key(&self) -> Option<VariantKey> {
        self.key
    }

    /// Last sampled pose
    #[must_use]
    pub fn pose(&self) -> Pose {
        self.current
    }

    /// Point the animator at a key with optional per-channel overrides
    ///
    /// Re-setting the same target is a no-op.
    pub fn set_target(
        &mut self,
        key: VariantKey,
        overrides: &'static [(Channel, f32)],
        now: Duration,
    ) {
        if self.key == Some(key) && self.overrides == overrides {
            return;
        }
        tracing::trace!(layer = ?self.layer, ?key, "Layer target changed");
        self.key = Some(key);
        self.overrides = overrides;
        self.from = self.current;
        self.started_at = now;
    }

    /// Sample the pose at `now`
    pub fn sample(&mut self, now: Duration) -> Pose {
        let elapsed = now.saturating_sub(self.started_at).as_secs_f32();
        let tween = OVERRIDE_TIMING.easing_for(0).apply(OVERRIDE_TIMING.progress(elapsed));
        let mut pose = self.from;

        if let Some(descriptor) = self.key.and_then(|key| self.descriptor(key)) {
            let rest = self.layer.rest_pose();
            for channel in Channel::ALL {
                let from = self.from.get(channel);
                match descriptor.track(channel) {
                    Some(track) => pose.set(channel, track.sample(from, elapsed)),
                    None => pose.set(channel, lerp(from, rest.get(channel), tween)),
                }
            }
        }

        for (channel, target) in self.overrides {
            pose.set(*channel, lerp(self.from.get(*channel), *target, tween));
        }

        self.current = pose;
        pose
    }

    /// Whether the active motion has come to rest
    #[must_use]
    pub fn is_settled(&self, now: Duration) -> bool {
        let elapsed = now.saturating_sub(self.started_at).as_secs_f32();
        let overrides_done = self.overrides.is_empty() || OVERRIDE_TIMING.is_finished(elapsed);
        let tracks_done = self
            .key
            .and_then(|key| self.descriptor(key))
            .map_or(true, |descriptor| descriptor.is_finished(elapsed));
        overrides_done && tracks_done
    }

    fn descriptor(&self, key: VariantKey) -> Option<&'static MotionDescriptor> {
        tables::descriptor(self.layer, key).or_else(|| match self.layer {
            Layer::Eye => tables::descriptor(Layer::Eye, VariantKey::Action(Action::Idle)),
            Layer::Body | Layer::Shadow => None,
        })
    }
}
