//! Motion Timing
//!
//! Easing curves and repeat behavior for keyframe tracks. Progress is always
//! computed from elapsed time, so playback is frame-rate independent.

use serde::{Deserialize, Serialize};

/// Easing functions for smooth animation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
pub enum Easing {
    /// No easing (constant speed)
    Linear,

    /// Slow start, fast end
    EaseIn,

    /// Fast start, slow end
    EaseOut,

    /// Slow start and end
    #[default]
    EaseInOut,

    /// Overshoot then settle; used for springy pops
    EaseOutBack,

    /// CSS-style cubic bezier through (0,0), (x1,y1), (x2,y2), (1,1)
    CubicBezier(f32, f32, f32, f32),
}

/// General smooth curve
pub const SOFT_SPLINE: Easing = Easing::CubicBezier(0.25, 0.1, 0.25, 1.0);

/// Bouncy stop that overshoots its target
pub const ELASTIC_OUT: Easing = Easing::CubicBezier(0.34, 1.56, 0.64, 1.0);

/// Wind-up before the main move
pub const ANTICIPATION: Easing = Easing::CubicBezier(0.4, 0.0, 0.2, 1.0);

/// Heavy object settling
pub const HEAVY: Easing = Easing::CubicBezier(0.25, 0.46, 0.45, 0.94);

impl Easing {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// Input is clamped; output may leave `[0, 1]` for overshooting curves.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t).powi(2),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let t_minus_1 = t - 1.0;
                1.0 + c3 * t_minus_1.powi(3) + c1 * t_minus_1.powi(2)
            }
            Self::CubicBezier(x1, y1, x2, y2) => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let u = solve_bezier_x(x1, x2, t);
                bezier_axis(y1, y2, u)
            }
        }
    }
}

/// One axis of a unit cubic bezier at parameter `u`
fn bezier_axis(p1: f32, p2: f32, u: f32) -> f32 {
    let inv = 1.0 - u;
    3.0 * inv * inv * u * p1 + 3.0 * inv * u * u * p2 + u * u * u
}

fn bezier_axis_slope(p1: f32, p2: f32, u: f32) -> f32 {
    let inv = 1.0 - u;
    3.0 * inv * inv * p1 + 6.0 * inv * u * (p2 - p1) + 3.0 * u * u * (1.0 - p2)
}

/// Find the curve parameter whose x equals `x`
fn solve_bezier_x(x1: f32, x2: f32, x: f32) -> f32 {
    const EPSILON: f32 = 1e-5;

    let mut u = x;
    for _ in 0..8 {
        let err = bezier_axis(x1, x2, u) - x;
        if err.abs() < EPSILON {
            return u;
        }
        let slope = bezier_axis_slope(x1, x2, u);
        if slope.abs() < 1e-6 {
            break;
        }
        u -= err / slope;
    }

    // Newton stalled; x(u) is monotonic for x1, x2 in [0, 1] so bisect
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    u = x;
    for _ in 0..32 {
        let value = bezier_axis(x1, x2, u);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            lo = u;
        } else {
            hi = u;
        }
        u = (lo + hi) / 2.0;
    }
    u
}

/// How a track behaves once it reaches its end
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Repeat {
    /// Play once and hold the final value
    #[default]
    Once,
    /// Restart from the first keyframe
    Loop,
    /// Alternate forward and backward (yoyo)
    Reverse,
}

/// Timing of a keyframe track
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timing {
    /// Length of one play-through in seconds
    pub duration_secs: f32,
    /// Segment easings; a single entry applies to every segment
    pub easings: &'static [Easing],
    /// Explicit keyframe offsets in `[0, 1]`; evenly spaced when `None`
    pub times: Option<&'static [f32]>,
    /// Repeat behavior
    pub repeat: Repeat,
    /// Pause between repeats in seconds
    pub repeat_delay_secs: f32,
}

impl Timing {
    /// Single-play timing with one easing
    #[must_use]
    pub const fn once(duration_secs: f32, easings: &'static [Easing]) -> Self {
        Self {
            duration_secs,
            easings,
            times: None,
            repeat: Repeat::Once,
            repeat_delay_secs: 0.0,
        }
    }

    /// Endlessly looping timing
    #[must_use]
    pub const fn looping(duration_secs: f32, easings: &'static [Easing]) -> Self {
        Self {
            duration_secs,
            easings,
            times: None,
            repeat: Repeat::Loop,
            repeat_delay_secs: 0.0,
        }
    }

    /// Endlessly alternating timing
    #[must_use]
    pub const fn yoyo(duration_secs: f32, easings: &'static [Easing]) -> Self {
        Self {
            duration_secs,
            easings,
            times: None,
            repeat: Repeat::Reverse,
            repeat_delay_secs: 0.0,
        }
    }

    /// Set explicit keyframe offsets
    #[must_use]
    pub const fn with_times(mut self, times: &'static [f32]) -> Self {
        self.times = Some(times);
        self
    }

    /// Set the pause between repeats
    #[must_use]
    pub const fn with_repeat_delay(mut self, secs: f32) -> Self {
        self.repeat_delay_secs = secs;
        self
    }

    /// Easing for segment `index`
    #[must_use]
    pub fn easing_for(&self, index: usize) -> Easing {
        match self.easings {
            [] => Easing::default(),
            [single] => *single,
            many => many[index.min(many.len() - 1)],
        }
    }

    /// Whether a single play-through has completed
    #[must_use]
    pub fn is_finished(&self, elapsed_secs: f32) -> bool {
        self.repeat == Repeat::Once && elapsed_secs >= self.duration_secs
    }

    /// Linear progress through the current play-through, in `[0, 1]`
    ///
    /// Accounts for repeats: loops wrap, reversing tracks run backwards on
    /// odd cycles, and the repeat delay holds the end value.
    #[must_use]
    pub fn progress(&self, elapsed_secs: f32) -> f32 {
        let elapsed = elapsed_secs.max(0.0);
        if self.duration_secs <= 0.0 {
            return 1.0;
        }

        match self.repeat {
            Repeat::Once => (elapsed / self.duration_secs).min(1.0),
            Repeat::Loop | Repeat::Reverse => {
                let period = self.duration_secs + self.repeat_delay_secs.max(0.0);
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let cycle = (elapsed / period).floor() as u64;
                let phase = elapsed - period * cycle as f32;
                let forward = (phase / self.duration_secs).min(1.0);
                if self.repeat == Repeat::Reverse && cycle % 2 == 1 {
                    1.0 - forward
                } else {
                    forward
                }
            }
        }
    }
}
