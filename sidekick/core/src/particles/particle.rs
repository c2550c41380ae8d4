//! Particle record and per-kind physics
//!
//! One record type for every effect; behavior is selected by matching on
//! [`ParticleKind`]. Physics advance by one constant nominal step per tick.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::appearance::Color;
use crate::random::RandomSource;

/// Downward acceleration applied to confetti each step
pub const GRAVITY: f32 = 0.2;

/// Horizontal velocity retained by confetti each step
pub const AIR_DRAG: f32 = 0.98;

/// Rain dies once it falls below this y coordinate
pub const RAIN_FLOOR_Y: f32 = 150.0;

/// Wall-clock divisor (ms) of the glyph wiggle
const GLYPH_WIGGLE_DIVISOR_MS: f32 = 200.0;

/// Horizontal amplitude of the glyph wiggle per step
const GLYPH_WIGGLE_AMPLITUDE: f32 = 0.5;

/// Shape and behavior of a particle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Tumbling paper square launched upward, falls under gravity
    Confetti,
    /// Steam puff rising upward
    RisingCircle,
    /// Heart floating upward
    Heart,
    /// Rain streak falling straight down
    Rain,
    /// Rotating five-point star
    Star,
    /// Text glyph drifting up and to the right
    Glyph,
}

/// A single ephemeral effect particle
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Kind
    pub kind: ParticleKind,
    /// Horizontal position in surface px
    pub x: f32,
    /// Vertical position in surface px
    pub y: f32,
    /// Horizontal velocity per step
    pub vx: f32,
    /// Vertical velocity per step
    pub vy: f32,
    /// Visual size in px
    pub size: f32,
    /// Fill color
    pub color: Color,
    /// Draw opacity, `max(0, life)`
    pub alpha: f32,
    /// Rotation in radians
    pub rotation: f32,
    /// Rotation per step in radians
    pub rotation_speed: f32,
    /// Remaining life; removed at or below zero
    pub life: f32,
    /// Life lost per step
    pub decay: f32,
    /// Text for glyph particles
    pub glyph: Option<char>,
}

impl Particle {
    /// Create a particle at `(x, y)` with kind-specific initial physics
    ///
    /// Every kind starts from the same randomized defaults (spin, slow
    /// drift, 0.01-0.03 decay, 5-10 px size) which the kind then overrides.
    pub fn spawn(
        kind: ParticleKind,
        x: f32,
        y: f32,
        color: Color,
        scale: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut particle = Self {
            kind,
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            size: 0.0,
            color,
            alpha: 1.0,
            rotation: rng.next_f32() * TAU,
            rotation_speed: (rng.next_f32() - 0.5) * 0.2,
            life: 1.0,
            decay: 0.0,
            glyph: None,
        };
        particle.vx = (rng.next_f32() - 0.5) * 2.0;
        particle.vy = (rng.next_f32() - 0.5) * 2.0;
        particle.decay = 0.01 + rng.next_f32() * 0.02;
        particle.size = (5.0 + rng.next_f32() * 5.0) * scale;

        match kind {
            ParticleKind::Confetti => {
                let angle = -PI / 2.0 + (rng.next_f32() - 0.5);
                let speed = (5.0 + rng.next_f32() * 10.0) * scale;
                particle.vx = angle.cos() * speed;
                particle.vy = angle.sin() * speed;
                particle.decay = 0.005;
            }
            ParticleKind::Rain => {
                particle.vx = 0.0;
                particle.vy = (5.0 + rng.next_f32() * 5.0) * scale;
                particle.decay = 0.005;
                particle.life = 1.0 + rng.next_f32();
            }
            ParticleKind::RisingCircle => {
                particle.vx = (rng.next_f32() - 0.5) * scale;
                particle.vy = -(1.0 + rng.next_f32()) * scale;
                particle.decay = 0.02;
            }
            ParticleKind::Heart => {
                particle.vy = -(1.0 + rng.next_f32() * 2.0) * scale;
                particle.vx = (rng.next_f32() - 0.5) * 0.5 * scale;
                particle.decay = 0.008;
            }
            ParticleKind::Glyph => {
                particle.vy = -0.5 * scale;
                particle.vx = 0.5 * scale;
                particle.decay = 0.005;
                particle.size = 20.0 * scale;
                particle.glyph = Some('Z');
            }
            ParticleKind::Star => {}
        }

        particle.alpha = particle.life.clamp(0.0, 1.0);
        particle
    }

    /// Advance one nominal step
    ///
    /// `clock` is wall-clock time; glyph wiggle follows it rather than the
    /// step count so its period is frame-rate independent.
    pub fn update(&mut self, clock: Duration) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= self.decay;
        self.rotation += self.rotation_speed;

        match self.kind {
            ParticleKind::Confetti => {
                self.vy += GRAVITY;
                self.vx *= AIR_DRAG;
            }
            ParticleKind::Glyph => {
                #[allow(clippy::cast_precision_loss)]
                let ms = clock.as_millis() as f32;
                self.x += (ms / GLYPH_WIGGLE_DIVISOR_MS).sin() * GLYPH_WIGGLE_AMPLITUDE;
            }
            ParticleKind::Rain if self.y > RAIN_FLOOR_Y => {
                self.life = 0.0;
            }
            _ => {}
        }

        self.alpha = self.life.max(0.0);
    }

    /// Whether the particle is still live
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn spawn(kind: ParticleKind, value: f32) -> Particle {
        let mut rng = ScriptedRandom::constant(value);
        Particle::spawn(kind, 150.0, 150.0, Color::rgb(1, 2, 3), 1.0, &mut rng)
    }

    #[test]
    fn test_default_physics_for_star() {
        let star = spawn(ParticleKind::Star, 0.5);
        assert!(star.vx.abs() < 1e-6);
        assert!(star.vy.abs() < 1e-6);
        assert!((star.decay - 0.02).abs() < 1e-6);
        assert!((star.size - 7.5).abs() < 1e-6);
    }

    #[test]
    fn test_confetti_launches_up() {
        let confetti = spawn(ParticleKind::Confetti, 0.5);
        assert!(confetti.vy < -9.0);
        assert!(confetti.vx.abs() < 1e-3);
        assert!((confetti.decay - 0.005).abs() < 1e-6);
    }

    #[test]
    fn test_confetti_gravity_and_drag() {
        let mut confetti = spawn(ParticleKind::Confetti, 0.9);
        let (vx, vy) = (confetti.vx, confetti.vy);
        confetti.update(Duration::ZERO);
        assert!((confetti.vy - (vy + GRAVITY)).abs() < 1e-5);
        assert!((confetti.vx - vx * AIR_DRAG).abs() < 1e-5);
    }

    #[test]
    fn test_rain_falls_and_dies_at_floor() {
        let mut rain = spawn(ParticleKind::Rain, 0.0);
        rain.y = 50.0;
        assert!(rain.vx.abs() < f32::EPSILON);
        assert!((rain.vy - 5.0).abs() < 1e-6);
        assert!((rain.life - 1.0).abs() < 1e-6);

        let mut steps = 0;
        while rain.is_alive() {
            rain.update(Duration::ZERO);
            steps += 1;
        }
        // 50 -> 155 crosses the floor on step 21 with plenty of life left
        assert_eq!(steps, 21);
        assert!(rain.y > RAIN_FLOOR_Y);
        assert!(rain.alpha.abs() < f32::EPSILON);
    }

    #[test]
    fn test_rising_circle_and_heart_go_up() {
        assert!(spawn(ParticleKind::RisingCircle, 0.3).vy < 0.0);
        let heart = spawn(ParticleKind::Heart, 0.0);
        assert!((heart.vy + 1.0).abs() < 1e-6);
        assert!((heart.decay - 0.008).abs() < 1e-6);
    }

    #[test]
    fn test_glyph_is_fixed_size_z() {
        let glyph = spawn(ParticleKind::Glyph, 0.7);
        assert_eq!(glyph.glyph, Some('Z'));
        assert!((glyph.size - 20.0).abs() < f32::EPSILON);
        assert!(glyph.vy < 0.0 && glyph.vx > 0.0);
    }

    #[test]
    fn test_glyph_wiggle_follows_clock() {
        let mut a = spawn(ParticleKind::Glyph, 0.5);
        let mut b = a.clone();
        a.update(Duration::ZERO);
        b.update(Duration::from_millis(314));
        // sin(0) = 0, sin(1.57) ~ 1
        assert!((b.x - a.x - GLYPH_WIGGLE_AMPLITUDE).abs() < 1e-3);
    }

    #[test]
    fn test_life_strictly_decreases_and_alpha_clamps() {
        let mut heart = spawn(ParticleKind::Heart, 0.4);
        let mut last = heart.life;
        while heart.is_alive() {
            heart.update(Duration::ZERO);
            assert!(heart.life < last);
            assert!(heart.alpha >= 0.0);
            last = heart.life;
        }
        assert!(heart.alpha.abs() < f32::EPSILON);
    }

    #[test]
    fn test_scale_applies_to_size_and_speed() {
        let mut rng = ScriptedRandom::constant(0.0);
        let big = Particle::spawn(ParticleKind::Rain, 0.0, 0.0, Color::rgb(0, 0, 0), 1.4, &mut rng);
        assert!((big.vy - 7.0).abs() < 1e-5);
        assert!((big.size - 7.0).abs() < 1e-5);
    }
}
