//! Particle engine
//!
//! A bounded pool of effect particles simulated on a fixed logical surface
//! of [`SURFACE_SIZE`] px square. Each tick runs strictly in this order:
//!
//! 1. spawn candidates for the current action (global emission gate, then
//!    the action's own chance, clipped to the pool cap)
//! 2. integrate every particle by one nominal step
//! 3. cull particles whose life reached zero
//! 4. clear the surface and draw the survivors
//!
//! Physics advance one constant step per tick regardless of the elapsed
//! time, so particle speed follows the display refresh rate. The elapsed
//! time only feeds the wall-clock glyph wiggle.

mod draw;
mod particle;

use std::time::Duration;

use tracing::{debug, trace};

pub use draw::{
    draw_particle, flatten_path, shape_for, Paint, PathCommand, RecordingSurface, Shape, Surface,
};
pub use particle::{Particle, ParticleKind, AIR_DRAG, GRAVITY, RAIN_FLOOR_Y};

use crate::action::Action;
use crate::appearance::{palette, Color};
use crate::random::RandomSource;

/// Width and height of the logical particle surface in px
pub const SURFACE_SIZE: f32 = 300.0;

/// Probability that a tick runs the spawn pass at all
pub const EMISSION_RATE: f32 = 0.2;

/// Vertical position of the emission band above the body
const BAND_Y: f32 = 50.0;

/// Where new particles appear
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnOrigin {
    /// Surface center
    Center,
    /// Random x in `[left, left + width)` on the emission band
    Band {
        /// Left edge of the band
        left: f32,
        /// Band width
        width: f32,
    },
    /// Fixed point
    Point(f32, f32),
    /// Jittered square of side `spread` centered above the body
    Scatter {
        /// Side length of the jitter square
        spread: f32,
    },
}

impl SpawnOrigin {
    fn resolve(self, rng: &mut dyn RandomSource) -> (f32, f32) {
        let center = SURFACE_SIZE / 2.0;
        match self {
            Self::Center => (center, center),
            Self::Band { left, width } => (left + rng.next_f32() * width, BAND_Y),
            Self::Point(x, y) => (x, y),
            Self::Scatter { spread } => {
                let x = center + (rng.next_f32() - 0.5) * spread;
                let y = BAND_Y + (rng.next_f32() - 0.5) * spread;
                (x, y)
            }
        }
    }
}

/// Fill color of spawned particles
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnColor {
    /// Always the same color
    Fixed(Color),
    /// Uniform pick per particle
    OneOf(&'static [Color]),
}

impl SpawnColor {
    fn pick(self, rng: &mut dyn RandomSource) -> Color {
        match self {
            Self::Fixed(color) => color,
            Self::OneOf(colors) => colors
                .get(rng.pick_index(colors.len()))
                .copied()
                .unwrap_or_default(),
        }
    }
}

/// Spawn behavior for one action
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRule {
    /// Action that enables the rule
    pub action: Action,
    /// Kind of particle produced
    pub kind: ParticleKind,
    /// Spawning stops while the pool holds this many particles
    pub cap: usize,
    /// Chance per spawn pass; `1.0` spawns on every pass without a draw
    pub chance: f32,
    /// Particles pushed per successful pass
    pub burst: usize,
    /// Where they appear
    pub origin: SpawnOrigin,
    /// What color they are
    pub color: SpawnColor,
}

/// Spawn rules; actions without an entry spawn nothing
pub static SPAWN_RULES: [SpawnRule; 6] = [
    SpawnRule {
        action: Action::Happy,
        kind: ParticleKind::Confetti,
        cap: 50,
        chance: 1.0,
        burst: 5,
        origin: SpawnOrigin::Center,
        color: SpawnColor::OneOf(&palette::CONFETTI),
    },
    SpawnRule {
        action: Action::Sad,
        kind: ParticleKind::Rain,
        cap: 40,
        chance: 0.5,
        burst: 1,
        origin: SpawnOrigin::Band {
            left: 100.0,
            width: 100.0,
        },
        color: SpawnColor::Fixed(palette::RAIN),
    },
    SpawnRule {
        action: Action::Love,
        kind: ParticleKind::Heart,
        cap: 15,
        chance: 0.2,
        burst: 1,
        origin: SpawnOrigin::Center,
        color: SpawnColor::Fixed(palette::HEART),
    },
    SpawnRule {
        action: Action::Angry,
        kind: ParticleKind::RisingCircle,
        cap: 30,
        chance: 1.0,
        burst: 1,
        origin: SpawnOrigin::Band {
            left: 120.0,
            width: 60.0,
        },
        color: SpawnColor::Fixed(palette::STEAM),
    },
    SpawnRule {
        action: Action::Sleepy,
        kind: ParticleKind::Glyph,
        cap: 5,
        chance: 0.05,
        burst: 1,
        origin: SpawnOrigin::Point(170.0, BAND_Y),
        color: SpawnColor::Fixed(palette::GLYPH),
    },
    SpawnRule {
        action: Action::Idea,
        kind: ParticleKind::Star,
        cap: 20,
        chance: 0.3,
        burst: 1,
        origin: SpawnOrigin::Scatter { spread: 100.0 },
        color: SpawnColor::Fixed(palette::STAR),
    },
];

/// Spawn rule for an action, if it emits particles
#[must_use]
pub fn spawn_rule(action: Action) -> Option<&'static SpawnRule> {
    SPAWN_RULES.iter().find(|rule| rule.action == action)
}

/// Owns the particle pool and the surface it draws on
#[derive(Debug)]
pub struct ParticleEngine<S: Surface> {
    pool: Vec<Particle>,
    surface: S,
    clock: Duration,
    running: bool,
}

impl<S: Surface> ParticleEngine<S> {
    /// Create a running engine drawing onto `surface`
    pub fn new(surface: S) -> Self {
        Self {
            pool: Vec::new(),
            surface,
            clock: Duration::ZERO,
            running: true,
        }
    }

    /// Spawn, integrate and cull without drawing
    pub fn step(&mut self, action: Action, scale: f32, delta: Duration, rng: &mut dyn RandomSource) {
        if !self.running {
            return;
        }
        self.clock += delta;
        self.spawn(action, scale, rng);

        let clock = self.clock;
        for particle in &mut self.pool {
            particle.update(clock);
        }
        self.pool.retain(Particle::is_alive);

        trace!(count = self.pool.len(), action = %action, "particle step");
    }

    /// Clear the surface and draw every live particle
    pub fn render(&mut self) {
        if !self.running {
            return;
        }
        self.surface.clear();
        for particle in &self.pool {
            draw_particle(particle, &mut self.surface);
        }
    }

    /// One full tick: [`step`](Self::step) then [`render`](Self::render)
    pub fn tick(&mut self, action: Action, scale: f32, delta: Duration, rng: &mut dyn RandomSource) {
        self.step(action, scale, delta, rng);
        self.render();
    }

    /// Stop the loop, drop every particle and blank the surface
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.pool.clear();
        self.surface.clear();
        debug!("particle engine stopped");
    }

    /// Whether ticks still do anything
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Live particle count
    #[must_use]
    pub fn len(&self) -> usize {
        self.pool.len()
    }

    /// Whether the pool is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Live particles of one kind
    #[must_use]
    pub fn count_of(&self, kind: ParticleKind) -> usize {
        self.pool.iter().filter(|p| p.kind == kind).count()
    }

    /// Live particles
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.pool
    }

    /// The drawing surface
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the drawing surface
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn spawn(&mut self, action: Action, scale: f32, rng: &mut dyn RandomSource) {
        let Some(rule) = spawn_rule(action) else {
            return;
        };
        if !rng.chance(EMISSION_RATE) {
            return;
        }
        if self.pool.len() >= rule.cap {
            return;
        }
        if rule.chance < 1.0 && !rng.chance(rule.chance) {
            return;
        }

        let room = rule.cap - self.pool.len();
        for _ in 0..rule.burst.min(room) {
            let (x, y) = rule.origin.resolve(rng);
            let color = rule.color.pick(rng);
            self.pool
                .push(Particle::spawn(rule.kind, x, y, color, scale, rng));
        }
    }
}
