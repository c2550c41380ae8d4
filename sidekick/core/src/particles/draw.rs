//! Immediate-mode drawing surface
//!
//! The engine clears and redraws every live particle each tick. Surfaces
//! receive filled primitives in particle-local coordinates plus a [`Paint`]
//! carrying the translation, rotation, color and opacity.

use super::particle::{Particle, ParticleKind};
use crate::appearance::Color;

/// A path step for curved outlines
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath
    MoveTo(f32, f32),
    /// Cubic bezier to `to` through control points `c1`, `c2`
    CubicTo {
        /// First control point
        c1: (f32, f32),
        /// Second control point
        c2: (f32, f32),
        /// End point
        to: (f32, f32),
    },
}

/// A filled primitive in particle-local coordinates
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle (before rotation)
    Rect {
        /// Left edge
        x: f32,
        /// Top edge
        y: f32,
        /// Width
        w: f32,
        /// Height
        h: f32,
    },
    /// Circle centered on the origin
    Circle {
        /// Radius
        radius: f32,
    },
    /// Closed polygon
    Polygon(Vec<(f32, f32)>),
    /// Closed curved path
    Path(Vec<PathCommand>),
    /// A single text glyph anchored at the origin baseline
    Glyph {
        /// Character
        ch: char,
        /// Font size in px
        size: f32,
    },
}

/// Placement and fill of a primitive
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    /// Fill color
    pub color: Color,
    /// Global opacity in `[0, 1]`
    pub alpha: f32,
    /// Translation applied after rotation
    pub origin: (f32, f32),
    /// Rotation in radians
    pub rotation: f32,
}

impl Paint {
    /// Map a particle-local point to surface coordinates
    #[must_use]
    pub fn transform(&self, (x, y): (f32, f32)) -> (f32, f32) {
        let (sin, cos) = self.rotation.sin_cos();
        (
            self.origin.0 + x * cos - y * sin,
            self.origin.1 + x * sin + y * cos,
        )
    }

    /// Fill color with the paint's opacity folded into alpha
    #[must_use]
    pub fn effective_color(&self) -> Color {
        self.color.with_opacity(self.alpha)
    }
}

/// Anything the particle pass can draw onto
pub trait Surface {
    /// Erase the whole surface
    fn clear(&mut self);

    /// Fill a primitive
    fn fill(&mut self, shape: &Shape, paint: &Paint);
}

/// Flatten a path into a polygon, sampling each curve `steps` times
#[must_use]
pub fn flatten_path(commands: &[PathCommand], steps: usize) -> Vec<(f32, f32)> {
    let steps = steps.max(1);
    let mut points = Vec::new();
    let mut cursor = (0.0, 0.0);

    for command in commands {
        match *command {
            PathCommand::MoveTo(x, y) => {
                cursor = (x, y);
                points.push(cursor);
            }
            PathCommand::CubicTo { c1, c2, to } => {
                for i in 1..=steps {
                    #[allow(clippy::cast_precision_loss)]
                    let t = i as f32 / steps as f32;
                    points.push(cubic_point(cursor, c1, c2, to, t));
                }
                cursor = to;
            }
        }
    }
    points
}

fn cubic_point(
    p0: (f32, f32),
    p1: (f32, f32),
    p2: (f32, f32),
    p3: (f32, f32),
    t: f32,
) -> (f32, f32) {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    (
        a * p0.0 + b * p1.0 + c * p2.0 + d * p3.0,
        a * p0.1 + b * p1.1 + c * p2.1 + d * p3.1,
    )
}

/// Heart outline built from four cubic curves
fn heart(size: f32) -> Shape {
    let s = size / 2.0;
    Shape::Path(vec![
        PathCommand::MoveTo(0.0, s / 3.0),
        PathCommand::CubicTo {
            c1: (0.0, -s / 1.5),
            c2: (-s, -s / 1.5),
            to: (-s, s / 3.0),
        },
        PathCommand::CubicTo {
            c1: (-s, s),
            c2: (0.0, s * 1.5),
            to: (0.0, s * 2.0),
        },
        PathCommand::CubicTo {
            c1: (0.0, s * 1.5),
            c2: (s, s),
            to: (s, s / 3.0),
        },
        PathCommand::CubicTo {
            c1: (s, -s / 1.5),
            c2: (0.0, -s / 1.5),
            to: (0.0, s / 3.0),
        },
    ])
}

/// Five-point star alternating outer and inner vertices
fn star(size: f32) -> Shape {
    let points = (0..5u8)
        .flat_map(|i| {
            let outer = (18.0 + f32::from(i) * 72.0).to_radians();
            let inner = (54.0 + f32::from(i) * 72.0).to_radians();
            [
                (outer.cos() * size, -outer.sin() * size),
                (inner.cos() * size / 2.0, -inner.sin() * size / 2.0),
            ]
        })
        .collect();
    Shape::Polygon(points)
}

/// Shape for a particle, dispatched on its kind
#[must_use]
pub fn shape_for(particle: &Particle) -> Shape {
    let size = particle.size;
    match particle.kind {
        ParticleKind::Confetti => Shape::Rect {
            x: -size / 2.0,
            y: -size / 2.0,
            w: size,
            h: size * 0.6,
        },
        ParticleKind::RisingCircle => Shape::Circle { radius: size },
        ParticleKind::Rain => Shape::Rect {
            x: -1.0,
            y: -size,
            w: 2.0,
            h: size * 2.0,
        },
        ParticleKind::Glyph => Shape::Glyph {
            ch: particle.glyph.unwrap_or('Z'),
            size,
        },
        ParticleKind::Heart => heart(size),
        ParticleKind::Star => star(size),
    }
}

/// Draw one particle; dead particles are skipped
pub fn draw_particle<S: Surface + ?Sized>(particle: &Particle, surface: &mut S) {
    if !particle.is_alive() {
        return;
    }
    let paint = Paint {
        color: particle.color,
        alpha: particle.alpha.clamp(0.0, 1.0),
        origin: (particle.x, particle.y),
        rotation: particle.rotation,
    };
    surface.fill(&shape_for(particle), &paint);
}

/// Surface that records draw calls
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    /// Number of clears
    pub clears: usize,
    /// Fills since the last clear
    pub fills: Vec<(Shape, Paint)>,
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.clears += 1;
        self.fills.clear();
    }

    fn fill(&mut self, shape: &Shape, paint: &Paint) {
        self.fills.push((shape.clone(), *paint));
    }
}
