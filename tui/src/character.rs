//! Character painter
//!
//! Paints one [`FrameSnapshot`] as filled primitives in the core's logical
//! 300 px surface space. Face parts are laid out in body-local coordinates
//! and carried by the body transform, so they tilt and bounce with it.

use std::f32::consts::TAU;

use sidekick_core::appearance::palette;
use sidekick_core::particles::SURFACE_SIZE;
use sidekick_core::{Color, EyeFrame, FrameSnapshot, Mouth, Paint, Shape, Surface};

/// Body size at scale 1
pub const BODY_SIZE: (f32, f32) = (140.0, 125.0);

/// Eye size at scale 1, fully open
pub const EYE_SIZE: (f32, f32) = (28.0, 40.0);

/// Body center at rest
const BODY_CENTER: (f32, f32) = (SURFACE_SIZE / 2.0, SURFACE_SIZE / 2.0 + 10.0);

/// Horizontal distance of each eye from the body's center line
const EYE_SPREAD: f32 = 28.0;

/// Segments used for ellipses
const ELLIPSE_SEGMENTS: usize = 24;

/// Closed ellipse centered on the origin
fn ellipse(w: f32, h: f32) -> Shape {
    let points = (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
            (angle.cos() * w / 2.0, angle.sin() * h / 2.0)
        })
        .collect();
    Shape::Polygon(points)
}

/// Lower half-ring used for the smile
fn smile(w: f32, thickness: f32) -> Shape {
    let steps = ELLIPSE_SEGMENTS / 2;
    let outer = w / 2.0;
    let inner = (outer - thickness).max(0.0);
    let arc = |radius: f32, i: usize| {
        let angle = std::f32::consts::PI * i as f32 / steps as f32;
        (angle.cos() * radius, angle.sin() * radius * 0.6)
    };
    let mut points: Vec<_> = (0..=steps).map(|i| arc(outer, i)).collect();
    points.extend((0..=steps).rev().map(|i| arc(inner, i)));
    Shape::Polygon(points)
}

/// Paint placing body-local shapes
struct BodyFrame {
    center: (f32, f32),
    rotation: f32,
    scale: f32,
    opacity: f32,
}

impl BodyFrame {
    fn paint(&self, local: (f32, f32), color: Color, alpha: f32) -> Paint {
        let anchor = Paint {
            color,
            alpha,
            origin: self.center,
            rotation: self.rotation,
        };
        Paint {
            origin: anchor.transform(local),
            alpha: alpha * self.opacity,
            ..anchor
        }
    }
}

/// Paint the character for one frame
pub fn paint_character<S: Surface + ?Sized>(surface: &mut S, frame: &FrameSnapshot) {
    let scale = frame.appearance.effective_scale() * frame.audio_scale;
    paint_shadow(surface, frame, scale);

    let body = frame.body;
    let (w, h) = (
        BODY_SIZE.0 * scale * body.effective_scale_x(),
        BODY_SIZE.1 * scale * body.effective_scale_y(),
    );
    let frame_of_body = BodyFrame {
        center: (BODY_CENTER.0 + body.x, BODY_CENTER.1 + body.y),
        rotation: body.rotate_z.to_radians(),
        scale,
        opacity: body.opacity,
    };

    paint_antenna(surface, frame, &frame_of_body, h);

    surface.fill(
        &ellipse(w, h),
        &frame_of_body.paint((0.0, 0.0), frame.appearance.color, 1.0),
    );

    // gloss
    surface.fill(
        &ellipse(w * 0.8, h * 0.3),
        &frame_of_body.paint(
            (frame.face.gloss_offset_x * scale, -h * 0.3),
            palette::EYE_SHINE,
            0.35,
        ),
    );

    // cheeks
    for side in [-1.0, 1.0] {
        surface.fill(
            &ellipse(28.0 * scale, 20.0 * scale),
            &frame_of_body.paint(
                (side * w * 0.33, h * 0.1),
                palette::CHEEK_ROSE,
                frame.face.cheek_opacity,
            ),
        );
    }

    paint_eye(surface, frame, &frame_of_body, &frame.left_eye, -1.0);
    paint_eye(surface, frame, &frame_of_body, &frame.right_eye, 1.0);
    paint_mouth(surface, frame, &frame_of_body, h);
}

fn paint_shadow<S: Surface + ?Sized>(surface: &mut S, frame: &FrameSnapshot, scale: f32) {
    let shadow = frame.shadow;
    surface.fill(
        &ellipse(
            128.0 * scale * shadow.effective_scale_x(),
            24.0 * scale * shadow.effective_scale_y(),
        ),
        &Paint {
            color: palette::SHADOW,
            alpha: shadow.opacity,
            origin: (
                BODY_CENTER.0 + shadow.x,
                BODY_CENTER.1 + BODY_SIZE.1 * scale / 2.0 + 18.0 + shadow.y,
            ),
            rotation: 0.0,
        },
    );
}

fn paint_antenna<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &FrameSnapshot,
    body: &BodyFrame,
    body_h: f32,
) {
    let antenna = frame.face.antenna;
    let base = body.paint((0.0, -body_h / 2.0 + 4.0), palette::ANTENNA_GREY, 1.0);
    let stalk = Paint {
        rotation: body.rotation + antenna.sway_deg.to_radians(),
        ..base
    };
    let length = 24.0 * body.scale;
    surface.fill(
        &Shape::Rect {
            x: -3.0 * body.scale,
            y: -length,
            w: 6.0 * body.scale,
            h: length,
        },
        &stalk,
    );

    let bulb_center = stalk.transform((0.0, -length - 2.0 * body.scale));
    let radius = 8.0 * body.scale * antenna.bulb_scale;
    if antenna.glowing {
        surface.fill(
            &Shape::Circle {
                radius: radius * 1.8,
            },
            &Paint {
                color: antenna.bulb_color,
                alpha: 0.3 * body.opacity,
                origin: bulb_center,
                rotation: 0.0,
            },
        );
    }
    surface.fill(
        &Shape::Circle { radius },
        &Paint {
            color: antenna.bulb_color,
            alpha: body.opacity,
            origin: bulb_center,
            rotation: 0.0,
        },
    );
}

fn paint_eye<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &FrameSnapshot,
    body: &BodyFrame,
    eye: &EyeFrame,
    side: f32,
) {
    let s = body.scale;
    let pose = eye.pose;
    let w = EYE_SIZE.0 * s * pose.effective_scale_x();
    let h = EYE_SIZE.1 * s * pose.effective_scale_y() * eye.openness;
    let center = (side * EYE_SPREAD * s + pose.x, -5.0 * s + pose.y);

    let eye_paint = body.paint(center, frame.eye_tint, pose.opacity);
    let eye_paint = Paint {
        rotation: eye_paint.rotation + pose.rotate_z.to_radians(),
        ..eye_paint
    };
    surface.fill(&ellipse(w, h), &eye_paint);

    if frame.face.eye_highlights {
        for (offset, radius, alpha) in [
            ((w * 0.2, -h * 0.25), 4.0 * s, 0.9),
            ((-w * 0.2, h * 0.2), 2.5 * s, 0.4),
        ] {
            surface.fill(
                &Shape::Circle { radius },
                &Paint {
                    color: palette::EYE_SHINE,
                    alpha: alpha * body.opacity * pose.opacity,
                    origin: eye_paint.transform(offset),
                    rotation: 0.0,
                },
            );
        }
    }
}

fn paint_mouth<S: Surface + ?Sized>(
    surface: &mut S,
    frame: &FrameSnapshot,
    body: &BodyFrame,
    body_h: f32,
) {
    let s = body.scale;
    let at = (0.0, body_h * 0.28);
    let (shape, color, alpha) = match frame.face.mouth {
        Mouth::Hidden => return,
        Mouth::Ring => (ellipse(12.0 * s, 12.0 * s), palette::MOUTH_DARK, 0.5),
        Mouth::Oval => (ellipse(20.0 * s, 24.0 * s), palette::MOUTH_DARK, 1.0),
        Mouth::Smile => (smile(32.0 * s, 4.0 * s), palette::MOUTH_DARK, 1.0),
        Mouth::Tongue => (
            Shape::Rect {
                x: -12.0 * s,
                y: 0.0,
                w: 24.0 * s,
                h: 16.0 * s,
            },
            palette::TONGUE,
            1.0,
        ),
        Mouth::Flat => (
            Shape::Rect {
                x: -6.0 * s,
                y: -2.0 * s,
                w: 12.0 * s,
                h: 4.0 * s,
            },
            palette::MOUTH_DARK,
            1.0,
        ),
        Mouth::Bubble => (
            ellipse(
                12.0 * s * frame.face.mouth_scale,
                12.0 * s * frame.face.mouth_scale,
            ),
            palette::BUBBLE,
            0.5,
        ),
    };
    surface.fill(&shape, &body.paint(at, color, alpha));
}
