//! Pixel canvas and half-block rasterizer
//!
//! [`PixelCanvas`] is an RGBA framebuffer in the core's logical surface
//! coordinates (300 px square, scaled down to the canvas resolution). It
//! implements [`Surface`] so the particle engine can draw straight onto it,
//! and the character painter reuses the same fill path.
//!
//! [`HalfBlock`] turns a canvas into terminal cells, two vertical pixels per
//! cell using ▀▄█ characters. Glyph primitives cannot be rasterized at pixel
//! level, so they are kept aside and stamped into cells as text.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::Widget;

use sidekick_core::particles::{flatten_path, SURFACE_SIZE};
use sidekick_core::{Color, Paint, Shape, Surface};

use crate::theme::to_ratatui;

/// Curve samples per bezier segment when flattening paths
const CURVE_STEPS: usize = 8;

/// A text glyph waiting to be stamped into the cell grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGlyph {
    /// Logical x
    pub x: f32,
    /// Logical y
    pub y: f32,
    /// Character
    pub ch: char,
    /// Color with opacity applied
    pub color: Color,
}

/// RGBA framebuffer addressed in logical surface coordinates
#[derive(Clone, Debug)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    background: Color,
    glyphs: Vec<PlacedGlyph>,
}

impl PixelCanvas {
    /// Create a canvas of `width` x `height` pixels
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![background; (width * height) as usize],
            background,
            glyphs: Vec::new(),
        }
    }

    /// Pixel width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resize, discarding content
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels = vec![self.background; (width * height) as usize];
        self.glyphs.clear();
    }

    /// Pixel at `(x, y)`
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Glyphs drawn since the last clear
    pub fn glyphs(&self) -> &[PlacedGlyph] {
        &self.glyphs
    }

    /// Blend a color over one pixel
    fn blend_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) as usize;
            self.pixels[idx] = color.blend_over(self.pixels[idx]);
        }
    }

    /// Blend every non-background pixel and glyph of `other` on top
    pub fn overlay(&mut self, other: &PixelCanvas) {
        if (other.width, other.height) != (self.width, self.height) {
            return;
        }
        for (dst, src) in self.pixels.iter_mut().zip(&other.pixels) {
            if *src != other.background {
                *dst = src.blend_over(*dst);
            }
        }
        self.glyphs.extend_from_slice(&other.glyphs);
    }

    /// Logical-to-pixel scale on each axis
    fn scale(&self) -> (f32, f32) {
        (
            self.width as f32 / SURFACE_SIZE,
            self.height as f32 / SURFACE_SIZE,
        )
    }

    /// Fill every pixel whose center satisfies `inside` (logical coordinates)
    fn fill_region(
        &mut self,
        bounds: (f32, f32, f32, f32),
        color: Color,
        inside: impl Fn(f32, f32) -> bool,
    ) {
        let (sx, sy) = self.scale();
        let (min_x, min_y, max_x, max_y) = bounds;
        let px0 = (min_x * sx).floor().max(0.0) as u32;
        let py0 = (min_y * sy).floor().max(0.0) as u32;
        let px1 = ((max_x * sx).ceil().max(0.0) as u32).min(self.width);
        let py1 = ((max_y * sy).ceil().max(0.0) as u32).min(self.height);

        for py in py0..py1 {
            for px in px0..px1 {
                let lx = (px as f32 + 0.5) / sx;
                let ly = (py as f32 + 0.5) / sy;
                if inside(lx, ly) {
                    self.blend_pixel(px, py, color);
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let bounds = points.iter().fold(
            (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
            |(x0, y0, x1, y1), &(x, y)| (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        );
        self.fill_region(bounds, color, |x, y| point_in_polygon(points, x, y));
    }
}

impl Surface for PixelCanvas {
    fn clear(&mut self) {
        self.pixels.fill(self.background);
        self.glyphs.clear();
    }

    fn fill(&mut self, shape: &Shape, paint: &Paint) {
        let color = paint.effective_color();
        if color.a == 0 {
            return;
        }
        match shape {
            Shape::Rect { x, y, w, h } => {
                let corners = [(*x, *y), (x + w, *y), (x + w, y + h), (*x, y + h)]
                    .map(|p| paint.transform(p));
                self.fill_polygon(&corners, color);
            }
            Shape::Circle { radius } => {
                let (cx, cy) = paint.origin;
                let r = radius.abs();
                self.fill_region((cx - r, cy - r, cx + r, cy + r), color, |x, y| {
                    (x - cx).powi(2) + (y - cy).powi(2) <= r * r
                });
            }
            Shape::Polygon(points) => {
                let points: Vec<_> = points.iter().map(|p| paint.transform(*p)).collect();
                self.fill_polygon(&points, color);
            }
            Shape::Path(commands) => {
                let points: Vec<_> = flatten_path(commands, CURVE_STEPS)
                    .into_iter()
                    .map(|p| paint.transform(p))
                    .collect();
                self.fill_polygon(&points, color);
            }
            Shape::Glyph { ch, .. } => {
                let (x, y) = paint.origin;
                self.glyphs.push(PlacedGlyph {
                    x,
                    y,
                    ch: *ch,
                    color,
                });
            }
        }
    }
}

/// Even-odd point-in-polygon test
fn point_in_polygon(points: &[(f32, f32)], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// ============================================================================
// Half-block rasterizer
// ============================================================================

/// Renders a canvas as ▀▄█ cells, two vertical pixels per cell
///
/// The canvas should be `area.width` x `area.height * 2` pixels.
pub struct HalfBlock<'a> {
    canvas: &'a PixelCanvas,
}

impl<'a> HalfBlock<'a> {
    /// Wrap a canvas
    pub fn new(canvas: &'a PixelCanvas) -> Self {
        Self { canvas }
    }
}

/// Pick the cell character and colors for a top/bottom pixel pair
fn select_halfblock(top: Color, bottom: Color) -> (char, Color, Color) {
    if top == bottom {
        (' ', top, top)
    } else {
        ('▀', top, bottom)
    }
}

impl Widget for HalfBlock<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let canvas = self.canvas;
        if canvas.width == 0 || canvas.height == 0 {
            return;
        }
        let scale_x = f64::from(canvas.width) / f64::from(area.width.max(1));
        let scale_y = f64::from(canvas.height) / (f64::from(area.height.max(1)) * 2.0);

        for row in 0..area.height {
            for col in 0..area.width {
                let px = ((f64::from(col) * scale_x) as u32).min(canvas.width - 1);
                let top_y = ((f64::from(row) * 2.0 * scale_y) as u32).min(canvas.height - 1);
                let bot_y =
                    (((f64::from(row) * 2.0 + 1.0) * scale_y) as u32).min(canvas.height - 1);
                let top = canvas.get_pixel(px, top_y).unwrap_or(canvas.background);
                let bottom = canvas.get_pixel(px, bot_y).unwrap_or(canvas.background);

                let (ch, fg, bg) = select_halfblock(top, bottom);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char(ch).set_fg(to_ratatui(fg)).set_bg(to_ratatui(bg));
                }
            }
        }

        let cell_w = SURFACE_SIZE / f32::from(area.width.max(1));
        let cell_h = SURFACE_SIZE / f32::from(area.height.max(1));
        for glyph in &canvas.glyphs {
            if glyph.x < 0.0 || glyph.y < 0.0 {
                continue;
            }
            let col = (glyph.x / cell_w) as u16;
            let row = (glyph.y / cell_h) as u16;
            if col >= area.width || row >= area.height {
                continue;
            }
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_char(glyph.ch).set_fg(to_ratatui(glyph.color));
            }
        }
    }
}
