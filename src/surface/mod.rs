//! Drawing surfaces.
//!
//! The ring renderer talks to a [`Surface`], a small 2D drawing context in the
//! style of an HTML canvas: arcs are stroked, rectangles and text are filled,
//! and a transform stack supports `save`/`translate`/`rotate`/`restore`.
//!
//! Angles follow canvas conventions. Zero radians points to 3 o'clock and
//! positive angles turn clockwise, because the y axis grows downward.
//!
//! Two implementations ship with the crate:
//!
//! - [`CellSurface`] rasterizes onto braille dots for terminal output.
//! - [`RecordingSurface`] logs every call as a [`DrawCall`].

mod cell;
mod recording;

pub use cell::{CellSurface, DOTS_PER_CELL_X, DOTS_PER_CELL_Y};
pub use recording::{DrawCall, RecordingSurface};

use crate::config::Font;

/// A circular arc, swept clockwise from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Radius of the arc's center line.
    pub radius: f64,
    /// Start angle in radians.
    pub start: f64,
    /// End angle in radians.
    pub end: f64,
}

impl Arc {
    /// A full circle.
    pub fn circle(cx: f64, cy: f64, radius: f64) -> Self {
        Self {
            cx,
            cy,
            radius,
            start: 0.0,
            end: std::f64::consts::TAU,
        }
    }

    /// Clockwise angular extent, in `[0, 2π]`.
    pub fn sweep(&self) -> f64 {
        let sweep = self.end - self.start;
        if sweep >= std::f64::consts::TAU {
            std::f64::consts::TAU
        } else {
            sweep.rem_euclid(std::f64::consts::TAU)
        }
    }

    /// Whether the direction `angle` falls inside the arc.
    pub fn contains_angle(&self, angle: f64) -> bool {
        let sweep = self.sweep();
        if sweep <= 0.0 {
            return false;
        }
        (angle - self.start).rem_euclid(std::f64::consts::TAU) <= sweep
    }
}

/// How an arc is stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Line width.
    pub width: f64,
    /// Line color.
    pub color: String,
}

/// An axis-aligned rectangle in the current coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Whether the point lies inside the rectangle.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// 2D affine transform `[a c e; b d f]`, mapping user space to surface space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The transform that leaves points where they are.
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Appends a translation.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            e: self.a * dx + self.c * dy + self.e,
            f: self.b * dx + self.d * dy + self.f,
            ..self
        }
    }

    /// Appends a clockwise rotation.
    pub fn rotate(self, radians: f64) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: self.a * cos + self.c * sin,
            b: self.b * cos + self.d * sin,
            c: self.c * cos - self.a * sin,
            d: self.d * cos - self.b * sin,
            ..self
        }
    }

    /// Maps a user-space point to surface space.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Maps a surface-space point back to user space.
    ///
    /// Returns `None` for degenerate transforms.
    pub fn invert(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f64::EPSILON {
            return None;
        }
        let (dx, dy) = (x - self.e, y - self.f);
        Some((
            (self.d * dx - self.c * dy) / det,
            (self.a * dy - self.b * dx) / det,
        ))
    }

    /// Clockwise rotation encoded in the transform.
    pub fn rotation(&self) -> f64 {
        self.b.atan2(self.a)
    }
}

/// A 2D drawing context.
///
/// Implementations keep their own transform stack; `save` pushes the current
/// transform and `restore` pops it. Unbalanced `restore` calls are ignored.
pub trait Surface {
    /// Width and height in pixels.
    fn size(&self) -> (f64, f64);

    /// Erases everything drawn so far.
    fn clear(&mut self);

    /// Strokes an arc.
    fn stroke_arc(&mut self, arc: &Arc, stroke: &Stroke);

    /// Fills a rectangle with a color.
    fn fill_rect(&mut self, rect: &Rect, color: &str);

    /// Draws text centered horizontally and vertically on `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: &str);

    /// Pushes the current transform.
    fn save(&mut self);

    /// Pops the most recently saved transform.
    fn restore(&mut self);

    /// Moves the origin.
    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotates the coordinate space clockwise.
    fn rotate(&mut self, radians: f64);
}
