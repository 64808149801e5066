//! Terminal raster surface built from braille dots.
//!
//! Each terminal cell holds a 2×4 braille pattern, so a cell covers
//! `2 * dot_size` by `4 * dot_size` surface pixels. Shapes are sampled at dot
//! centers; text is laid out on whole cells and wins over dots in the same
//! cell.

use super::{Arc, Rect, Stroke, Surface, Transform};
use crate::config::Font;
use lipgloss_extras::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Braille dots per terminal cell, horizontally.
pub const DOTS_PER_CELL_X: usize = 2;
/// Braille dots per terminal cell, vertically.
pub const DOTS_PER_CELL_Y: usize = 4;

const BRAILLE_BASE: u32 = 0x2800;

// Bit of each dot inside a braille cell, indexed by [y][x].
const BRAILLE_BITS: [[u32; DOTS_PER_CELL_X]; DOTS_PER_CELL_Y] =
    [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextCell {
    Glyph { ch: char, color: usize, bold: bool },
    // Right half of a double-width glyph.
    Continuation,
}

/// Surface that renders to styled terminal text.
///
/// ```rust
/// use chrono_ring::surface::{Arc, CellSurface, Stroke, Surface};
///
/// let mut surface = CellSurface::new(80, 80, 4.0);
/// surface.stroke_arc(
///     &Arc::circle(40.0, 40.0, 30.0),
///     &Stroke { width: 6.0, color: "#FFFFFF".to_string() },
/// );
/// assert!(surface.painted_at(40.0, 10.0));
/// assert!(!surface.painted_at(40.0, 40.0));
/// assert_eq!(surface.plain_lines().len(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct CellSurface {
    width: f64,
    height: f64,
    dot_size: f64,
    cols: usize,
    rows: usize,
    dots: Vec<Option<usize>>,
    text: Vec<Option<TextCell>>,
    palette: Vec<String>,
    transform: Transform,
    stack: Vec<Transform>,
}

impl CellSurface {
    /// Creates a blank surface of `width × height` pixels sampled every
    /// `dot_size` pixels.
    pub fn new(width: u32, height: u32, dot_size: f64) -> Self {
        let dot_size = if dot_size.is_finite() && dot_size > 0.0 {
            dot_size
        } else {
            1.0
        };
        let cell_w = dot_size * DOTS_PER_CELL_X as f64;
        let cell_h = dot_size * DOTS_PER_CELL_Y as f64;
        let cols = (f64::from(width) / cell_w).ceil() as usize;
        let rows = (f64::from(height) / cell_h).ceil() as usize;

        Self {
            width: f64::from(width),
            height: f64::from(height),
            dot_size,
            cols,
            rows,
            dots: vec![None; cols * DOTS_PER_CELL_X * rows * DOTS_PER_CELL_Y],
            text: vec![None; cols * rows],
            palette: Vec::new(),
            transform: Transform::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Number of terminal columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of terminal rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    fn dots_wide(&self) -> usize {
        self.cols * DOTS_PER_CELL_X
    }

    fn dots_high(&self) -> usize {
        self.rows * DOTS_PER_CELL_Y
    }

    /// Whether the dot covering surface point `(x, y)` has been painted.
    pub fn painted_at(&self, x: f64, y: f64) -> bool {
        if x < 0.0 || y < 0.0 {
            return false;
        }
        let i = (x / self.dot_size) as usize;
        let j = (y / self.dot_size) as usize;
        if i >= self.dots_wide() || j >= self.dots_high() {
            return false;
        }
        self.dots[j * self.dots_wide() + i].is_some()
    }

    /// Color of the dot covering surface point `(x, y)`, if painted.
    pub fn color_at(&self, x: f64, y: f64) -> Option<&str> {
        if !self.painted_at(x, y) {
            return None;
        }
        let i = (x / self.dot_size) as usize;
        let j = (y / self.dot_size) as usize;
        self.dots[j * self.dots_wide() + i].map(|c| self.palette[c].as_str())
    }

    fn intern(&mut self, color: &str) -> usize {
        if let Some(idx) = self.palette.iter().position(|c| c == color) {
            return idx;
        }
        self.palette.push(color.to_string());
        self.palette.len() - 1
    }

    /// Paints every dot whose center, mapped back to user space, passes `hit`.
    fn paint_where(&mut self, color: &str, hit: impl Fn(f64, f64) -> bool) {
        let color = self.intern(color);
        let wide = self.dots_wide();
        for j in 0..self.dots_high() {
            for i in 0..wide {
                let px = (i as f64 + 0.5) * self.dot_size;
                let py = (j as f64 + 0.5) * self.dot_size;
                let Some((ux, uy)) = self.transform.invert(px, py) else {
                    return;
                };
                if hit(ux, uy) {
                    self.dots[j * wide + i] = Some(color);
                }
            }
        }
    }

    // Braille pattern and dominant color of one cell.
    fn cell_pattern(&self, col: usize, row: usize) -> Option<(char, usize)> {
        let wide = self.dots_wide();
        let mut bits = 0;
        let mut counts = vec![0usize; self.palette.len()];
        for (dy, row_bits) in BRAILLE_BITS.iter().enumerate() {
            for (dx, bit) in row_bits.iter().enumerate() {
                let i = col * DOTS_PER_CELL_X + dx;
                let j = row * DOTS_PER_CELL_Y + dy;
                if let Some(color) = self.dots[j * wide + i] {
                    bits |= bit;
                    counts[color] += 1;
                }
            }
        }
        if bits == 0 {
            return None;
        }
        let color = counts
            .iter()
            .enumerate()
            .max_by_key(|(idx, count)| (**count, *idx))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        char::from_u32(BRAILLE_BASE + bits).map(|ch| (ch, color))
    }

    // Character and style of one cell; `None` for the right half of a wide glyph.
    fn cell(&self, col: usize, row: usize) -> Option<(char, Option<(usize, bool)>)> {
        match self.text[row * self.cols + col] {
            Some(TextCell::Glyph { ch, color, bold }) => Some((ch, Some((color, bold)))),
            Some(TextCell::Continuation) => None,
            None => match self.cell_pattern(col, row) {
                Some((ch, color)) => Some((ch, Some((color, false)))),
                None => Some((' ', None)),
            },
        }
    }

    /// Rows of the surface without any styling.
    pub fn plain_lines(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .filter_map(|col| self.cell(col, row).map(|(ch, _)| ch))
                    .collect()
            })
            .collect()
    }

    /// Renders the surface as lipgloss-styled rows joined by newlines.
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let mut line = String::new();
            let mut run = String::new();
            let mut run_style = None;
            for col in 0..self.cols {
                let Some((ch, style)) = self.cell(col, row) else {
                    continue;
                };
                if style != run_style && !run.is_empty() {
                    line.push_str(&self.style_run(&run, run_style));
                    run.clear();
                }
                run_style = style;
                run.push(ch);
            }
            if !run.is_empty() {
                line.push_str(&self.style_run(&run, run_style));
            }
            lines.push(line);
        }
        lines.join("\n")
    }

    fn style_run(&self, run: &str, style: Option<(usize, bool)>) -> String {
        match style {
            Some((color, bold)) => Style::new()
                .foreground(lipgloss::Color::from(self.palette[color].as_str()))
                .bold(bold)
                .render(run),
            None => run.to_string(),
        }
    }
}

impl Surface for CellSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.dots.fill(None);
        self.text.fill(None);
        self.palette.clear();
    }

    fn stroke_arc(&mut self, arc: &Arc, stroke: &Stroke) {
        // Thinner than a dot would fall between samples.
        let half = (stroke.width / 2.0).max(self.dot_size / 2.0);
        let arc = *arc;
        self.paint_where(&stroke.color, move |x, y| {
            let (dx, dy) = (x - arc.cx, y - arc.cy);
            (dx.hypot(dy) - arc.radius).abs() <= half && arc.contains_angle(dy.atan2(dx))
        });
    }

    fn fill_rect(&mut self, rect: &Rect, color: &str) {
        let rect = *rect;
        self.paint_where(color, move |x, y| rect.contains(x, y));
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &Font, color: &str) {
        if self.rows == 0 || self.cols == 0 {
            return;
        }
        let color = self.intern(color);
        let (sx, sy) = self.transform.apply(x, y);
        let cell_w = self.dot_size * DOTS_PER_CELL_X as f64;
        let cell_h = self.dot_size * DOTS_PER_CELL_Y as f64;

        let row = ((sy / cell_h).floor().max(0.0) as usize).min(self.rows - 1);
        let width = UnicodeWidthStr::width(text) as f64;
        let mut col = (sx / cell_w - width / 2.0).round() as i64;

        for ch in text.chars() {
            let w = UnicodeWidthChar::width(ch).unwrap_or(0) as i64;
            if w == 0 {
                continue;
            }
            if col >= 0 && col + w <= self.cols as i64 {
                let idx = row * self.cols + col as usize;
                self.text[idx] = Some(TextCell::Glyph {
                    ch,
                    color,
                    bold: font.bold,
                });
                for extra in 1..w as usize {
                    self.text[idx + extra] = Some(TextCell::Continuation);
                }
            }
            col += w;
        }
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform = self.transform.rotate(radians);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn white(width: f64) -> Stroke {
        Stroke {
            width,
            color: "#FFFFFF".to_string(),
        }
    }

    #[test]
    fn test_grid_dimensions() {
        let surface = CellSurface::new(100, 100, 4.0);
        // 100px / 8px per cell, rounded up.
        assert_eq!(surface.cols(), 13);
        // 100px / 16px per cell, rounded up.
        assert_eq!(surface.rows(), 7);
        assert_eq!(surface.size(), (100.0, 100.0));
    }

    #[test]
    fn test_invalid_dot_size_falls_back() {
        let surface = CellSurface::new(10, 8, 0.0);
        assert_eq!(surface.cols(), 5);
        assert_eq!(surface.rows(), 2);
    }

    #[test]
    fn test_blank_surface_renders_spaces() {
        let surface = CellSurface::new(16, 16, 4.0);
        assert_eq!(surface.plain_lines(), vec!["  ".to_string()]);
        assert_eq!(surface.render(), "  ");
    }

    #[test]
    fn test_single_dot_braille_bits() {
        let mut surface = CellSurface::new(8, 16, 4.0);
        surface.fill_rect(
            &Rect {
                x: 0.0,
                y: 0.0,
                width: 4.0,
                height: 4.0,
            },
            "#FFFFFF",
        );
        assert_eq!(surface.plain_lines(), vec!["\u{2801}".to_string()]);

        surface.fill_rect(
            &Rect {
                x: 4.0,
                y: 12.0,
                width: 4.0,
                height: 4.0,
            },
            "#FFFFFF",
        );
        assert_eq!(surface.plain_lines(), vec!["\u{2881}".to_string()]);
    }

    #[test]
    fn test_partial_arc_only_covers_its_sweep() {
        let mut surface = CellSurface::new(100, 100, 2.0);
        let quarter = Arc {
            cx: 50.0,
            cy: 50.0,
            radius: 30.0,
            start: -FRAC_PI_2,
            end: 0.0,
        };
        surface.stroke_arc(&quarter, &white(6.0));

        // 1:30 on the clock face.
        let diag = 30.0 / 2f64.sqrt();
        assert!(surface.painted_at(50.0 + diag, 50.0 - diag));
        // 6 o'clock and 9 o'clock stay empty.
        assert!(!surface.painted_at(50.0, 80.0));
        assert!(!surface.painted_at(20.0, 50.0));
    }

    #[test]
    fn test_later_paint_wins() {
        let mut surface = CellSurface::new(100, 100, 2.0);
        surface.stroke_arc(&Arc::circle(50.0, 50.0, 30.0), &white(6.0));
        surface.stroke_arc(
            &Arc {
                cx: 50.0,
                cy: 50.0,
                radius: 30.0,
                start: -FRAC_PI_2,
                end: FRAC_PI_2,
            },
            &Stroke {
                width: 6.0,
                color: "#3E8A98".to_string(),
            },
        );
        assert_eq!(surface.color_at(81.0, 50.0), Some("#3E8A98"));
        assert_eq!(surface.color_at(19.0, 50.0), Some("#FFFFFF"));
    }

    #[test]
    fn test_rotated_rect_follows_transform() {
        let mut surface = CellSurface::new(100, 100, 2.0);
        surface.save();
        surface.translate(50.0, 50.0);
        surface.rotate(FRAC_PI_2);
        surface.fill_rect(
            &Rect {
                x: -2.0,
                y: -30.0,
                width: 4.0,
                height: 30.0,
            },
            "#CCCCCC",
        );
        surface.restore();

        // An upward bar turned a quarter clockwise points to 3 o'clock.
        assert!(surface.painted_at(70.0, 50.0));
        assert!(!surface.painted_at(50.0, 30.0));
    }

    #[test]
    fn test_restore_without_save_is_ignored() {
        let mut surface = CellSurface::new(40, 40, 2.0);
        surface.restore();
        surface.translate(10.0, 0.0);
        surface.fill_rect(
            &Rect {
                x: 0.0,
                y: 0.0,
                width: 2.0,
                height: 2.0,
            },
            "#FFFFFF",
        );
        assert!(surface.painted_at(11.0, 1.0));
        assert!(!surface.painted_at(1.0, 1.0));
    }

    #[test]
    fn test_text_centered_and_clamped() {
        let mut surface = CellSurface::new(80, 32, 2.0);
        // 20 columns, 4 rows; anchor far below the bottom edge.
        surface.fill_text("01:30", 40.0, 500.0, &Font::default(), "#FFFFFF");
        let lines = surface.plain_lines();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].trim(), "01:30");
        let start = lines[3].find('0').unwrap();
        assert_eq!(start, 8);
    }

    #[test]
    fn test_clear_erases_dots_and_text() {
        let mut surface = CellSurface::new(40, 16, 2.0);
        surface.stroke_arc(&Arc::circle(20.0, 8.0, 6.0), &white(2.0));
        surface.fill_text("x", 20.0, 8.0, &Font::default(), "#FFFFFF");
        surface.clear();
        assert!(surface.plain_lines().iter().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_render_styles_painted_cells() {
        let mut surface = CellSurface::new(16, 16, 4.0);
        surface.fill_text("ok", 8.0, 8.0, &Font::default(), "#FF0000");
        let rendered = surface.render();
        assert_eq!(strip_ansi_escapes::strip_str(&rendered), "ok");
    }
}
