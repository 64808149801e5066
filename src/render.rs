//! Countdown ring drawing.
//!
//! A frame is drawn in four passes over a cleared [`Surface`]: the background
//! ring, the progress arc on top of it, the needle, and the remaining time
//! below the ring.

use crate::config::RingStyle;
use crate::countdown::format_remaining;
use crate::surface::{Arc, Rect, Stroke, Surface};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::time::Duration;

/// Where the ring sits on a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// Center x.
    pub cx: f64,
    /// Center y.
    pub cy: f64,
    /// Ring radius.
    pub radius: f64,
}

impl RingGeometry {
    /// Centers the ring on a `width × height` surface.
    pub fn new(width: f64, height: f64, style: &RingStyle) -> Self {
        Self {
            cx: width * 0.5,
            cy: height * 0.5,
            radius: width.min(height) * style.radius_ratio,
        }
    }
}

/// Clockwise angle from 12 o'clock for a progress fraction.
pub fn sweep_angle(progress: f64) -> f64 {
    TAU * progress.clamp(0.0, 1.0)
}

/// Draws one frame of the countdown ring.
///
/// `progress` is clamped to `[0, 1]`. Returns the geometry that was used.
pub fn draw_ring<S: Surface + ?Sized>(
    surface: &mut S,
    progress: f64,
    remaining: Duration,
    style: &RingStyle,
) -> RingGeometry {
    let (width, height) = surface.size();
    let geometry = RingGeometry::new(width, height, style);
    let sweep = sweep_angle(progress);

    surface.clear();
    draw_track(surface, &geometry, sweep, style);
    draw_needle(surface, &geometry, sweep, style);
    draw_remaining(surface, &geometry, remaining, style);

    geometry
}

fn draw_track<S: Surface + ?Sized>(
    surface: &mut S,
    g: &RingGeometry,
    sweep: f64,
    style: &RingStyle,
) {
    surface.stroke_arc(
        &Arc::circle(g.cx, g.cy, g.radius),
        &Stroke {
            width: style.track_width,
            color: style.track_color.clone(),
        },
    );

    let start = -FRAC_PI_2;
    surface.stroke_arc(
        &Arc {
            cx: g.cx,
            cy: g.cy,
            radius: g.radius,
            start,
            end: start + sweep,
        },
        &Stroke {
            width: style.track_width,
            color: style.progress_color.clone(),
        },
    );
}

fn draw_needle<S: Surface + ?Sized>(
    surface: &mut S,
    g: &RingGeometry,
    sweep: f64,
    style: &RingStyle,
) {
    let thickness = style.needle_thickness;
    let length = g.radius * style.needle_length_ratio;

    surface.save();
    surface.translate(g.cx, g.cy);
    surface.rotate(sweep);
    // Base at the center, tip toward 12 o'clock before rotation.
    surface.fill_rect(
        &Rect {
            x: -thickness / 2.0,
            y: -length,
            width: thickness,
            height: length,
        },
        &style.needle_color,
    );
    surface.restore();
}

fn draw_remaining<S: Surface + ?Sized>(
    surface: &mut S,
    g: &RingGeometry,
    remaining: Duration,
    style: &RingStyle,
) {
    surface.fill_text(
        &format_remaining(remaining),
        g.cx,
        g.cy + g.radius + style.text_offset,
        &style.font,
        &style.text_color,
    );
}
