//! Plugin configuration.
//!
//! Every field has a default, so a host only needs to spell out what it wants
//! to change:
//!
//! ```rust
//! use chrono_ring::config::ChronoConfig;
//!
//! let config = ChronoConfig::from_json(r##"{ "ring": { "progress_color": "#FF8800" }, "fps": 30 }"##).unwrap();
//! assert_eq!(config.ring.progress_color, "#FF8800");
//! assert_eq!(config.ring.track_width, 25.0);
//! assert_eq!(config.fps, 30);
//! ```

use crate::error::Result;
use crate::frame::DEFAULT_FPS;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Labels shown on the play/pause and reset controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Glyphs {
    /// Shown on the play/pause control while paused.
    pub play: String,
    /// Shown on the play/pause control while running.
    pub pause: String,
    /// Shown on the reset control.
    pub reset: String,
}

impl Default for Glyphs {
    fn default() -> Self {
        CLASSIC.clone()
    }
}

/// Media-control symbols.
pub static CLASSIC: Lazy<Glyphs> = Lazy::new(|| Glyphs {
    play: "▶".to_string(),
    pause: "⏸".to_string(),
    reset: "↺".to_string(),
});

/// Plain ASCII labels for terminals without symbol fonts.
pub static ASCII: Lazy<Glyphs> = Lazy::new(|| Glyphs {
    play: ">".to_string(),
    pause: "||".to_string(),
    reset: "R".to_string(),
});

/// Font used for the remaining-time text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Font {
    /// Font family name.
    pub family: String,
    /// Size in pixels.
    pub size: f64,
    /// Whether the text is drawn bold.
    pub bold: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "system-ui".to_string(),
            size: 48.0,
            bold: true,
        }
    }
}

/// Geometry and colors of the countdown ring.
///
/// Lengths are in surface pixels. Colors are anything lipgloss accepts, such
/// as hex codes or ANSI color numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingStyle {
    /// Ring radius as a fraction of the smaller surface dimension.
    pub radius_ratio: f64,
    /// Stroke width of the background ring and the progress arc.
    pub track_width: f64,
    /// Color of the background ring.
    pub track_color: String,
    /// Color of the progress arc.
    pub progress_color: String,
    /// Width of the needle.
    pub needle_thickness: f64,
    /// Needle length as a fraction of the ring radius.
    pub needle_length_ratio: f64,
    /// Color of the needle.
    pub needle_color: String,
    /// Color of the remaining-time text.
    pub text_color: String,
    /// Vertical distance from the bottom of the ring to the text center.
    pub text_offset: f64,
    /// Font of the remaining-time text.
    pub font: Font,
}

impl Default for RingStyle {
    fn default() -> Self {
        Self {
            radius_ratio: 0.32,
            track_width: 25.0,
            track_color: "#FFFFFF".to_string(),
            progress_color: "#3E8A98".to_string(),
            needle_thickness: 10.0,
            needle_length_ratio: 0.8,
            // White at 80% opacity over a dark slide.
            needle_color: "#CCCCCC".to_string(),
            text_color: "#FFFFFF".to_string(),
            text_offset: 75.0,
            font: Font::default(),
        }
    }
}

/// Top-level configuration of the countdown plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChronoConfig {
    /// Ring drawing parameters.
    pub ring: RingStyle,
    /// Control labels.
    pub glyphs: Glyphs,
    /// Frame rate of the animation loop.
    pub fps: u32,
    /// Surface pixels per braille dot when rendering to a terminal.
    pub dot_size: f64,
}

impl Default for ChronoConfig {
    fn default() -> Self {
        Self {
            ring: RingStyle::default(),
            glyphs: Glyphs::default(),
            fps: DEFAULT_FPS,
            dot_size: 4.0,
        }
    }
}

impl ChronoConfig {
    /// Parses a configuration object, filling in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replaces the control labels.
    pub fn with_glyphs(mut self, glyphs: Glyphs) -> Self {
        self.glyphs = glyphs;
        self
    }
}
