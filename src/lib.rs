#![warn(missing_docs)]
#![doc(html_root_url = "https://docs.rs/chrono-ring/")]

//! # chrono-ring
//!
//! Countdown ring widgets for slide decks, built on
//! [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! Each widget shows the remaining time of a countdown as an animated circular
//! gauge: a track, a progress arc sweeping clockwise from 12 o'clock, a needle
//! pointing at the current position and the remaining time as `MM:SS`. The
//! duration is edited through minutes and seconds fields, and a play/pause and a
//! reset control drive the countdown.
//!
//! ## Overview
//!
//! - [`countdown`]: the countdown state machine and duration normalization
//! - [`render`]: draws a frame of the ring on any [`surface::Surface`]
//! - [`surface`]: terminal braille rasterizer and a recording surface for tests
//! - [`widget`]: the Elm-architecture widget tying state, fields and drawing together
//! - [`frame`]: frame messages, clocks and a cancellable frame loop
//! - [`deck`]: activation of widgets from slide deck lifecycle events
//! - [`config`]: serde-backed styling and glyph configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono_ring::prelude::*;
//! use std::time::{Duration, Instant};
//!
//! let markup = WidgetMarkup::standard("talk", 200, 200, "0", "10");
//! let mut countdown = Countdown::from_markup(&markup, ChronoConfig::default()).unwrap();
//!
//! countdown.toggle_play_pause();
//! let start = countdown.state().last_tick();
//! let frame = countdown.on_frame(start + Duration::from_secs(5));
//! assert!((frame.progress - 0.5).abs() < 1e-9);
//! assert_eq!(format_remaining(frame.remaining), "00:05");
//! ```
//!
//! ## Logging
//!
//! The crate logs through [`tracing`] and installs no subscriber: widget
//! activation, control actions and completion at `debug`, every frame at
//! `trace`, and rejected markup at `warn`.

pub mod config;
pub mod countdown;
pub mod deck;
pub mod error;
pub mod field;
pub mod frame;
pub mod key;
pub mod markup;
pub mod render;
pub mod surface;
pub mod widget;

use bubbletea_rs::Cmd;

/// Focus management for interactive parts of a widget.
///
/// `focus()` may return a command to run when focus is gained; `blur()`
/// releases focus; `focused()` reports the current state.
///
/// ```rust
/// use chrono_ring::prelude::*;
///
/// let mut field = DurationField::new("min", "5");
/// assert!(!field.focused());
/// let _ = field.focus();
/// assert!(field.focused());
/// field.blur();
/// assert!(!field.focused());
/// ```
pub trait Component {
    /// Gives the component keyboard focus.
    fn focus(&mut self) -> Option<Cmd>;

    /// Removes keyboard focus.
    fn blur(&mut self);

    /// Whether the component has keyboard focus.
    fn focused(&self) -> bool;
}

pub use config::{ChronoConfig, Font, Glyphs, RingStyle};
pub use countdown::{format_remaining, normalize_duration, CountdownState, Frame, NormalizedDuration};
pub use deck::{ChronoPlugin, DeckEvent, Slide};
pub use error::{ChronoError, Result};
pub use field::{DurationField, FieldEvent};
pub use frame::{CancelHandle, Clock, FrameLoop, FrameMsg, FrameSource, ManualClock, ScriptedFrames, SystemClock};
pub use key::{Binding, KeyMap};
pub use markup::{WidgetId, WidgetMarkup};
pub use render::draw_ring;
pub use surface::{CellSurface, RecordingSurface, Surface};
pub use widget::Model as Countdown;

/// Commonly used types in one import.
///
/// ```rust
/// use chrono_ring::prelude::*;
///
/// let mut plugin = ChronoPlugin::new(ChronoConfig::default());
/// let slide = Slide::new(0, vec![WidgetMarkup::standard("intro", 400, 400, "1", "30")]);
/// let cmds = plugin.handle_event(DeckEvent::Ready(slide));
/// assert_eq!(cmds.len(), 1);
/// ```
pub mod prelude {
    pub use crate::config::{ChronoConfig, Glyphs, RingStyle, ASCII, CLASSIC};
    pub use crate::countdown::{format_remaining, CountdownState, Frame};
    pub use crate::deck::{ChronoPlugin, DeckEvent, Slide};
    pub use crate::error::ChronoError;
    pub use crate::field::DurationField;
    pub use crate::frame::{Clock, FrameLoop, FrameMsg, ManualClock, ScriptedFrames};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::markup::{Element, WidgetId, WidgetMarkup};
    pub use crate::surface::{CellSurface, RecordingSurface, Surface};
    pub use crate::widget::Model as Countdown;
    pub use crate::Component;
}
