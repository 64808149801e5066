//! Countdown ring widget.
//!
//! The widget owns a [`CountdownState`], the play/pause label, two
//! [`DurationField`]s and a drawing [`Surface`]. It reacts to three kinds of
//! input:
//!
//! - [`FrameMsg`] once per display refresh, advancing time and redrawing;
//! - key presses for play/pause, reset and field editing;
//! - committed field edits, which reset the countdown and apply the new
//!   duration.
//!
//! # bubbletea-rs Integration
//!
//! ```rust
//! use bubbletea_rs::{Cmd, Model as BubbleTeaModel, Msg};
//! use chrono_ring::config::ChronoConfig;
//! use chrono_ring::markup::WidgetMarkup;
//! use chrono_ring::widget::Model as Countdown;
//!
//! struct Slide {
//!     countdown: Countdown,
//! }
//!
//! impl BubbleTeaModel for Slide {
//!     fn init() -> (Self, Option<Cmd>) {
//!         let markup = WidgetMarkup::standard("talk", 400, 400, "5", "0");
//!         let mut countdown = Countdown::from_markup(&markup, ChronoConfig::default())
//!             .expect("valid markup");
//!         let cmd = countdown.activate();
//!         (Self { countdown }, Some(cmd))
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Option<Cmd> {
//!         self.countdown.update(msg)
//!     }
//!
//!     fn view(&self) -> String {
//!         self.countdown.view()
//!     }
//! }
//! ```

use crate::config::ChronoConfig;
use crate::countdown::{format_remaining, CountdownState, Frame, NormalizedDuration};
use crate::error::Result;
use crate::field::{DurationField, FieldEvent};
use crate::frame::{self, Clock, FrameMsg, SystemClock};
use crate::key::{self, Binding, KeyMap};
use crate::markup::{Controls, WidgetId, WidgetMarkup};
use crate::render::draw_ring;
use crate::surface::{CellSurface, Surface};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use crossterm::event::KeyCode;
use lipgloss_extras::prelude::*;
use std::fmt;
use std::sync::Arc;


/// Key bindings of the countdown widget.
#[derive(Debug, Clone)]
pub struct WidgetKeyMap {
    /// Starts or pauses the countdown.
    pub play_pause: Binding,
    /// Rewinds and stops the countdown.
    pub reset: Binding,
    /// Moves focus to the next duration field.
    pub next_field: Binding,
    /// Moves focus to the previous duration field.
    pub prev_field: Binding,
    /// Leaves the duration fields.
    pub leave_field: Binding,
}

impl Default for WidgetKeyMap {
    fn default() -> Self {
        Self {
            play_pause: Binding::new(vec![KeyCode::Char(' '), KeyCode::Char('p')])
                .with_help("space", "play/pause"),
            reset: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "reset"),
            next_field: Binding::new(vec![KeyCode::Tab]).with_help("tab", "edit time"),
            prev_field: Binding::new(vec![KeyCode::BackTab]).with_help("shift+tab", "previous field"),
            leave_field: Binding::new(vec![KeyCode::Esc]).with_help("esc", "done"),
        }
    }
}

impl KeyMap for WidgetKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.play_pause, &self.reset, &self.next_field]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![
            vec![&self.play_pause, &self.reset],
            vec![&self.next_field, &self.prev_field, &self.leave_field],
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Minutes,
    Seconds,
}

/// A countdown ring widget.
pub struct Model<S: Surface = CellSurface> {
    id: i64,
    tag: i64,
    key: WidgetId,
    state: CountdownState,
    minutes: DurationField,
    seconds: DurationField,
    focus: Option<Focus>,
    play_label: String,
    config: ChronoConfig,
    surface: S,
    clock: Arc<dyn Clock>,
    active: bool,
    last_frame: Option<Frame>,
    /// Key bindings; replace to customize.
    pub keymap: WidgetKeyMap,
    /// Style of the play/pause and reset buttons.
    pub button_style: Style,
}

impl<S: Surface + fmt::Debug> fmt::Debug for Model<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("tag", &self.tag)
            .field("key", &self.key)
            .field("state", &self.state)
            .field("play_label", &self.play_label)
            .field("active", &self.active)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}

impl Model<CellSurface> {
    /// Builds a widget rendering to the terminal from its markup.
    pub fn from_markup(markup: &WidgetMarkup, config: ChronoConfig) -> Result<Self> {
        let controls = markup.resolve()?;
        let surface = CellSurface::new(controls.canvas_width, controls.canvas_height, config.dot_size);
        Ok(Self::with_surface(markup.id.clone(), &controls, surface, config))
    }

    /// Renders the ring, the controls and the key help.
    pub fn view(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.surface.render(),
            self.controls_view(),
            self.help_view()
        )
    }
}

impl<S: Surface> Model<S> {
    /// Builds a widget drawing on the given surface.
    ///
    /// The initial field values go through the same normalization as later
    /// edits, and are written back canonicalized.
    pub fn with_surface(key: WidgetId, controls: &Controls, surface: S, config: ChronoConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let state = CountdownState::new(&controls.minutes, &controls.seconds, clock.now());
        let mut model = Self {
            id: frame::next_id(),
            tag: 0,
            key,
            state,
            minutes: DurationField::new("min", controls.minutes.clone()),
            seconds: DurationField::new("sec", controls.seconds.clone()),
            focus: None,
            play_label: config.glyphs.play.clone(),
            config,
            surface,
            clock,
            active: false,
            last_frame: None,
            keymap: WidgetKeyMap::default(),
            button_style: Style::new().bold(true),
        };
        let (minutes, seconds) = (controls.minutes.clone(), controls.seconds.clone());
        model.set_duration(&minutes, &seconds);
        model
    }

    /// Replaces the clock used for control actions.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self.state.reset_tick(self.clock.now());
        self
    }

    /// Unique identifier used to route frame messages.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Identifier of the widget's markup container.
    pub fn key(&self) -> &WidgetId {
        &self.key
    }

    /// Countdown state.
    pub fn state(&self) -> &CountdownState {
        &self.state
    }

    /// Whether time is advancing.
    pub fn running(&self) -> bool {
        self.state.running()
    }

    /// Current label of the play/pause control.
    pub fn play_label(&self) -> &str {
        &self.play_label
    }

    /// Raw text of the minutes field.
    pub fn minutes_value(&self) -> &str {
        self.minutes.value()
    }

    /// Raw text of the seconds field.
    pub fn seconds_value(&self) -> &str {
        self.seconds.value()
    }

    /// The drawing surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the drawing surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Result of the most recent frame, if any was drawn.
    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    /// Whether the frame chain is running.
    pub fn active(&self) -> bool {
        self.active
    }

    /// Configuration the widget was built with.
    pub fn config(&self) -> &ChronoConfig {
        &self.config
    }

    fn sync_label(&mut self) {
        self.play_label = if self.state.running() {
            self.config.glyphs.pause.clone()
        } else {
            self.config.glyphs.play.clone()
        };
    }

    /// Applies raw minute and second values and writes them back normalized.
    ///
    /// Does not reset; field edits go through [`Model::on_field_changed`],
    /// which does.
    pub fn set_duration(&mut self, minutes_raw: &str, seconds_raw: &str) -> NormalizedDuration {
        let normalized = self.state.set_duration(minutes_raw, seconds_raw);
        self.minutes.set_value(normalized.minutes.to_string());
        self.seconds.set_value(normalized.seconds.to_string());
        self.sync_label();
        tracing::debug!(
            widget = %self.key,
            minutes = normalized.minutes,
            seconds = normalized.seconds,
            "countdown duration set"
        );
        normalized
    }

    /// Rewinds to the full duration and stops.
    pub fn reset(&mut self) {
        self.state.reset(self.clock.now());
        self.play_label = self.config.glyphs.play.clone();
        tracing::debug!(widget = %self.key, "countdown reset");
    }

    /// Starts or pauses the countdown, returning the new running state.
    pub fn toggle_play_pause(&mut self) -> bool {
        let running = self.state.toggle(self.clock.now());
        self.sync_label();
        tracing::debug!(widget = %self.key, running, "countdown toggled");
        running
    }

    /// Handles a committed edit of either duration field.
    pub fn on_field_changed(&mut self) {
        self.reset();
        let minutes = self.minutes.value().to_string();
        let seconds = self.seconds.value().to_string();
        self.set_duration(&minutes, &seconds);
    }

    /// Types a value into the minutes field and commits it.
    pub fn set_minutes_input(&mut self, raw: &str) {
        self.minutes.set_value(raw);
        self.on_field_changed();
    }

    /// Types a value into the seconds field and commits it.
    pub fn set_seconds_input(&mut self, raw: &str) {
        self.seconds.set_value(raw);
        self.on_field_changed();
    }

    /// Advances time to `now` and redraws.
    pub fn on_frame(&mut self, now: std::time::Instant) -> Frame {
        let frame = self.state.advance(now);
        if frame.completed {
            self.play_label = self.config.glyphs.play.clone();
            tracing::debug!(widget = %self.key, "countdown completed");
        }
        draw_ring(&mut self.surface, frame.progress, frame.remaining, &self.config.ring);
        tracing::trace!(
            widget = %self.key,
            progress = frame.progress,
            remaining_ms = frame.remaining.as_millis() as u64,
            "frame"
        );
        self.last_frame = Some(frame);
        frame
    }

    /// Starts a new frame chain and returns the command for its first frame.
    ///
    /// Frames from any earlier chain are ignored from now on.
    pub fn activate(&mut self) -> Cmd {
        self.active = true;
        self.tag += 1;
        self.state.reset_tick(self.clock.now());
        tracing::debug!(widget = %self.key, id = self.id, "countdown activated");
        self.next_frame()
    }

    /// Ends the frame chain; pending frames are dropped when they arrive.
    pub fn cancel(&mut self) {
        self.active = false;
        self.tag += 1;
        tracing::debug!(widget = %self.key, "countdown frame chain cancelled");
    }

    fn next_frame(&self) -> Cmd {
        frame::schedule(self.id, self.tag, frame::frame_interval(self.config.fps))
    }

    /// Processes a message, returning the next frame command when a frame was
    /// handled, or the command of a key press.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(frame_msg) = msg.downcast_ref::<FrameMsg>() {
            if !self.active || frame_msg.id != self.id || frame_msg.tag != self.tag {
                return None;
            }
            self.on_frame(frame_msg.now);
            return Some(self.next_frame());
        }

        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            return self.handle_key(key_msg);
        }

        None
    }

    fn focused_field(&mut self) -> Option<&mut DurationField> {
        match self.focus? {
            Focus::Minutes => Some(&mut self.minutes),
            Focus::Seconds => Some(&mut self.seconds),
        }
    }

    // Leaves the focused field, committing any pending edit.
    fn leave_focus(&mut self) {
        let changed = match self.focused_field() {
            Some(field) => {
                let event = field.commit();
                field.blur();
                event == Some(FieldEvent::Changed)
            }
            None => false,
        };
        self.focus = None;
        if changed {
            self.on_field_changed();
        }
    }

    fn move_focus(&mut self, to: Focus) -> Option<Cmd> {
        self.leave_focus();
        self.focus = Some(to);
        match to {
            Focus::Minutes => self.minutes.focus(),
            Focus::Seconds => self.seconds.focus(),
        }
    }

    /// Handles one key press, returning the command of a field gaining focus.
    pub fn handle_key(&mut self, msg: &KeyMsg) -> Option<Cmd> {
        if let Some(field) = self.focused_field() {
            match field.update(msg) {
                Some(FieldEvent::Changed) => {
                    self.on_field_changed();
                    return None;
                }
                Some(FieldEvent::Edited) => return None,
                None => {}
            }
        }

        if self.keymap.next_field.matches(msg) {
            let next = match self.focus {
                Some(Focus::Minutes) => Focus::Seconds,
                _ => Focus::Minutes,
            };
            return self.move_focus(next);
        }
        if self.keymap.prev_field.matches(msg) {
            let prev = match self.focus {
                Some(Focus::Seconds) => Focus::Minutes,
                _ => Focus::Seconds,
            };
            return self.move_focus(prev);
        }

        if self.keymap.leave_field.matches(msg) {
            self.leave_focus();
        } else if self.keymap.play_pause.matches(msg) {
            self.toggle_play_pause();
        } else if self.keymap.reset.matches(msg) {
            self.reset();
        }
        None
    }

    /// Whether one of the duration fields has focus.
    pub fn editing(&self) -> bool {
        self.focus.is_some()
    }

    /// Renders the buttons, the duration fields and the remaining time.
    pub fn controls_view(&self) -> String {
        let play = self.button_style.render(&format!("[{}]", self.play_label));
        let reset = self
            .button_style
            .render(&format!("[{}]", self.config.glyphs.reset));
        format!(
            "{} {}  {}  {}  {}",
            play,
            reset,
            self.minutes.view(),
            self.seconds.view(),
            format_remaining(self.state.remaining())
        )
    }

    /// Renders the short key help.
    pub fn help_view(&self) -> String {
        key::short_help_line(&self.keymap.short_help())
    }
}

impl BubbleTeaModel for Model<CellSurface> {
    fn init() -> (Self, Option<Cmd>) {
        let controls = Controls {
            canvas_width: 400,
            canvas_height: 400,
            minutes: "1".to_string(),
            seconds: "0".to_string(),
        };
        let config = ChronoConfig::default();
        let surface = CellSurface::new(controls.canvas_width, controls.canvas_height, config.dot_size);
        let mut model = Self::with_surface(WidgetId::new("chrono"), &controls, surface, config);
        let cmd = model.activate();
        (model, Some(cmd))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
