//! Slide deck integration.
//!
//! The host deck announces slides through [`DeckEvent`]s. On every event the
//! [`ChronoPlugin`] activates the countdown widgets of that slide which were not
//! activated before, and returns the commands that start their frame chains.
//!
//! ```rust
//! use chrono_ring::config::ChronoConfig;
//! use chrono_ring::deck::{ChronoPlugin, DeckEvent, Slide};
//! use chrono_ring::markup::WidgetMarkup;
//!
//! let mut plugin = ChronoPlugin::new(ChronoConfig::default());
//! let slide = Slide::new(0, vec![WidgetMarkup::standard("talk", 400, 400, "5", "0")]);
//!
//! let cmds = plugin.handle_event(DeckEvent::Ready(slide.clone()));
//! assert_eq!(cmds.len(), 1);
//!
//! // Coming back to the slide does not activate the widget again.
//! let cmds = plugin.handle_event(DeckEvent::SlideChanged(slide));
//! assert!(cmds.is_empty());
//! ```

use crate::config::ChronoConfig;
use crate::error::Result;
use crate::frame::{Clock, FrameMsg, SystemClock};
use crate::markup::{WidgetId, WidgetMarkup};
use crate::surface::{CellSurface, Surface};
use crate::widget::Model;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// A slide and the countdown widgets it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Position of the slide in the deck.
    pub index: usize,
    /// Widget containers in document order.
    pub widgets: Vec<WidgetMarkup>,
}

impl Slide {
    /// A slide with its widgets.
    pub fn new(index: usize, widgets: Vec<WidgetMarkup>) -> Self {
        Self { index, widgets }
    }
}

/// Lifecycle notifications from the host deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    /// The deck finished loading and shows this slide.
    Ready(Slide),
    /// The deck navigated to this slide.
    SlideChanged(Slide),
}

impl DeckEvent {
    /// The slide the event refers to.
    pub fn slide(&self) -> &Slide {
        match self {
            DeckEvent::Ready(slide) | DeckEvent::SlideChanged(slide) => slide,
        }
    }
}

type SurfaceFactory<S> = Box<dyn Fn(u32, u32, &ChronoConfig) -> S + Send + Sync>;

/// Activates and drives the countdown widgets of a deck.
pub struct ChronoPlugin<S: Surface = CellSurface> {
    config: ChronoConfig,
    widgets: BTreeMap<WidgetId, Model<S>>,
    initialized: HashSet<WidgetId>,
    current: Vec<WidgetId>,
    current_index: Option<usize>,
    make_surface: SurfaceFactory<S>,
    clock: Arc<dyn Clock>,
}

impl<S: Surface> fmt::Debug for ChronoPlugin<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChronoPlugin")
            .field("widgets", &self.widgets.keys().collect::<Vec<_>>())
            .field("initialized", &self.initialized)
            .field("current", &self.current)
            .field("current_index", &self.current_index)
            .finish_non_exhaustive()
    }
}

impl ChronoPlugin<CellSurface> {
    /// A plugin rendering its widgets to the terminal.
    pub fn new(config: ChronoConfig) -> Self {
        Self::with_surface_factory(config, |width, height, config| {
            CellSurface::new(width, height, config.dot_size)
        })
    }

    /// Renders the widgets of the current slide, separated by blank lines.
    pub fn view(&self) -> String {
        self.current
            .iter()
            .filter_map(|id| self.widgets.get(id))
            .map(|widget| widget.view())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl<S: Surface> ChronoPlugin<S> {
    /// A plugin whose widgets draw on surfaces built by `factory` from the
    /// canvas pixel size.
    pub fn with_surface_factory<F>(config: ChronoConfig, factory: F) -> Self
    where
        F: Fn(u32, u32, &ChronoConfig) -> S + Send + Sync + 'static,
    {
        Self {
            config,
            widgets: BTreeMap::new(),
            initialized: HashSet::new(),
            current: Vec::new(),
            current_index: None,
            make_surface: Box::new(factory),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the clock handed to widgets activated from now on.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Activates the new widgets of the event's slide.
    ///
    /// Returns the first-frame commands of the widgets activated by this call.
    /// Widgets with broken markup are logged and skipped, and are not retried
    /// on later events.
    pub fn handle_event(&mut self, event: DeckEvent) -> Vec<Cmd> {
        let slide = event.slide();
        tracing::debug!(
            slide = slide.index,
            widgets = slide.widgets.len(),
            "deck slide shown"
        );
        self.current_index = Some(slide.index);
        self.current = slide.widgets.iter().map(|m| m.id.clone()).collect();

        let mut cmds = Vec::new();
        for markup in &slide.widgets {
            if !self.initialized.insert(markup.id.clone()) {
                continue;
            }
            match self.build(markup) {
                Ok(mut widget) => {
                    cmds.push(widget.activate());
                    self.widgets.insert(markup.id.clone(), widget);
                }
                Err(err) => {
                    tracing::warn!(widget = %markup.id, error = %err, "countdown widget not activated");
                }
            }
        }
        cmds
    }

    fn build(&self, markup: &WidgetMarkup) -> Result<Model<S>> {
        let controls = markup.resolve()?;
        let surface = (self.make_surface)(controls.canvas_width, controls.canvas_height, &self.config);
        Ok(
            Model::with_surface(markup.id.clone(), &controls, surface, self.config.clone())
                .with_clock(Arc::clone(&self.clock)),
        )
    }

    /// Routes a message to the widget it concerns.
    ///
    /// Frames go to the widget that scheduled them, wherever it sits in the
    /// deck. Keys go to the focused widget, the first one on the current slide.
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if let Some(frame) = msg.downcast_ref::<FrameMsg>() {
            let id = frame.id;
            let widget = self.widgets.values_mut().find(|w| w.id() == id)?;
            return widget.update(msg);
        }

        if msg.downcast_ref::<KeyMsg>().is_some() {
            return self.focused_widget_mut()?.update(msg);
        }

        None
    }

    /// Whether the container id went through activation, successful or not.
    pub fn is_initialized(&self, id: &WidgetId) -> bool {
        self.initialized.contains(id)
    }

    /// An activated widget.
    pub fn widget(&self, id: &WidgetId) -> Option<&Model<S>> {
        self.widgets.get(id)
    }

    /// Mutable access to an activated widget.
    pub fn widget_mut(&mut self, id: &WidgetId) -> Option<&mut Model<S>> {
        self.widgets.get_mut(id)
    }

    /// All activated widgets, by container id.
    pub fn widgets(&self) -> impl Iterator<Item = (&WidgetId, &Model<S>)> {
        self.widgets.iter()
    }

    /// Index of the slide shown last.
    pub fn current_slide(&self) -> Option<usize> {
        self.current_index
    }

    /// The widget receiving key presses.
    pub fn focused_widget(&self) -> Option<&Model<S>> {
        self.current.iter().find_map(|id| self.widgets.get(id))
    }

    fn focused_widget_mut(&mut self) -> Option<&mut Model<S>> {
        let id = self
            .current
            .iter()
            .find(|id| self.widgets.contains_key(*id))?
            .clone();
        self.widgets.get_mut(&id)
    }

    /// Configuration handed to new widgets.
    pub fn config(&self) -> &ChronoConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::ManualClock;
    use crate::markup::{Element, RESET_CLASS};
    use crate::surface::RecordingSurface;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::time::{Duration, Instant};

    // Tag of the first frame chain of a freshly activated widget.
    const FIRST_CHAIN: i64 = 1;

    fn recording_plugin(clock: &ManualClock) -> ChronoPlugin<RecordingSurface> {
        ChronoPlugin::with_surface_factory(ChronoConfig::default(), |w, h, _| {
            RecordingSurface::new(f64::from(w), f64::from(h))
        })
        .with_clock(Arc::new(clock.clone()))
    }

    fn space() -> Msg {
        Box::new(KeyMsg {
            key: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
        })
    }

    fn two_slides() -> (Slide, Slide) {
        (
            Slide::new(
                0,
                vec![
                    WidgetMarkup::standard("a", 400, 400, "2", "0"),
                    WidgetMarkup::standard("b", 400, 400, "0", "30"),
                ],
            ),
            Slide::new(1, vec![WidgetMarkup::standard("c", 300, 300, "3", "0")]),
        )
    }

    #[test]
    fn test_activation_is_idempotent() {
        let clock = ManualClock::new(Instant::now());
        let mut plugin = recording_plugin(&clock);
        let (first, second) = two_slides();

        assert_eq!(plugin.handle_event(DeckEvent::Ready(first.clone())).len(), 2);
        let a_id = plugin.widget(&"a".into()).unwrap().id();

        assert!(plugin.handle_event(DeckEvent::SlideChanged(first.clone())).is_empty());
        assert_eq!(plugin.handle_event(DeckEvent::SlideChanged(second)).len(), 1);
        assert!(plugin.handle_event(DeckEvent::SlideChanged(first)).is_empty());

        assert_eq!(plugin.widgets().count(), 3);
        assert_eq!(plugin.widget(&"a".into()).unwrap().id(), a_id);
        assert!(plugin.widgets().all(|(_, w)| w.active()));
    }

    #[test]
    fn test_broken_markup_is_reported_once() {
        let clock = ManualClock::new(Instant::now());
        let mut plugin = recording_plugin(&clock);

        let mut broken = WidgetMarkup::standard("broken", 400, 400, "1", "0");
        broken.elements.retain(|e| e.class != RESET_CLASS);
        let slide = Slide::new(
            0,
            vec![broken, WidgetMarkup::standard("ok", 400, 400, "1", "0")],
        );

        assert_eq!(plugin.handle_event(DeckEvent::Ready(slide.clone())).len(), 1);
        assert!(plugin.is_initialized(&"broken".into()));
        assert!(plugin.widget(&"broken".into()).is_none());
        assert!(plugin.widget(&"ok".into()).is_some());

        assert!(plugin.handle_event(DeckEvent::SlideChanged(slide)).is_empty());
    }

    #[test]
    fn test_zero_sized_canvas_is_skipped() {
        let clock = ManualClock::new(Instant::now());
        let mut plugin = recording_plugin(&clock);
        let slide = Slide::new(
            0,
            vec![WidgetMarkup::new(
                "flat",
                vec![
                    Element::canvas(400, 0),
                    Element::with_value(crate::markup::PLAY_CLASS, ""),
                    Element::with_value(RESET_CLASS, ""),
                    Element::with_value(crate::markup::MINUTES_CLASS, "1"),
                    Element::with_value(crate::markup::SECONDS_CLASS, "0"),
                ],
            )],
        );
        assert!(plugin.handle_event(DeckEvent::Ready(slide)).is_empty());
        assert!(plugin.focused_widget().is_none());
    }

    #[test]
    fn test_keys_go_to_first_widget_of_current_slide() {
        let clock = ManualClock::new(Instant::now());
        let mut plugin = recording_plugin(&clock);
        let (first, second) = two_slides();

        plugin.handle_event(DeckEvent::Ready(first));
        plugin.update(space());
        assert!(plugin.widget(&"a".into()).unwrap().running());
        assert!(!plugin.widget(&"b".into()).unwrap().running());

        plugin.handle_event(DeckEvent::SlideChanged(second));
        assert_eq!(plugin.current_slide(), Some(1));
        plugin.update(space());
        assert!(plugin.widget(&"c".into()).unwrap().running());
        assert!(plugin.widget(&"a".into()).unwrap().running());
    }

    #[test]
    fn test_frames_reach_widgets_on_other_slides() {
        let start = Instant::now();
        let clock = ManualClock::new(start);
        let mut plugin = recording_plugin(&clock);
        let (first, second) = two_slides();

        plugin.handle_event(DeckEvent::Ready(first));
        plugin.update(space());
        plugin.handle_event(DeckEvent::SlideChanged(second));

        let a = plugin.widget(&"a".into()).unwrap().id();
        let frame = FrameMsg::new(a, FIRST_CHAIN, start + Duration::from_secs(3));
        assert!(plugin.update(Box::new(frame)).is_some());
        assert_eq!(
            plugin.widget(&"a".into()).unwrap().state().elapsed_ms(),
            3_000
        );
        assert_eq!(
            plugin.widget(&"b".into()).unwrap().state().elapsed_ms(),
            0
        );
    }

    #[test]
    fn test_unknown_frames_are_ignored() {
        let clock = ManualClock::new(Instant::now());
        let mut plugin = recording_plugin(&clock);
        plugin.handle_event(DeckEvent::Ready(two_slides().0));
        let frame = FrameMsg::new(-1, FIRST_CHAIN, Instant::now());
        assert!(plugin.update(Box::new(frame)).is_none());
        assert!(plugin.update(Box::new("unrelated")).is_none());
    }

    #[test]
    fn test_view_shows_current_slide_only() {
        let mut plugin = ChronoPlugin::new(ChronoConfig::default());
        let (first, second) = two_slides();

        plugin.handle_event(DeckEvent::Ready(first));
        let view = strip_ansi_escapes::strip_str(&plugin.view());
        assert!(view.contains("02:00"));
        assert!(view.contains("00:30"));

        plugin.handle_event(DeckEvent::SlideChanged(second));
        let view = strip_ansi_escapes::strip_str(&plugin.view());
        assert!(view.contains("03:00"));
        assert!(!view.contains("02:00"));
    }

    #[test]
    fn test_event_slide_accessor() {
        let slide = Slide::new(4, vec![]);
        assert_eq!(DeckEvent::Ready(slide.clone()).slide().index, 4);
        assert_eq!(DeckEvent::SlideChanged(slide).slide().index, 4);
    }

    #[tokio::test]
    async fn test_first_frame_command_delivers_frame() {
        let mut plugin = ChronoPlugin::new(ChronoConfig::default());
        let mut cmds = plugin.handle_event(DeckEvent::Ready(two_slides().1));
        let cmd = cmds.pop().unwrap();

        let msg = tokio::time::timeout(Duration::from_secs(2), cmd)
            .await
            .unwrap()
            .unwrap();
        let frame = msg.downcast_ref::<FrameMsg>().unwrap();
        assert_eq!(frame.id, plugin.widget(&"c".into()).unwrap().id());

        assert!(plugin.update(msg).is_some());
        assert!(plugin.widget(&"c".into()).unwrap().last_frame().is_some());
    }
}
