//! Frame scheduling for countdown widgets.
//!
//! Widgets animate through a chain of [`FrameMsg`] values: every frame handled
//! by [`crate::widget::Model::update`] schedules the next one with
//! `bubbletea_rs::tick`. Each message carries the widget's `id` and `tag`, so a
//! widget only consumes its own frames and a bumped tag ends a chain.
//!
//! Outside a bubbletea program the same widget can be driven by a
//! [`FrameLoop`] reading timestamps from a [`FrameSource`]. The loop stops when
//! the source is exhausted or its [`CancelHandle`] is cancelled, which keeps
//! tests deterministic.
//!
//! ```rust
//! use chrono_ring::frame::{FrameLoop, ScriptedFrames};
//! use chrono_ring::widget::Model;
//! use chrono_ring::markup::WidgetMarkup;
//! use chrono_ring::config::ChronoConfig;
//! use std::time::Instant;
//!
//! let start = Instant::now();
//! let markup = WidgetMarkup::standard("demo", 200, 200, "0", "3");
//! let mut widget = Model::from_markup(&markup, ChronoConfig::default()).unwrap();
//! widget.toggle_play_pause();
//!
//! let mut frames = ScriptedFrames::from_deltas(start, &[1000, 1000, 1000]);
//! let handled = FrameLoop::new().run(&mut widget, &mut frames);
//! assert_eq!(handled, 3);
//! ```

use crate::surface::Surface;
use crate::widget;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// Internal ID management for widget instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generates unique identifiers for widget instances.
pub(crate) fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Default display refresh rate used for frame scheduling.
pub const DEFAULT_FPS: u32 = 60;

/// Message delivered once per display refresh to a countdown widget.
///
/// Frame messages are produced by the widget's own scheduling command; you
/// normally only forward them to [`crate::widget::Model::update`].
#[derive(Debug, Clone)]
pub struct FrameMsg {
    /// Identifier of the widget the frame belongs to.
    pub id: i64,
    /// Generation of the frame chain; stale generations are ignored.
    pub(crate) tag: i64,
    /// Monotonic timestamp of the refresh.
    pub now: Instant,
}

impl FrameMsg {
    /// Builds a frame message for the given widget generation.
    pub fn new(id: i64, tag: i64, now: Instant) -> Self {
        Self { id, tag, now }
    }

    /// Generation of the frame chain this message belongs to.
    pub fn tag(&self) -> i64 {
        self.tag
    }
}

/// Interval between two frames at the given refresh rate.
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(fps.max(1)))
}

/// Schedules the next frame of a widget.
///
/// The timestamp is taken when the tick fires, not when it is scheduled.
pub(crate) fn schedule(id: i64, tag: i64, interval: Duration) -> Cmd {
    bubbletea_tick(interval, move |_| {
        Box::new(FrameMsg {
            id,
            tag,
            now: Instant::now(),
        }) as Msg
    })
}

/// Source of monotonic time for control actions such as reset and play/pause.
pub trait Clock: Send + Sync {
    /// Current monotonic timestamp.
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    /// Jumps the clock to an absolute timestamp.
    pub fn set(&self, to: Instant) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Producer of frame timestamps for a [`FrameLoop`].
pub trait FrameSource {
    /// Timestamp of the next display refresh, or `None` when the source ends.
    fn next_frame(&mut self) -> Option<Instant>;
}

impl<I> FrameSource for I
where
    I: Iterator<Item = Instant>,
{
    fn next_frame(&mut self) -> Option<Instant> {
        self.next()
    }
}

/// A fixed, pre-computed sequence of frame timestamps.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFrames {
    frames: VecDeque<Instant>,
}

impl ScriptedFrames {
    /// Frames at the given absolute timestamps.
    pub fn new(frames: impl IntoIterator<Item = Instant>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Frames spaced by the given millisecond deltas, starting after `start`.
    pub fn from_deltas(start: Instant, deltas_ms: &[u64]) -> Self {
        let mut now = start;
        let frames = deltas_ms.iter().map(|dt| {
            now += Duration::from_millis(*dt);
            now
        });
        Self::new(frames.collect::<Vec<_>>())
    }

    /// Number of frames not yet consumed.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl Iterator for ScriptedFrames {
    type Item = Instant;

    fn next(&mut self) -> Option<Instant> {
        self.frames.pop_front()
    }
}

/// Cancels a running [`FrameLoop`]. Clones control the same loop.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Requests the loop to stop before its next frame.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Drives a widget from a [`FrameSource`] until the source ends or the loop
/// is cancelled.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    cancel: CancelHandle,
}

impl FrameLoop {
    /// Creates a loop that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle that stops this loop.
    pub fn handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Feeds frames to the widget and returns how many were handled.
    pub fn run<S, F>(&self, widget: &mut widget::Model<S>, frames: &mut F) -> usize
    where
        S: Surface,
        F: FrameSource + ?Sized,
    {
        let mut handled = 0;
        while !self.cancel.is_cancelled() {
            let Some(now) = frames.next_frame() else {
                break;
            };
            widget.on_frame(now);
            handled += 1;
        }
        tracing::trace!(widget = widget.id(), handled, "frame loop finished");
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids() {
        let a = next_id();
        let b = next_id();
        assert!(a > 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_frame_interval() {
        assert_eq!(frame_interval(60), Duration::from_nanos(16_666_666));
        assert_eq!(frame_interval(1), Duration::from_secs(1));
        // A zero rate is treated as one frame per second.
        assert_eq!(frame_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn test_scripted_frames_from_deltas() {
        let start = Instant::now();
        let mut frames = ScriptedFrames::from_deltas(start, &[10, 20, 30]);
        assert_eq!(frames.remaining(), 3);
        assert_eq!(frames.next_frame(), Some(start + Duration::from_millis(10)));
        assert_eq!(frames.next_frame(), Some(start + Duration::from_millis(30)));
        assert_eq!(frames.next_frame(), Some(start + Duration::from_millis(60)));
        assert_eq!(frames.next_frame(), None);
    }

    #[test]
    fn test_iterators_are_frame_sources() {
        let start = Instant::now();
        let mut frames = (1..=2).map(|n| start + Duration::from_millis(n));
        assert!(frames.next_frame().is_some());
        assert!(frames.next_frame().is_some());
        assert!(frames.next_frame().is_none());
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let start = Instant::now();
        let clock = ManualClock::new(start);
        let other = clock.clone();
        clock.advance(Duration::from_millis(250));
        assert_eq!(other.now(), start + Duration::from_millis(250));

        other.set(start);
        assert_eq!(clock.now(), start);
    }

    #[test]
    fn test_cancel_handle() {
        let frame_loop = FrameLoop::new();
        let handle = frame_loop.handle();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(frame_loop.handle().is_cancelled());
    }
}
