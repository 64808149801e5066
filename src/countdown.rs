//! Countdown state machine.
//!
//! [`CountdownState`] tracks how much of a configured duration has been consumed
//! and whether time is currently advancing. It knows nothing about drawing or
//! input controls: the widget feeds it timestamps and reads back progress.
//!
//! # Basic Usage
//!
//! ```rust
//! use chrono_ring::countdown::{format_remaining, CountdownState};
//! use std::time::{Duration, Instant};
//!
//! let start = Instant::now();
//! let mut state = CountdownState::new("0", "5", start);
//! assert_eq!(state.duration_ms(), 5000);
//!
//! state.toggle(start);
//! let frame = state.advance(start + Duration::from_millis(1200));
//! assert_eq!(state.elapsed_ms(), 1200);
//! assert_eq!(format_remaining(frame.remaining), "00:04");
//! ```

use std::time::{Duration, Instant};

/// Shortest countdown a widget may be configured with.
pub const MIN_DURATION: Duration = Duration::from_secs(1);

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60_000;

/// Minutes and seconds after normalization of raw field values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDuration {
    /// Whole minutes, unbounded above.
    pub minutes: u64,
    /// Whole seconds in `0..=59`.
    pub seconds: u64,
}

impl NormalizedDuration {
    /// Total length of the countdown.
    pub fn as_duration(&self) -> Duration {
        let ms = self
            .minutes
            .saturating_mul(MS_PER_MINUTE)
            .saturating_add(self.seconds * MS_PER_SECOND);
        Duration::from_millis(ms)
    }
}

/// Parses a raw field value the way a form field is read as a number.
///
/// Empty, non-numeric and non-finite values read as zero; the result is floored.
fn parse_field(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v.floor(),
        _ => 0.0,
    }
}

/// Normalizes raw minute and second field values.
///
/// Minutes become a non-negative integer, seconds are clamped to `0..=59`, and
/// the pair `(0, 0)` becomes `(0, 1)` so a countdown never has zero length.
///
/// ```rust
/// use chrono_ring::countdown::normalize_duration;
///
/// let n = normalize_duration("2.9", "75");
/// assert_eq!((n.minutes, n.seconds), (2, 59));
///
/// let n = normalize_duration("", "abc");
/// assert_eq!((n.minutes, n.seconds), (0, 1));
/// ```
pub fn normalize_duration(minutes_raw: &str, seconds_raw: &str) -> NormalizedDuration {
    // Float-to-int casts saturate, so huge minute values pin to u64::MAX.
    let minutes = parse_field(minutes_raw).max(0.0) as u64;
    let mut seconds = parse_field(seconds_raw).clamp(0.0, 59.0) as u64;

    if minutes == 0 && seconds == 0 {
        seconds = 1;
    }

    NormalizedDuration { minutes, seconds }
}

/// Formats a remaining time as `MM:SS`, rounding partial seconds up.
///
/// Rounding up means the display only reaches `00:00` once the countdown has
/// actually completed.
///
/// ```rust
/// use chrono_ring::countdown::format_remaining;
/// use std::time::Duration;
///
/// assert_eq!(format_remaining(Duration::ZERO), "00:00");
/// assert_eq!(format_remaining(Duration::from_millis(100)), "00:01");
/// assert_eq!(format_remaining(Duration::from_millis(59_999)), "01:00");
/// ```
pub fn format_remaining(remaining: Duration) -> String {
    let ms = remaining.as_millis();
    let seconds = ms.div_ceil(MS_PER_SECOND as u128);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// What a single frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Fraction of the duration consumed, in `[0, 1]`.
    pub progress: f64,
    /// Time left before completion.
    pub remaining: Duration,
    /// Whether the countdown reached its end during this frame.
    pub completed: bool,
}

/// Time tracking for one countdown widget.
///
/// The state upholds three invariants after every mutation:
/// `elapsed <= duration`, `duration >= 1s`, and `running` is false once
/// `elapsed == duration`.
#[derive(Debug, Clone)]
pub struct CountdownState {
    duration: Duration,
    elapsed: Duration,
    running: bool,
    last_tick: Instant,
}

impl CountdownState {
    /// Creates a stopped countdown from raw minute and second field values.
    pub fn new(minutes_raw: &str, seconds_raw: &str, now: Instant) -> Self {
        let mut state = Self {
            duration: MIN_DURATION,
            elapsed: Duration::ZERO,
            running: false,
            last_tick: now,
        };
        state.set_duration(minutes_raw, seconds_raw);
        state
    }

    /// Applies new raw field values and returns their normalized form.
    ///
    /// Elapsed time is clamped into the new duration. The running flag is left
    /// alone unless the clamp lands exactly on completion.
    pub fn set_duration(&mut self, minutes_raw: &str, seconds_raw: &str) -> NormalizedDuration {
        let normalized = normalize_duration(minutes_raw, seconds_raw);
        self.duration = normalized.as_duration();
        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.running = false;
        }
        normalized
    }

    /// Rewinds to the start and stops.
    pub fn reset(&mut self, now: Instant) {
        self.elapsed = Duration::ZERO;
        self.running = false;
        self.last_tick = now;
    }

    /// Moves the tick reference to `now` without touching elapsed time.
    pub fn reset_tick(&mut self, now: Instant) {
        self.last_tick = now;
    }

    /// Flips between running and paused, returning the new running state.
    ///
    /// The tick reference moves to `now` so time spent paused is not counted
    /// on the next frame. A finished countdown stays stopped until it is reset
    /// or given a longer duration.
    pub fn toggle(&mut self, now: Instant) -> bool {
        self.last_tick = now;
        if self.finished() {
            return false;
        }
        self.running = !self.running;
        self.running
    }

    /// Advances the countdown to `now`.
    ///
    /// Timestamps older than the previous tick count as a zero delta.
    pub fn advance(&mut self, now: Instant) -> Frame {
        let dt = now.saturating_duration_since(self.last_tick);
        self.last_tick = now;

        let mut completed = false;
        if self.running {
            self.elapsed = self.elapsed.saturating_add(dt);
            if self.elapsed >= self.duration {
                self.elapsed = self.duration;
                self.running = false;
                completed = true;
            }
        }

        Frame {
            progress: self.progress(),
            remaining: self.remaining(),
            completed,
        }
    }

    /// Fraction of the duration consumed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Time left before completion.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    /// Whether elapsed time currently advances on each frame.
    pub fn running(&self) -> bool {
        self.running
    }

    /// Whether the whole duration has been consumed.
    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Configured length of the countdown.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time consumed since the last reset.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Configured length in whole milliseconds.
    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    /// Consumed time in whole milliseconds.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Remaining time in whole milliseconds.
    pub fn remaining_ms(&self) -> u64 {
        self.remaining().as_millis() as u64
    }

    /// Timestamp of the previous frame or control action.
    pub fn last_tick(&self) -> Instant {
        self.last_tick
    }
}
