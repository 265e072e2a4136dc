//! Countdown engine
//!
//! Turns an absolute end time into a `MM:SS` readout and a progress
//! percentage. A spawned ticker recomputes the display from `end - now` on
//! every tick (so missed ticks self-correct) and reports over a channel. The
//! engine never decides what reaching zero means; it only says it happened.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default work phase length (25 minutes)
pub const DEFAULT_WORK_SECS: u64 = 25 * 60;

/// Default break length (5 minutes)
pub const DEFAULT_BREAK_SECS: u64 = 5 * 60;

/// Default tick cadence
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Longest phase accepted from config or the server (one day)
pub const MAX_PHASE_MINUTES: u64 = 24 * 60;

/// Whole minutes to seconds, capped at [`MAX_PHASE_MINUTES`]
pub fn minutes_to_secs(minutes: u64) -> u64 {
    minutes.min(MAX_PHASE_MINUTES) * 60
}

/// `now + secs`, or `None` when the end time is not representable
pub fn end_time_after(now: DateTime<Utc>, secs: u64) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(secs).ok()?;
    now.checked_add_signed(chrono::Duration::try_seconds(secs)?)
}

/// Derived view of a countdown: remaining time and percent elapsed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerDisplay {
    pub minutes: u64,
    pub seconds: u64,
    /// Percent of the phase already elapsed, always within 0..=100
    pub progress: f64,
}

impl TimerDisplay {
    /// A countdown that has not started yet
    pub fn full(total_secs: u64) -> Self {
        Self {
            minutes: total_secs / 60,
            seconds: total_secs % 60,
            progress: 0.0,
        }
    }

    pub fn remaining_secs(&self) -> u64 {
        self.minutes * 60 + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.remaining_secs() == 0
    }

    /// Format remaining time as MM:SS
    pub fn format(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl Default for TimerDisplay {
    fn default() -> Self {
        Self::full(DEFAULT_WORK_SECS)
    }
}

/// Compute the display for `end` as seen at `now`
///
/// Remaining time is rounded up to whole seconds and floored at zero. A
/// zero phase length falls back to the default work length.
pub fn compute_display(end: DateTime<Utc>, now: DateTime<Utc>, total_secs: u64) -> TimerDisplay {
    let total_secs = if total_secs == 0 {
        DEFAULT_WORK_SECS
    } else {
        total_secs
    };

    let remaining_ms = (end - now).num_milliseconds().max(0) as u64;
    let remaining_secs = remaining_ms.div_ceil(1000);

    let elapsed = total_secs.saturating_sub(remaining_secs) as f64;
    let progress = clamp_progress(elapsed / total_secs as f64 * 100.0);

    TimerDisplay {
        minutes: remaining_secs / 60,
        seconds: remaining_secs % 60,
        progress,
    }
}

/// Clamp a percentage into 0..=100, mapping NaN to 0
pub fn clamp_progress(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Which countdown an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownSource {
    /// Server-backed session phase
    Session,
    /// Local break after a custom session
    UiBreak,
}

/// Events sent from a running ticker to the event loop
#[derive(Debug, Clone, PartialEq)]
pub enum TimerEvent {
    Tick {
        source: CountdownSource,
        generation: u64,
        display: TimerDisplay,
    },
    /// Remaining time reached zero; the ticker has stopped itself
    Expired {
        source: CountdownSource,
        generation: u64,
    },
}

impl TimerEvent {
    pub fn source(&self) -> CountdownSource {
        match self {
            TimerEvent::Tick { source, .. } | TimerEvent::Expired { source, .. } => *source,
        }
    }

    pub fn generation(&self) -> u64 {
        match self {
            TimerEvent::Tick { generation, .. } | TimerEvent::Expired { generation, .. } => {
                *generation
            }
        }
    }
}

/// Sender half of the timer event channel
pub type TimerEventSender = mpsc::UnboundedSender<TimerEvent>;

/// Receiver half of the timer event channel
pub type TimerEventReceiver = mpsc::UnboundedReceiver<TimerEvent>;

/// Create the channel countdowns report on
pub fn create_channel() -> (TimerEventSender, TimerEventReceiver) {
    mpsc::unbounded_channel()
}

/// A single countdown with at most one live ticker task
///
/// Every `start`/`stop` bumps the generation; events carrying an older
/// generation come from an aborted ticker and are rejected by [`accept`].
///
/// [`accept`]: CountdownEngine::accept
#[derive(Debug)]
pub struct CountdownEngine {
    source: CountdownSource,
    tx: TimerEventSender,
    tick_interval: Duration,
    handle: Option<JoinHandle<()>>,
    generation: u64,
    end_time: Option<DateTime<Utc>>,
    total_secs: u64,
    display: TimerDisplay,
}

impl CountdownEngine {
    pub fn new(source: CountdownSource, tx: TimerEventSender, tick_interval: Duration) -> Self {
        let tick_interval = if tick_interval.is_zero() {
            DEFAULT_TICK_INTERVAL
        } else {
            tick_interval
        };
        Self {
            source,
            tx,
            tick_interval,
            handle: None,
            generation: 0,
            end_time: None,
            total_secs: DEFAULT_WORK_SECS,
            display: TimerDisplay::default(),
        }
    }

    /// Start counting down to `end_time`
    ///
    /// Any previous ticker is aborted first. An end time already in the past
    /// reports zero and expires on the first tick. Must be called from within
    /// a tokio runtime.
    pub fn start(&mut self, end_time: DateTime<Utc>, total_secs: u64) {
        self.stop();

        self.end_time = Some(end_time);
        self.total_secs = total_secs;
        self.display = compute_display(end_time, Utc::now(), total_secs);

        let tx = self.tx.clone();
        let source = self.source;
        let generation = self.generation;
        let tick_interval = self.tick_interval;

        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                interval.tick().await;
                let display = compute_display(end_time, Utc::now(), total_secs);
                let tick = TimerEvent::Tick {
                    source,
                    generation,
                    display,
                };
                if tx.send(tick).is_err() {
                    break;
                }
                if display.is_zero() {
                    let _ = tx.send(TimerEvent::Expired { source, generation });
                    break;
                }
            }
        }));

        tracing::debug!(source = ?self.source, generation, %end_time, "Countdown started");
    }

    /// Abort the ticker; pending events from it become stale
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.generation += 1;
    }

    /// Apply an event from the channel
    ///
    /// Returns false for events meant for another countdown or from a stale
    /// ticker; those must be ignored.
    pub fn accept(&mut self, event: &TimerEvent) -> bool {
        if event.source() != self.source || event.generation() != self.generation {
            return false;
        }
        match event {
            TimerEvent::Tick { display, .. } => {
                self.display = *display;
            }
            TimerEvent::Expired { .. } => {
                self.handle = None;
                self.display = TimerDisplay {
                    minutes: 0,
                    seconds: 0,
                    progress: 100.0,
                };
            }
        }
        true
    }

    /// Whether a ticker is live (started and not yet expired or stopped)
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn display(&self) -> TimerDisplay {
        self.display
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source(&self) -> CountdownSource {
        self.source
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
