//! Local break timer
//!
//! Used for breaks after a custom session, where the server has no break
//! phase. Owns its own countdown so it never shares a ticker with the
//! session countdown.

use std::time::Duration;

use chrono::Utc;

use super::countdown::{
    end_time_after, minutes_to_secs, CountdownEngine, CountdownSource, TimerDisplay, TimerEvent,
    TimerEventSender, DEFAULT_BREAK_SECS,
};

#[derive(Debug)]
pub struct UiBreakTimer {
    engine: CountdownEngine,
    default_secs: u64,
    duration_secs: u64,
    active: bool,
}

impl UiBreakTimer {
    /// Create an idle break timer; `default_minutes` of 0 means 5 minutes
    pub fn new(tx: TimerEventSender, tick_interval: Duration, default_minutes: u64) -> Self {
        let default_secs = if default_minutes == 0 {
            DEFAULT_BREAK_SECS
        } else {
            minutes_to_secs(default_minutes)
        };
        Self {
            engine: CountdownEngine::new(CountdownSource::UiBreak, tx, tick_interval),
            default_secs,
            duration_secs: default_secs,
            active: false,
        }
    }

    /// Begin a break of `minutes` (0 falls back to the default, capped at a day)
    pub fn start(&mut self, minutes: u64) {
        let secs = if minutes == 0 {
            self.default_secs
        } else {
            minutes_to_secs(minutes)
        };
        let Some(end) = end_time_after(Utc::now(), secs) else {
            tracing::warn!(secs, "Break length out of range, not starting");
            return;
        };
        self.duration_secs = secs;
        self.active = true;
        self.engine.start(end, secs);
        tracing::info!(minutes = secs / 60, "Break started");
    }

    /// Cancel any running break and restore the default length
    pub fn reset(&mut self) {
        self.engine.stop();
        self.active = false;
        self.duration_secs = self.default_secs;
    }

    /// Apply a timer event; returns true when the break just finished
    pub fn accept(&mut self, event: &TimerEvent) -> bool {
        if !self.engine.accept(event) {
            return false;
        }
        if matches!(event, TimerEvent::Expired { .. }) {
            self.active = false;
            return true;
        }
        false
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn display(&self) -> TimerDisplay {
        if self.active {
            self.engine.display()
        } else {
            TimerDisplay::full(self.duration_secs)
        }
    }

    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::focus_timing::countdown::{create_channel, MAX_PHASE_MINUTES};

    #[tokio::test]
    async fn test_start_and_reset() {
        let (tx, _rx) = create_channel();
        let mut timer = UiBreakTimer::new(tx, Duration::from_secs(1), 5);
        assert!(!timer.is_active());
        assert_eq!(timer.display().format(), "05:00");

        timer.start(10);
        assert!(timer.is_active());
        assert_eq!(timer.display().format(), "10:00");

        timer.reset();
        assert!(!timer.is_active());
        assert_eq!(timer.display().format(), "05:00");
    }

    #[tokio::test]
    async fn test_zero_minutes_uses_default() {
        let (tx, _rx) = create_channel();
        let mut timer = UiBreakTimer::new(tx, Duration::from_secs(1), 0);
        timer.start(0);
        assert_eq!(timer.display().format(), "05:00");
    }

    #[tokio::test]
    async fn test_huge_break_is_capped() {
        let (tx, _rx) = create_channel();
        let mut timer = UiBreakTimer::new(tx, Duration::from_secs(1), u64::MAX);
        assert_eq!(timer.display().format(), "1440:00");

        timer.start(200_000_000_000_000);
        assert!(timer.is_active());
        assert_eq!(timer.display().remaining_secs(), MAX_PHASE_MINUTES * 60);
    }

    #[tokio::test]
    async fn test_expiry_reported_once() {
        let (tx, _rx) = create_channel();
        let mut timer = UiBreakTimer::new(tx, Duration::from_secs(1), 5);
        timer.start(1);

        let expired = TimerEvent::Expired {
            source: CountdownSource::UiBreak,
            generation: timer.generation(),
        };
        assert!(timer.accept(&expired));
        assert!(!timer.is_active());

        // Session events never finish the break
        timer.start(1);
        let other = TimerEvent::Expired {
            source: CountdownSource::Session,
            generation: timer.generation(),
        };
        assert!(!timer.accept(&other));
        assert!(timer.is_active());
    }
}
