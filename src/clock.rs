// ABOUTME: Workout clock tracking elapsed session time across pause/resume cycles
// ABOUTME: Monotonic-anchored so repeated pause/resume never accumulates drift
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Workout Clock
//!
//! Pure time-domain component: no I/O, no error conditions. Elapsed time is
//! computed on demand from a monotonic anchor instead of counting ticks, so a
//! session that is paused and resumed many times reads exactly the time spent
//! running. Uses [`tokio::time::Instant`] so tests can drive it under a paused
//! runtime.

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Elapsed-time tracker for an active workout session
#[derive(Debug, Clone, Default)]
pub struct WorkoutClock {
    /// Time accumulated across completed run intervals
    accumulated: Duration,
    /// Anchor of the current run interval, `None` while stopped
    started_at: Option<Instant>,
}

impl WorkoutClock {
    /// Create a stopped clock at zero
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a stopped clock resumed at a prior elapsed reading
    #[must_use]
    pub fn with_elapsed(elapsed_seconds: u64) -> Self {
        Self {
            accumulated: Duration::from_secs(elapsed_seconds),
            started_at: None,
        }
    }

    /// Start (or resume) the clock; no-op when already running
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Stop the clock, freezing the elapsed reading; no-op when stopped
    pub fn stop(&mut self) {
        if let Some(started_at) = self.started_at.take() {
            self.accumulated += started_at.elapsed();
        }
    }

    /// Stop and zero the clock
    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Overwrite the elapsed reading, e.g. when hydrating from a draft.
    /// A running clock keeps running from the new reading.
    pub fn set_elapsed(&mut self, elapsed_seconds: u64) {
        self.accumulated = Duration::from_secs(elapsed_seconds);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Whether the clock is currently running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Current elapsed reading in whole seconds
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        let running = self
            .started_at
            .map(|started_at| started_at.elapsed())
            .unwrap_or_default();
        (self.accumulated + running).as_secs()
    }

    /// Current elapsed reading rendered as `HH:MM:SS`
    #[must_use]
    pub fn formatted(&self) -> String {
        format_elapsed(self.elapsed_seconds())
    }
}

impl fmt::Display for WorkoutClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Render a seconds count as zero-padded `HH:MM:SS` with unbounded hours
#[must_use]
pub fn format_elapsed(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[test]
    fn test_format_elapsed_zero_padding() {
        assert_eq!(format_elapsed(0), "00:00:00");
        assert_eq!(format_elapsed(61), "00:01:01");
        assert_eq!(format_elapsed(3661), "01:01:01");
    }

    #[test]
    fn test_format_elapsed_unbounded_hours() {
        assert_eq!(format_elapsed(90 * 3600), "90:00:00");
        assert_eq!(format_elapsed(125 * 3600 + 59), "125:00:59");
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_accumulates_while_running() {
        let mut clock = WorkoutClock::new();
        clock.start();
        advance(Duration::from_secs(5)).await;
        assert_eq!(clock.elapsed_seconds(), 5);
        assert!(clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clock_frozen_while_stopped() {
        let mut clock = WorkoutClock::new();
        clock.start();
        advance(Duration::from_secs(4)).await;
        clock.stop();
        advance(Duration::from_secs(100)).await;
        assert_eq!(clock.elapsed_seconds(), 4);
        assert!(!clock.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_resume_is_drift_free() {
        let mut clock = WorkoutClock::new();
        clock.start();
        advance(Duration::from_secs(3)).await;
        clock.stop();
        // arbitrary wall-clock gap between stop and the next start
        advance(Duration::from_secs(42)).await;
        clock.start();
        advance(Duration::from_secs(3)).await;
        clock.stop();
        assert_eq!(clock.elapsed_seconds(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_noop_when_running() {
        let mut clock = WorkoutClock::new();
        clock.start();
        advance(Duration::from_secs(2)).await;
        clock.start();
        advance(Duration::from_secs(2)).await;
        assert_eq!(clock.elapsed_seconds(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_from_hydrated_reading() {
        let mut clock = WorkoutClock::with_elapsed(600);
        assert_eq!(clock.elapsed_seconds(), 600);
        clock.start();
        advance(Duration::from_secs(30)).await;
        assert_eq!(clock.elapsed_seconds(), 630);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_zeroes_and_stops() {
        let mut clock = WorkoutClock::new();
        clock.start();
        advance(Duration::from_secs(9)).await;
        clock.reset();
        assert_eq!(clock.elapsed_seconds(), 0);
        assert!(!clock.is_running());
        advance(Duration::from_secs(9)).await;
        assert_eq!(clock.elapsed_seconds(), 0);
    }
}
