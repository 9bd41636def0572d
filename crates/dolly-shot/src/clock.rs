// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Simulation clock for the shot camera.
//!
//! [`ShotClock`] is a plain accumulator advanced by whoever owns the frame
//! loop. [`FrameTicker`] is that owner for headless use: a tokio interval at
//! display rate that ticks the clock once per frame. Stopping the ticker
//! drops the interval, so no further frames are produced.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Accumulated simulation time with play/pause.
#[derive(Clone, Debug)]
pub struct ShotClock {
    elapsed: Duration,
    playing: bool,
    last: Option<Instant>,
}

impl Default for ShotClock {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ShotClock {
    /// New clock at `t = 0`.
    pub fn new(playing: bool) -> Self {
        Self {
            elapsed: Duration::ZERO,
            playing,
            last: None,
        }
    }

    /// Advance to wall time `now` and return simulation seconds.
    ///
    /// The first tick only records `now`. Paused ticks move `last` forward
    /// without accumulating, so resuming never jumps. A `now` earlier than the
    /// previous tick counts as zero delta.
    pub fn tick(&mut self, now: Instant) -> f32 {
        if let Some(last) = self.last {
            if self.playing {
                self.elapsed += now.saturating_duration_since(last);
            }
        }
        self.last = Some(now);
        self.seconds()
    }

    /// Simulation time in seconds.
    pub fn seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Resume accumulating.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freeze the accumulator.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Flip play/pause; returns the new playing state.
    pub fn toggle(&mut self) -> bool {
        self.playing = !self.playing;
        self.playing
    }

    /// Whether time is accumulating.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Back to `t = 0`. Play state is kept.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
        self.last = None;
    }
}

/// Drives a [`ShotClock`] from a fixed-rate interval.
#[derive(Debug)]
pub struct FrameTicker {
    clock: ShotClock,
    interval: Option<Interval>,
}

impl FrameTicker {
    /// Start ticking every `period`.
    pub fn new(clock: ShotClock, period: Duration) -> Self {
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Self {
            clock,
            interval: Some(interval),
        }
    }

    /// Wait for the next frame and return the simulation time, or `None` once stopped.
    pub async fn next_frame(&mut self) -> Option<f32> {
        let interval = self.interval.as_mut()?;
        let now = interval.tick().await;
        Some(self.clock.tick(now))
    }

    /// Deregister the interval. Idempotent.
    pub fn stop(&mut self) {
        if self.interval.take().is_some() {
            debug!(t = self.clock.seconds(), "frame ticker stopped");
        }
    }

    /// Whether frames are still being produced.
    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    /// The driven clock.
    pub fn clock(&self) -> &ShotClock {
        &self.clock
    }

    /// Mutable access for play/pause/reset.
    pub fn clock_mut(&mut self) -> &mut ShotClock {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paused_ticks_do_not_accumulate_or_jump() {
        let t0 = Instant::now();
        let mut clock = ShotClock::new(true);
        assert_eq!(clock.tick(t0), 0.0);
        assert_eq!(clock.tick(t0 + Duration::from_millis(500)), 0.5);

        clock.pause();
        assert_eq!(clock.tick(t0 + Duration::from_secs(3)), 0.5);

        clock.play();
        assert_eq!(clock.tick(t0 + Duration::from_millis(3250)), 0.75);
    }

    #[test]
    fn backwards_time_is_zero_delta() {
        let t0 = Instant::now();
        let mut clock = ShotClock::default();
        clock.tick(t0 + Duration::from_secs(1));
        assert_eq!(clock.tick(t0), 0.0);
    }

    #[test]
    fn reset_and_toggle() {
        let t0 = Instant::now();
        let mut clock = ShotClock::new(false);
        assert!(clock.toggle());
        clock.tick(t0);
        clock.tick(t0 + Duration::from_secs(2));
        clock.reset();
        assert_eq!(clock.seconds(), 0.0);
        assert!(clock.is_playing());
        assert!(!clock.toggle());
    }

    #[tokio::test(start_paused = true)]
    async fn ticker_advances_with_virtual_time_and_stops() {
        let mut ticker = FrameTicker::new(ShotClock::new(true), Duration::from_millis(100));
        assert_eq!(ticker.next_frame().await, Some(0.0));
        let t = ticker.next_frame().await.unwrap_or_default();
        assert!((t - 0.1).abs() < 1e-4);

        ticker.clock_mut().pause();
        ticker.next_frame().await;
        ticker.next_frame().await;
        assert!((ticker.clock().seconds() - 0.1).abs() < 1e-4);

        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
        assert_eq!(ticker.next_frame().await, None);
    }
}
