//! The simulation clock and shared simulation state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::debug;

use crate::time::{SimTime, SECONDS_PER_DAY};

/// Simulated days advanced per frame at rate 1.0.
///
/// A fixed per-frame increment rather than a measured wall-clock
/// delta: this trades real-time accuracy for visual stability, so the
/// apparent speed never jitters under a variable frame rate.
pub const FIXED_STEP: f64 = 0.01;

/// Smallest accepted simulation rate, in days per step unit.
pub const MIN_RATE: f64 = 1.0;

/// Largest rate the UI slider maps to: one year per second-equivalent.
pub const MAX_RATE: f64 = 365.25;

/// Mutable simulation state; one instance lives for the whole process.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimState {
    time: SimTime,
    playing: bool,
    rate: f64,
    selected: Option<Arc<str>>,
    following: bool,
}

impl SimState {
    /// Start at the current wall-clock date, playing, at rate 1.
    pub fn new() -> Self {
        Self::starting_at(SimTime::now())
    }

    pub fn starting_at(time: SimTime) -> Self {
        Self {
            time,
            playing: true,
            rate: MIN_RATE,
            selected: None,
            following: false,
        }
    }

    /// Advance the clock by one frame. No-op while paused.
    pub fn tick(&mut self) {
        if !self.playing {
            return;
        }
        let days = self.rate * FIXED_STEP;
        self.time = self.time + Duration::seconds_f64(days * SECONDS_PER_DAY);
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Jump to an explicit date/time (the calendar picker). Leaves the
    /// play/pause state untouched.
    pub fn set_time(&mut self, time: SimTime) {
        debug!(%time, "simulation time set");
        self.time = time;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Replace the rate, clamped to a positive minimum. Zero or
    /// negative rates are never stored.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = if rate.is_finite() {
            rate.max(MIN_RATE)
        } else {
            MIN_RATE
        };
    }

    /// Monotonic increasing map from slider position (0..=100) to a
    /// rate in days per step unit: 1 day/s at 0 up to one year/s at
    /// 100.
    pub fn rate_from_slider(position: f64) -> f64 {
        MIN_RATE + (MAX_RATE - MIN_RATE) * (position.clamp(0.0, 100.0) / 100.0)
    }

    pub fn selected(&self) -> Option<&Arc<str>> {
        self.selected.as_ref()
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    /// Update selection and follow flag together, so no frame observes
    /// a half-updated pair.
    pub fn set_selection(&mut self, selected: Option<Arc<str>>, following: bool) {
        self.selected = selected;
        self.following = following;
    }
}

impl Default for SimState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_only_while_playing() {
        let mut sim = SimState::starting_at(SimTime::from_days(10.0));
        sim.set_rate(100.0);
        let mut last = sim.time();
        for _ in 0..50 {
            sim.tick();
            assert!(sim.time() >= last);
            last = sim.time();
        }
        assert!((sim.time().days() - (10.0 + 50.0 * 100.0 * FIXED_STEP)).abs() < 1e-6);

        sim.toggle_playing();
        for _ in 0..50 {
            sim.tick();
        }
        assert_eq!(sim.time(), last);
    }

    #[test]
    fn rate_never_non_positive() {
        let mut sim = SimState::starting_at(SimTime::default());
        sim.set_rate(0.0);
        assert_eq!(sim.rate(), MIN_RATE);
        sim.set_rate(-3.0);
        assert_eq!(sim.rate(), MIN_RATE);
        sim.set_rate(f64::NAN);
        assert_eq!(sim.rate(), MIN_RATE);
        sim.set_rate(12.5);
        assert_eq!(sim.rate(), 12.5);
    }

    #[test]
    fn slider_map_is_monotonic() {
        assert_eq!(SimState::rate_from_slider(0.0), MIN_RATE);
        assert_eq!(SimState::rate_from_slider(100.0), MAX_RATE);
        assert_eq!(SimState::rate_from_slider(-5.0), MIN_RATE);
        let mut last = 0.0;
        for s in 0..=100 {
            let rate = SimState::rate_from_slider(s as f64);
            assert!(rate > last);
            last = rate;
        }
    }

    #[test]
    fn set_time_preserves_playing() {
        let mut sim = SimState::starting_at(SimTime::default());
        sim.toggle_playing();
        assert!(!sim.is_playing());
        sim.set_time(SimTime::from_days(123.0));
        assert!(!sim.is_playing());
        assert!((sim.time().days() - 123.0).abs() < 1e-9);
    }
}
