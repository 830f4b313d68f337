//! Simulated clock: play/pause state machine with smoothed time.
//!
//! `target_days` is authoritative. While playing it advances with wall-clock
//! time; while paused it follows the scrubber. `current_days` chases it by
//! exponential smoothing every tick, so both play and scrubbing animate
//! instead of snapping. One full scrubber traversal is one simulated year.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::smoothing::{approach, wrapped_delta};
use crate::api::config::EngineConfig;

/// Length of the simulated cycle, in days. `target_days` wraps modulo this.
pub const DAYS_PER_CYCLE: f64 = 365.0;

/// Allowed playback speeds, slowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SpeedSetting {
    #[default]
    X1,
    X10,
    X100,
    X1000,
}

impl SpeedSetting {
    pub const ALL: [SpeedSetting; 4] = [
        SpeedSetting::X1,
        SpeedSetting::X10,
        SpeedSetting::X100,
        SpeedSetting::X1000,
    ];

    pub fn multiplier(self) -> f64 {
        match self {
            SpeedSetting::X1 => 1.0,
            SpeedSetting::X10 => 10.0,
            SpeedSetting::X100 => 100.0,
            SpeedSetting::X1000 => 1000.0,
        }
    }

    /// Validate a raw multiplier from the UI. Only the exact set values are accepted.
    pub fn from_multiplier(value: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.multiplier() == value as f64)
    }

    /// Next faster setting, saturating at the top.
    pub fn faster(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1).min(Self::ALL.len() - 1)]
    }

    /// Next slower setting, saturating at the bottom.
    pub fn slower(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[idx.saturating_sub(1)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    Playing,
    Paused,
}

/// Snapshot of the clock, readable by the propagator and the UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationClock {
    /// Smoothed, continuous simulated time in days.
    pub current_days: f64,
    /// Authoritative simulated time in days, in `[0, DAYS_PER_CYCLE]`.
    pub target_days: f64,
    pub speed: SpeedSetting,
    pub state: PlayState,
}

impl SimulationClock {
    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }
}

/// Owns the simulation clock and advances it once per tick.
pub struct TimeController {
    clock: SimulationClock,
    /// Simulated days per wall-clock second at 1x.
    days_per_second: f64,
    /// Fraction of the remaining gap closed per tick.
    smoothing: f64,
    /// Chase the target the short way round the cycle. Set while playing and
    /// kept through a pause so the catch-up finishes forward; cleared by a scrub.
    ring_chase: bool,
}

impl TimeController {
    pub fn new(days_per_second: f64, smoothing: f64) -> Self {
        Self {
            clock: SimulationClock {
                current_days: 0.0,
                target_days: 0.0,
                speed: SpeedSetting::default(),
                state: PlayState::Playing,
            },
            days_per_second,
            smoothing: smoothing.clamp(0.0, 1.0),
            ring_chase: true,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.days_per_second, config.clock_smoothing)
    }

    /// Start paused at a given target, with `current_days` already settled there.
    pub fn paused_at(mut self, days: f64) -> Self {
        let days = days.clamp(0.0, DAYS_PER_CYCLE);
        self.clock.state = PlayState::Paused;
        self.clock.target_days = days;
        self.clock.current_days = days;
        self.ring_chase = false;
        self
    }

    pub fn clock(&self) -> SimulationClock {
        self.clock
    }

    pub fn current_days(&self) -> f64 {
        self.clock.current_days
    }

    pub fn target_days(&self) -> f64 {
        self.clock.target_days
    }

    pub fn speed(&self) -> SpeedSetting {
        self.clock.speed
    }

    pub fn is_playing(&self) -> bool {
        self.clock.is_playing()
    }

    /// Scrubber position in `[0, 1]`.
    pub fn progress_fraction(&self) -> f32 {
        (self.clock.target_days / DAYS_PER_CYCLE).clamp(0.0, 1.0) as f32
    }

    pub fn play(&mut self) {
        if self.clock.state != PlayState::Playing {
            debug!("clock: play at {:.2} days", self.clock.target_days);
            self.clock.state = PlayState::Playing;
            self.ring_chase = true;
        }
    }

    /// Pause. `target_days` freezes at its live value, so the scrubber
    /// shows the exact instant playback stopped.
    pub fn pause(&mut self) {
        if self.clock.state != PlayState::Paused {
            debug!("clock: pause at {:.2} days", self.clock.target_days);
            self.clock.state = PlayState::Paused;
        }
    }

    pub fn toggle(&mut self) {
        match self.clock.state {
            PlayState::Playing => self.pause(),
            PlayState::Paused => self.play(),
        }
    }

    /// Change playback speed. Only the advance rate of `target_days` changes.
    pub fn set_speed(&mut self, speed: SpeedSetting) {
        self.clock.speed = speed;
    }

    /// Drive `target_days` from a scrubber fraction in `[0, 1]`.
    /// Scrubbing during playback pauses first. Non-finite input is ignored.
    pub fn scrub(&mut self, fraction: f32) -> bool {
        if !fraction.is_finite() {
            warn!("clock: ignoring non-finite scrub fraction");
            return false;
        }
        self.pause();
        self.ring_chase = false;
        self.clock.target_days = fraction.clamp(0.0, 1.0) as f64 * DAYS_PER_CYCLE;
        true
    }

    /// Advance by `dt` wall-clock seconds.
    pub fn tick(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let clock = &mut self.clock;
        if clock.state == PlayState::Playing {
            let advance = dt * clock.speed.multiplier() * self.days_per_second;
            clock.target_days = (clock.target_days + advance).rem_euclid(DAYS_PER_CYCLE);
        }
        if self.ring_chase {
            // Chase the target the short way round so a 365 → 0 wrap
            // keeps moving forward instead of sweeping back a year.
            let gap = wrapped_delta(clock.current_days, clock.target_days, DAYS_PER_CYCLE);
            clock.current_days = (clock.current_days + gap * self.smoothing).rem_euclid(DAYS_PER_CYCLE);
        } else {
            clock.current_days = approach(clock.current_days, clock.target_days, self.smoothing);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> TimeController {
        TimeController::new(2.0, 0.085)
    }

    #[test]
    fn scrub_sets_target_and_current_converges_monotonically() {
        let mut tc = controller().paused_at(100.0);
        assert!(tc.scrub(0.5));
        assert_eq!(tc.target_days(), 182.5);

        let mut prev = tc.current_days();
        for _ in 0..200 {
            tc.tick(0.033);
            let now = tc.current_days();
            assert!(now >= prev, "moved backward: {prev} -> {now}");
            assert!(now <= 182.5, "overshot: {now}");
            prev = now;
        }
        assert!((tc.current_days() - 182.5).abs() < 1e-3);
    }

    #[test]
    fn scrubbing_backward_converges_from_above() {
        let mut tc = controller().paused_at(300.0);
        tc.scrub(0.1);
        let mut prev = tc.current_days();
        for _ in 0..100 {
            tc.tick(0.033);
            assert!(tc.current_days() <= prev);
            assert!(tc.current_days() >= 36.5);
            prev = tc.current_days();
        }
    }

    #[test]
    fn playing_advances_target_by_rate() {
        let mut tc = controller();
        tc.set_speed(SpeedSetting::X10);
        tc.tick(1.0);
        assert!((tc.target_days() - 20.0).abs() < 1e-9);
        assert!(tc.current_days() > 0.0 && tc.current_days() < 20.0);
    }

    #[test]
    fn target_wraps_into_cycle() {
        let mut tc = controller().paused_at(364.0);
        tc.play();
        tc.set_speed(SpeedSetting::X100);
        tc.tick(0.033); // +6.6 days
        let target = tc.target_days();
        assert!((0.0..DAYS_PER_CYCLE).contains(&target), "target = {target}");
        assert!((target - 5.6).abs() < 1e-9);
    }

    #[test]
    fn wrap_does_not_jump_backward() {
        let mut tc = controller().paused_at(360.0);
        tc.play();
        tc.set_speed(SpeedSetting::X100);
        for _ in 0..60 {
            let before = tc.current_days();
            let gap_before = wrapped_delta(before, tc.target_days(), DAYS_PER_CYCLE);
            tc.tick(0.033);
            let step = wrapped_delta(before, tc.current_days(), DAYS_PER_CYCLE);
            assert!(step >= 0.0, "stepped backward by {step}");
            // Never more than one smoothing step past where the old gap pointed
            assert!(step <= gap_before + 6.6 + 1e-9);
            assert!((0.0..DAYS_PER_CYCLE).contains(&tc.current_days()));
        }
    }

    #[test]
    fn pause_after_wrap_keeps_moving_forward() {
        let mut tc = controller().paused_at(362.0);
        tc.play();
        tc.set_speed(SpeedSetting::X100);
        tc.tick(0.033);
        tc.tick(0.033);
        assert!(tc.target_days() < 11.0, "target = {}", tc.target_days());
        assert!(tc.current_days() > 360.0, "current = {}", tc.current_days());

        tc.pause();
        let target = tc.target_days();
        let mut travelled = 0.0;
        for _ in 0..200 {
            let before = tc.current_days();
            tc.tick(0.033);
            let step = wrapped_delta(before, tc.current_days(), DAYS_PER_CYCLE);
            assert!(step >= 0.0, "stepped backward by {step}");
            travelled += step;
        }
        assert_eq!(tc.target_days(), target);
        assert!(wrapped_delta(tc.current_days(), target, DAYS_PER_CYCLE).abs() < 1e-3);
        assert!(travelled < 20.0, "travelled {travelled} days");
    }

    #[test]
    fn scrub_after_playback_takes_the_direct_path() {
        let mut tc = controller().paused_at(300.0);
        tc.play();
        tc.tick(0.033);
        tc.scrub(0.1);
        let mut prev = tc.current_days();
        for _ in 0..100 {
            tc.tick(0.033);
            assert!(tc.current_days() <= prev);
            prev = tc.current_days();
        }
        assert!((tc.current_days() - 36.5).abs() < 1.0);
    }

    #[test]
    fn pause_freezes_target() {
        let mut tc = controller();
        tc.tick(1.0);
        tc.pause();
        let frozen = tc.target_days();
        for _ in 0..10 {
            tc.tick(0.033);
        }
        assert_eq!(tc.target_days(), frozen);
        assert!((tc.progress_fraction() - (frozen / DAYS_PER_CYCLE) as f32).abs() < 1e-6);
    }

    #[test]
    fn speed_change_leaves_current_untouched() {
        let mut tc = controller();
        tc.tick(1.0);
        let before = tc.current_days();
        tc.set_speed(SpeedSetting::X1000);
        assert_eq!(tc.current_days(), before);
    }

    #[test]
    fn scrub_during_playback_pauses() {
        let mut tc = controller();
        assert!(tc.is_playing());
        tc.scrub(0.25);
        assert!(!tc.is_playing());
        assert_eq!(tc.target_days(), 91.25);
    }

    #[test]
    fn bad_scrub_is_ignored() {
        let mut tc = controller().paused_at(50.0);
        assert!(!tc.scrub(f32::NAN));
        assert_eq!(tc.target_days(), 50.0);
        tc.scrub(7.0);
        assert_eq!(tc.target_days(), DAYS_PER_CYCLE);
        tc.scrub(-1.0);
        assert_eq!(tc.target_days(), 0.0);
    }

    #[test]
    fn toggle_round_trips() {
        let mut tc = controller();
        tc.toggle();
        assert!(!tc.is_playing());
        tc.toggle();
        assert!(tc.is_playing());
    }

    #[test]
    fn speed_validation_and_ordering() {
        assert_eq!(SpeedSetting::from_multiplier(100.0), Some(SpeedSetting::X100));
        assert_eq!(SpeedSetting::from_multiplier(50.0), None);
        assert_eq!(SpeedSetting::from_multiplier(f32::NAN), None);
        assert_eq!(SpeedSetting::X1.slower(), SpeedSetting::X1);
        assert_eq!(SpeedSetting::X1.faster(), SpeedSetting::X10);
        assert_eq!(SpeedSetting::X1000.faster(), SpeedSetting::X1000);
        assert!(SpeedSetting::X10 < SpeedSetting::X100);
    }
}
