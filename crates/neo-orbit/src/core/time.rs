/// Minimum-interval frame throttle.
/// Decouples simulation cadence from the display refresh rate: animation
/// callbacks arrive at whatever rate the browser likes, ticks run at most
/// once per `interval`.
pub struct TickThrottle {
    /// Minimum wall-clock time between ticks.
    interval: f32,
    /// Upper bound on the elapsed time handed to a single tick.
    max_dt: f32,
    /// Time since the last tick.
    accumulator: f32,
}

impl TickThrottle {
    pub fn new(interval: f32, max_dt: f32) -> Self {
        Self {
            interval,
            max_dt: max_dt.max(interval),
            accumulator: 0.0,
        }
    }

    /// Add frame time. Returns the elapsed time to simulate when a tick is due.
    pub fn accumulate(&mut self, frame_dt: f32) -> Option<f32> {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return None;
        }
        self.accumulator += frame_dt;
        if self.accumulator < self.interval {
            return None;
        }
        // Cap so a long stall doesn't fast-forward the clock
        let dt = self.accumulator.min(self.max_dt);
        self.accumulator = 0.0;
        Some(dt)
    }

    /// Forget any partially accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Rate limiter for progress notifications to the scrubber UI.
/// Emits at most once per `interval`, and only when the value moved.
pub struct ProgressThrottle {
    interval: f32,
    elapsed: f32,
    last_sent: Option<f32>,
}

impl ProgressThrottle {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            // First poll reports immediately
            elapsed: interval,
            last_sent: None,
        }
    }

    /// Advance by `dt` seconds and return `fraction` if a notification is due.
    pub fn poll(&mut self, dt: f32, fraction: f32) -> Option<f32> {
        self.elapsed += dt.max(0.0);
        if self.elapsed < self.interval {
            return None;
        }
        if let Some(last) = self.last_sent {
            if (last - fraction).abs() < 1e-6 {
                return None;
            }
        }
        self.elapsed = 0.0;
        self.last_sent = Some(fraction);
        Some(fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_frames_are_throttled() {
        let mut t = TickThrottle::new(0.033, 0.25);
        // 120 Hz display: every 4th-ish frame ticks
        assert_eq!(t.accumulate(1.0 / 120.0), None);
        assert_eq!(t.accumulate(1.0 / 120.0), None);
        assert_eq!(t.accumulate(1.0 / 120.0), None);
        let dt = t.accumulate(1.0 / 120.0).unwrap();
        assert!((dt - 4.0 / 120.0).abs() < 1e-6);
    }

    #[test]
    fn slow_frames_tick_every_time() {
        let mut t = TickThrottle::new(0.033, 0.25);
        for _ in 0..5 {
            let dt = t.accumulate(0.05).unwrap();
            assert!((dt - 0.05).abs() < 1e-6);
        }
    }

    #[test]
    fn long_stall_is_capped() {
        let mut t = TickThrottle::new(0.033, 0.25);
        assert_eq!(t.accumulate(10.0), Some(0.25));
    }

    #[test]
    fn bad_frame_times_are_ignored() {
        let mut t = TickThrottle::new(0.033, 0.25);
        assert_eq!(t.accumulate(f32::NAN), None);
        assert_eq!(t.accumulate(-1.0), None);
        assert_eq!(t.accumulate(0.0), None);
    }

    #[test]
    fn progress_is_rate_limited() {
        let mut p = ProgressThrottle::new(0.2);
        assert_eq!(p.poll(0.033, 0.1), Some(0.1));
        // Within the window nothing is sent, whatever the value
        for i in 0..6 {
            assert_eq!(p.poll(0.033, 0.1 + i as f32 * 0.01), None);
        }
        assert_eq!(p.poll(0.033, 0.2), Some(0.2));
    }

    #[test]
    fn unchanged_progress_is_not_resent() {
        let mut p = ProgressThrottle::new(0.2);
        assert_eq!(p.poll(0.0, 0.5), Some(0.5));
        assert_eq!(p.poll(1.0, 0.5), None);
        assert_eq!(p.poll(0.0, 0.6), Some(0.6));
    }

    #[test]
    fn at_most_five_per_second() {
        let mut p = ProgressThrottle::new(0.2);
        let mut sent = 0;
        for i in 0..30 {
            // one second of 30 Hz ticks, value always changing
            if p.poll(1.0 / 30.0, i as f32 / 30.0).is_some() {
                sent += 1;
            }
        }
        assert!(sent <= 6, "sent {sent} notifications");
    }
}
