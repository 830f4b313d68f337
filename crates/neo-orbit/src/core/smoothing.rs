// core/smoothing.rs
//
// Exponential smoothing helpers shared by the simulation clock and the camera rig.
// Pure math, no engine state.

use glam::Vec3;

/// Move `current` a fraction `alpha` of the way toward `target`.
#[inline]
pub fn approach(current: f64, target: f64, alpha: f64) -> f64 {
    current + (target - current) * alpha
}

/// Linearly interpolate between two Vec3 values.
#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}

/// Frame-rate independent interpolation factor.
/// `smoothing` is the fraction of the gap left after one 60 Hz frame
/// (0.0 = instant snap, 0.9 = slow), so the result depends on `dt` only.
#[inline]
pub fn frame_factor(smoothing: f32, dt: f32) -> f32 {
    if smoothing <= 0.0 {
        1.0
    } else {
        1.0 - smoothing.clamp(0.0, 0.99).powf(dt * 60.0)
    }
}

/// Signed shortest distance from `from` to `to` on a circle of length `period`.
/// Result lies in `(-period / 2, period / 2]`.
#[inline]
pub fn wrapped_delta(from: f64, to: f64, period: f64) -> f64 {
    let d = (to - from).rem_euclid(period);
    if d > period / 2.0 {
        d - period
    } else {
        d
    }
}
