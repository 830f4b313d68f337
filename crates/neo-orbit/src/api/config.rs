use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Tunables for the simulation engine.
/// Every field has a default, so a partial JSON document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Minimum wall-clock interval between simulation ticks, in seconds (default: ~33 ms).
    pub tick_interval: f32,
    /// Largest elapsed time a single tick may consume, in seconds.
    /// Longer gaps (background tab, debugger pause) are truncated.
    pub max_tick_dt: f32,
    /// Minimum interval between progress notifications to the scrubber UI, in seconds.
    pub progress_interval: f32,
    /// Simulated days advanced per wall-clock second at 1x speed.
    pub days_per_second: f64,
    /// Fraction of the remaining gap `current_days` closes per tick.
    pub clock_smoothing: f64,
    /// Camera smoothing factor (0.0 = instant snap, 0.99 = very slow).
    pub camera_smoothing: f32,
    /// Camera position in the overview pose (target is the origin).
    pub overview_position: Vec3,
    /// Camera offset from a followed body.
    pub follow_offset: Vec3,
    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,
    /// Viewport aspect ratio (width / height). Updated on resize.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Radius of the picking proxy sphere around each body, in scene units.
    pub hit_radius: f32,
    /// NDC distance a pointer may travel between down and up and still count as a click.
    pub drag_threshold: f32,
    /// Capacity of the per-frame body buffer.
    pub max_bodies: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: 0.033,
            max_tick_dt: 0.25,
            progress_interval: 0.2,
            days_per_second: 2.0,
            clock_smoothing: 0.085,
            camera_smoothing: 0.9,
            overview_position: Vec3::new(0.0, 60.0, 90.0),
            follow_offset: Vec3::new(0.0, 3.0, 6.0),
            fov_y_degrees: 50.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 5000.0,
            hit_radius: 1.5,
            drag_threshold: 0.02,
            max_bodies: 64,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a JSON string. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
