use glam::Mat4;

use super::view::CameraPose;
use crate::api::config::EngineConfig;
use crate::core::smoothing::{frame_factor, lerp_vec3};

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            fov_y: config.fov_y_degrees.to_radians(),
            aspect: config.aspect,
            near: config.near,
            far: config.far,
        }
    }

    /// Right-handed perspective matrix, depth in [0, 1].
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Update the aspect ratio (e.g. on canvas resize). Non-positive values are ignored.
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }
}

/// The camera actually shown on screen.
/// Eases toward whatever pose the view-mode resolver asks for, the same
/// way every tick, regardless of which mode produced it.
pub struct CameraRig {
    pose: CameraPose,
    pub projection: Projection,
    /// Smoothing factor (0.0 = instant snap, 0.99 = very slow).
    smoothing: f32,
}

impl CameraRig {
    pub fn new(initial: CameraPose, projection: Projection, smoothing: f32) -> Self {
        Self {
            pose: initial,
            projection,
            smoothing: smoothing.clamp(0.0, 0.99),
        }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    /// Move toward `desired`. Call once per tick with the resolver's output.
    pub fn follow(&mut self, desired: CameraPose, dt: f32) -> CameraPose {
        let t = frame_factor(self.smoothing, dt);
        self.pose.target = lerp_vec3(self.pose.target, desired.target, t);
        self.pose.position = lerp_vec3(self.pose.position, desired.position, t);
        self.pose
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection.matrix() * self.pose.view_matrix()
    }
}
