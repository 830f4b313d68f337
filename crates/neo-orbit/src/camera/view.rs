//! View-mode resolution: which pose the camera should be heading for.
//!
//! `resolve` is pure. It never looks at the current camera, so switching
//! modes is instantaneous here and the rig's interpolation supplies the
//! smooth transition.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::config::EngineConfig;
use crate::api::types::BodyId;

/// A camera placement: where it sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub target: Vec3,
    pub position: Vec3,
}

impl CameraPose {
    pub fn new(target: Vec3, position: Vec3) -> Self {
        Self { target, position }
    }

    /// Right-handed view matrix, +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }
}

/// Named poses that ignore simulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraPreset {
    /// Mercury through Mars, seen from above at an angle.
    InnerSystem,
    /// Out to Neptune.
    OuterSystem,
    /// Edge-on along the ecliptic.
    EclipticPlane,
}

impl CameraPreset {
    pub fn code(self) -> f32 {
        match self {
            CameraPreset::InnerSystem => 0.0,
            CameraPreset::OuterSystem => 1.0,
            CameraPreset::EclipticPlane => 2.0,
        }
    }

    pub fn from_code(code: f32) -> Option<Self> {
        if !code.is_finite() || code.fract() != 0.0 {
            return None;
        }
        match code as i32 {
            0 => Some(CameraPreset::InnerSystem),
            1 => Some(CameraPreset::OuterSystem),
            2 => Some(CameraPreset::EclipticPlane),
            _ => None,
        }
    }

    pub fn pose(self) -> CameraPose {
        match self {
            CameraPreset::InnerSystem => CameraPose::new(Vec3::ZERO, Vec3::new(0.0, 40.0, 55.0)),
            CameraPreset::OuterSystem => CameraPose::new(Vec3::ZERO, Vec3::new(0.0, 700.0, 900.0)),
            CameraPreset::EclipticPlane => CameraPose::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 120.0)),
        }
    }
}

/// Active camera behavior. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Overview,
    BodyFollow(BodyId),
    /// Follows whatever is selected; overview when nothing is.
    SelectionFollow,
    FixedPreset(CameraPreset),
}

impl ViewMode {
    /// Wire code for the mode itself.
    pub fn code(self) -> f32 {
        match self {
            ViewMode::Overview => 0.0,
            ViewMode::BodyFollow(_) => 1.0,
            ViewMode::SelectionFollow => 2.0,
            ViewMode::FixedPreset(_) => 3.0,
        }
    }

    /// Wire code for the mode's argument: body id, preset code, or -1.
    pub fn arg(self) -> f32 {
        match self {
            ViewMode::BodyFollow(id) => BodyId::encode(Some(id)),
            ViewMode::FixedPreset(preset) => preset.code(),
            ViewMode::Overview | ViewMode::SelectionFollow => -1.0,
        }
    }

    /// Decode a mode from UI input. A follow without a body, or an
    /// unknown preset, is rejected.
    pub fn from_code(mode: f32, arg: f32) -> Option<Self> {
        if !mode.is_finite() || mode.fract() != 0.0 {
            return None;
        }
        match mode as i32 {
            0 => Some(ViewMode::Overview),
            1 => BodyId::decode(arg).map(ViewMode::BodyFollow),
            2 => Some(ViewMode::SelectionFollow),
            3 => CameraPreset::from_code(arg).map(ViewMode::FixedPreset),
            _ => None,
        }
    }
}

fn overview(config: &EngineConfig) -> CameraPose {
    CameraPose::new(Vec3::ZERO, config.overview_position)
}

fn follow(id: BodyId, bodies: &[(BodyId, Vec3)], config: &EngineConfig) -> Option<CameraPose> {
    let (_, at) = bodies.iter().find(|(body, _)| *body == id)?;
    Some(CameraPose::new(*at, *at + config.follow_offset))
}

/// Desired camera pose for `mode`, given the selection and this tick's body positions.
/// A followed body missing from `bodies` counts as no body, and the overview pose is returned.
pub fn resolve(
    mode: ViewMode,
    selected: Option<BodyId>,
    bodies: &[(BodyId, Vec3)],
    config: &EngineConfig,
) -> CameraPose {
    match mode {
        ViewMode::Overview => overview(config),
        ViewMode::BodyFollow(id) => follow(id, bodies, config).unwrap_or_else(|| overview(config)),
        ViewMode::SelectionFollow => selected
            .and_then(|id| follow(id, bodies, config))
            .unwrap_or_else(|| overview(config)),
        ViewMode::FixedPreset(preset) => preset.pose(),
    }
}
