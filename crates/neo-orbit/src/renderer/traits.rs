//! Renderer collaborator contract.
//!
//! The engine never issues draw calls or owns GPU resources. Each tick it
//! hands a `FrameData` to whatever renderer is attached: the TypeScript
//! scene through the shared buffer, or a native implementation of this trait.

use glam::Mat4;

use super::instance::BodyInstance;
use crate::camera::view::{CameraPose, ViewMode};
use crate::core::clock::SimulationClock;
use crate::selection::picking::SelectionState;

/// Timing information from a draw call.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawTiming {
    /// Time spent submitting draw calls (microseconds)
    pub draw_us: u32,
}

/// Everything a renderer needs for one frame.
pub struct FrameData<'a> {
    /// One instance per active body, planets first.
    pub bodies: &'a [BodyInstance],
    /// Smoothed camera pose.
    pub camera: CameraPose,
    pub view_projection: Mat4,
    pub clock: SimulationClock,
    pub view_mode: ViewMode,
    pub selection: SelectionState,
}

pub trait Renderer {
    /// Backend identifier (e.g. "three", "webgpu", "headless").
    fn backend(&self) -> &'static str;

    /// Draw a complete frame. Returns timing information for profiling.
    fn draw(&mut self, frame: &FrameData) -> DrawTiming;

    /// Handle viewport resize.
    fn resize(&mut self, width: u32, height: u32);
}
