//! Shared frame buffer layout.
//! Must stay in sync with TypeScript `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 20 floats]
//! [Bodies: max_bodies × 8 floats]
//! ```
//!
//! Capacity is written into the header every frame.
//! TypeScript reads it from the header to compute offsets dynamically.

use crate::api::config::EngineConfig;
use crate::api::types::BodyId;
use crate::core::clock::{SimulationClock, DAYS_PER_CYCLE};
use crate::renderer::instance::BodyInstance;
use crate::renderer::traits::FrameData;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 20;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_MAX_BODIES: usize = 2;
pub const HEADER_BODY_COUNT: usize = 3;
pub const HEADER_CURRENT_DAYS: usize = 4;
pub const HEADER_TARGET_DAYS: usize = 5;
pub const HEADER_PROGRESS: usize = 6;
pub const HEADER_PLAYING: usize = 7;
pub const HEADER_SPEED: usize = 8;
pub const HEADER_VIEW_MODE: usize = 9;
pub const HEADER_VIEW_ARG: usize = 10;
pub const HEADER_SELECTED: usize = 11;
pub const HEADER_HOVERED: usize = 12;
pub const HEADER_CAMERA_TARGET: usize = 13; // x, y, z
pub const HEADER_CAMERA_POSITION: usize = 16; // x, y, z
pub const HEADER_RESERVED: usize = 19;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per body instance (wire format, never changes).
pub const BODY_FLOATS: usize = BodyInstance::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    /// Maximum body instances.
    pub max_bodies: usize,
    /// Size of body data section in floats.
    pub body_data_floats: usize,
    /// Offset (in floats) where body data begins.
    pub body_data_offset: usize,
    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from a raw capacity.
    pub fn new(max_bodies: usize) -> Self {
        let body_data_floats = max_bodies * BODY_FLOATS;
        let body_data_offset = HEADER_FLOATS;
        let buffer_total_floats = body_data_offset + body_data_floats;
        Self {
            max_bodies,
            body_data_floats,
            body_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.max_bodies)
    }

    /// Allocate a zeroed buffer of the right size.
    pub fn allocate(&self) -> Vec<f32> {
        vec![0.0; self.buffer_total_floats]
    }

    /// Serialize one frame. Bodies beyond capacity are left out.
    /// Returns the number of bodies written, or `None` if `buf` is too small.
    pub fn write_frame(&self, buf: &mut [f32], frame_counter: u64, frame: &FrameData) -> Option<usize> {
        if buf.len() < self.buffer_total_floats {
            return None;
        }
        let count = frame.bodies.len().min(self.max_bodies);
        write_header(&mut buf[..HEADER_FLOATS], frame_counter, self.max_bodies, count, frame);

        let body_floats: &[f32] = bytemuck::cast_slice(&frame.bodies[..count]);
        let start = self.body_data_offset;
        buf[start..start + body_floats.len()].copy_from_slice(body_floats);
        Some(count)
    }
}

fn write_clock(header: &mut [f32], clock: &SimulationClock) {
    header[HEADER_CURRENT_DAYS] = clock.current_days as f32;
    header[HEADER_TARGET_DAYS] = clock.target_days as f32;
    header[HEADER_PROGRESS] = (clock.target_days / DAYS_PER_CYCLE).clamp(0.0, 1.0) as f32;
    header[HEADER_PLAYING] = if clock.is_playing() { 1.0 } else { 0.0 };
    header[HEADER_SPEED] = clock.speed.multiplier() as f32;
}

fn write_header(header: &mut [f32], frame_counter: u64, max_bodies: usize, count: usize, frame: &FrameData) {
    header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
    header[HEADER_FRAME_COUNTER] = frame_counter as f32;
    header[HEADER_MAX_BODIES] = max_bodies as f32;
    header[HEADER_BODY_COUNT] = count as f32;
    write_clock(header, &frame.clock);
    header[HEADER_VIEW_MODE] = frame.view_mode.code();
    header[HEADER_VIEW_ARG] = frame.view_mode.arg();
    header[HEADER_SELECTED] = BodyId::encode(frame.selection.selected);
    header[HEADER_HOVERED] = BodyId::encode(frame.selection.hovered);
    let t = frame.camera.target;
    header[HEADER_CAMERA_TARGET..HEADER_CAMERA_TARGET + 3].copy_from_slice(&[t.x, t.y, t.z]);
    let p = frame.camera.position;
    header[HEADER_CAMERA_POSITION..HEADER_CAMERA_POSITION + 3].copy_from_slice(&[p.x, p.y, p.z]);
    header[HEADER_RESERVED] = 0.0;
}
