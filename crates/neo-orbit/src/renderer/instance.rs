use bytemuck::{Pod, Zeroable};

use crate::api::types::BodyId;

/// Per-body render data written to the shared buffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BodyInstance {
    /// Scene-space position (+Y up).
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Display sphere radius in scene units.
    pub radius: f32,
    /// Body id (see `BodyId::encode`).
    pub id: f32,
    /// `BodyKind::code`.
    pub kind: f32,
    /// `OrbitClass::code * 4 + RiskLevel::code`; unpack with `class_and_warning`.
    pub class_warning: f32,
    /// Bit set of `FLAG_*`.
    pub flags: f32,
}

/// Body is the current selection.
pub const FLAG_SELECTED: u32 = 1;
/// Pointer is over the body this tick.
pub const FLAG_HOVERED: u32 = 1 << 1;
/// Elements were unusable; the body sits at the origin.
pub const FLAG_DEGENERATE: u32 = 1 << 2;

impl BodyInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn pack_class_warning(class_code: f32, warning_code: f32) -> f32 {
        class_code * 4.0 + warning_code
    }

    /// Inverse of `pack_class_warning`: (class code, warning code).
    pub fn class_and_warning(&self) -> (u32, u32) {
        let packed = self.class_warning.max(0.0) as u32;
        (packed / 4, packed % 4)
    }

    pub fn flag_bits(&self) -> u32 {
        self.flags.max(0.0) as u32
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flag_bits() & flag != 0
    }

    pub fn body_id(&self) -> Option<BodyId> {
        BodyId::decode(self.id)
    }
}

/// Per-tick body instances, bounded by the buffer capacity.
pub struct BodyBuffer {
    pub instances: Vec<BodyInstance>,
    capacity: usize,
}

impl BodyBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns `false` once the buffer is full.
    pub fn push(&mut self, instance: BodyInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instances as a flat float slice, in wire order.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<BodyInstance>(), 32);
        assert_eq!(BodyInstance::FLOATS, 8);
    }

    #[test]
    fn buffer_respects_capacity() {
        let mut buf = BodyBuffer::new(2);
        assert!(buf.push(BodyInstance::default()));
        assert!(buf.push(BodyInstance::default()));
        assert!(!buf.push(BodyInstance::default()));
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.as_floats().len(), 16);
    }

    #[test]
    fn class_and_flags_unpack() {
        let inst = BodyInstance {
            class_warning: BodyInstance::pack_class_warning(3.0, 2.0),
            flags: (FLAG_SELECTED | FLAG_DEGENERATE) as f32,
            id: 12.0,
            ..Default::default()
        };
        assert_eq!(inst.class_and_warning(), (3, 2));
        assert!(inst.has_flag(FLAG_SELECTED));
        assert!(!inst.has_flag(FLAG_HOVERED));
        assert!(inst.has_flag(FLAG_DEGENERATE));
        assert_eq!(inst.body_id(), Some(BodyId(12)));
    }
}
