use serde::{Deserialize, Serialize};

/// Engine-assigned handle for a tracked body.
/// Stable for the lifetime of a simulation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl BodyId {
    /// Encode for the float wire format. `-1.0` means "none".
    pub fn encode(id: Option<BodyId>) -> f32 {
        id.map(|id| id.0 as f32).unwrap_or(-1.0)
    }

    /// Decode from a float sent by the UI. Negative, fractional or
    /// non-finite values mean "none".
    pub fn decode(value: f32) -> Option<BodyId> {
        if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f32 {
            Some(BodyId(value as u32))
        } else {
            None
        }
    }
}

/// Where a tracked body came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Entry of the built-in planet table.
    Planet,
    /// Near-Earth object whose elements were fetched at runtime.
    NearEarthObject,
}

impl BodyKind {
    pub fn code(self) -> f32 {
        match self {
            BodyKind::Planet => 0.0,
            BodyKind::NearEarthObject => 1.0,
        }
    }
}
