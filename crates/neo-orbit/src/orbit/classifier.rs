//! Near-Earth object orbit taxonomy (Apollo / Aten / Amor).

use serde::{Deserialize, Serialize};

use super::elements::OrbitalElements;

/// Perihelion threshold: Earth's aphelion distance (AU).
pub const EARTH_APHELION_AU: f64 = 1.017;
/// Aphelion threshold: Earth's perihelion distance (AU).
pub const EARTH_PERIHELION_AU: f64 = 0.983;
/// Outer perihelion limit for the near-Earth population (AU).
pub const NEAR_EARTH_PERIHELION_AU: f64 = 1.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrbitClass {
    /// Earth-crossing from outside: a > 1 AU, q < 1.017 AU.
    Apollo,
    /// Earth-crossing from inside: a < 1 AU, Q > 0.983 AU.
    Aten,
    /// Approaches but does not cross Earth's orbit: 1.017 < q < 1.3 AU.
    Amor,
    Unclassified,
}

impl OrbitClass {
    /// Numeric code for the float wire format.
    pub fn code(self) -> f32 {
        match self {
            OrbitClass::Apollo => 1.0,
            OrbitClass::Aten => 2.0,
            OrbitClass::Amor => 3.0,
            OrbitClass::Unclassified => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrbitClass::Apollo => "Apollo",
            OrbitClass::Aten => "Aten",
            OrbitClass::Amor => "Amor",
            OrbitClass::Unclassified => "Unclassified",
        }
    }
}

/// Classify an orbit. Rules are checked in order and the first match wins,
/// so an orbit meeting both the Apollo and Amor thresholds is Apollo.
pub fn classify(elements: &OrbitalElements) -> OrbitClass {
    let a = elements.semi_major_axis;
    let e = elements.eccentricity;
    if !a.is_finite() || !e.is_finite() {
        return OrbitClass::Unclassified;
    }

    let q = a * (1.0 - e);
    let big_q = a * (1.0 + e);

    if a > 1.0 && q < EARTH_APHELION_AU {
        OrbitClass::Apollo
    } else if a < 1.0 && big_q > EARTH_PERIHELION_AU {
        OrbitClass::Aten
    } else if q > EARTH_APHELION_AU && q < NEAR_EARTH_PERIHELION_AU {
        OrbitClass::Amor
    } else {
        OrbitClass::Unclassified
    }
}
