//! Planet definition table: J2000 elements and display sizes.
//!
//! Elements from Standish (1992) / JPL approximate planetary positions,
//! converted to (ω, M) form: ω = ϖ − Ω, M = L − ϖ.
//! Mean motion is left out and derived from the semi-major axis.
//! Display radii are exaggerated for readability.

use super::elements::OrbitalElements;

/// Planet index constants.
pub const MERCURY: usize = 0;
pub const VENUS: usize = 1;
pub const EARTH: usize = 2;
pub const MARS: usize = 3;
pub const JUPITER: usize = 4;
pub const SATURN: usize = 5;
pub const URANUS: usize = 6;
pub const NEPTUNE: usize = 7;
pub const PLANET_COUNT: usize = 8;

/// Names for UI display (indexed by planet constant).
pub const PLANET_NAMES: [&str; PLANET_COUNT] = [
    "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune",
];

/// Rendered sphere radius in scene units (indexed by planet constant).
pub const PLANET_DISPLAY_RADII: [f32; PLANET_COUNT] = [
    0.35, // Mercury
    0.55, // Venus
    0.6,  // Earth
    0.45, // Mars
    2.2,  // Jupiter
    1.9,  // Saturn
    1.2,  // Uranus
    1.15, // Neptune
];

/// Display radius for near-Earth objects, in scene units.
pub const NEO_DISPLAY_RADIUS: f32 = 0.2;

fn planet(a: f64, e: f64, i: f64, node: f64, w: f64, m: f64) -> OrbitalElements {
    OrbitalElements::planar(a, e).with_angles(i, node, w).with_mean_anomaly(m)
}

/// J2000 elements for the eight planets.
pub fn planet_elements() -> [OrbitalElements; PLANET_COUNT] {
    [
        planet(0.38709927, 0.20563593, 7.00497902, 48.33076593, 29.12703035, 174.79252722), // Mercury
        planet(0.72333566, 0.00677672, 3.39467605, 76.67984255, 54.92262463, 50.37663232),  // Venus
        planet(1.00000261, 0.01671123, 0.0, 0.0, 102.93768193, 357.52688973),               // Earth
        planet(1.52371034, 0.09339410, 1.84969142, 49.55953891, 286.49683150, 19.39019754), // Mars
        planet(5.20288700, 0.04838624, 1.30439695, 100.47390909, 274.25457074, 19.66796068), // Jupiter
        planet(9.53667594, 0.05386179, 2.48599187, 113.66242448, 338.93645383, 317.35536592), // Saturn
        planet(19.18916464, 0.04725744, 0.77263783, 74.01692503, 96.93735127, 142.28382821), // Uranus
        planet(30.06992276, 0.00859048, 1.77004347, 131.78422574, 273.18053653, 259.91520804), // Neptune
    ]
}
