//! Keplerian orbital elements as delivered by the upstream data source.
//!
//! Units follow the source convention: AU for distances, degrees for angles,
//! days for time. Uses f64 throughout; only the final scene-unit step drops to f32.

use serde::{Deserialize, Serialize};

/// Mean motion of a body on a 1 AU heliocentric orbit, in degrees per day
/// (Gaussian gravitational constant, 360° / 365.2568983 days).
pub const MEAN_MOTION_1AU_DEG_PER_DAY: f64 = 0.9856076686;

/// Heliocentric two-body orbit at an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis (AU).
    pub semi_major_axis: f64,
    /// Eccentricity (0 ≤ e < 1 for a bound orbit).
    pub eccentricity: f64,
    /// Inclination to the ecliptic (degrees).
    pub inclination: f64,
    /// Longitude of the ascending node (degrees).
    pub ascending_node: f64,
    /// Argument of perihelion (degrees).
    pub perihelion_argument: f64,
    /// Mean anomaly at epoch (degrees).
    pub mean_anomaly: f64,
    /// Mean motion (degrees per day). Derived from the semi-major axis when absent.
    #[serde(default)]
    pub mean_motion: Option<f64>,
}

impl OrbitalElements {
    /// Elements for an orbit lying in the ecliptic with no rotation applied.
    pub fn planar(semi_major_axis: f64, eccentricity: f64) -> Self {
        Self {
            semi_major_axis,
            eccentricity,
            inclination: 0.0,
            ascending_node: 0.0,
            perihelion_argument: 0.0,
            mean_anomaly: 0.0,
            mean_motion: None,
        }
    }

    pub fn with_angles(mut self, inclination: f64, ascending_node: f64, perihelion_argument: f64) -> Self {
        self.inclination = inclination;
        self.ascending_node = ascending_node;
        self.perihelion_argument = perihelion_argument;
        self
    }

    pub fn with_mean_anomaly(mut self, mean_anomaly: f64) -> Self {
        self.mean_anomaly = mean_anomaly;
        self
    }

    pub fn with_mean_motion(mut self, mean_motion: f64) -> Self {
        self.mean_motion = Some(mean_motion);
        self
    }

    /// Mean motion in degrees per day.
    ///
    /// Uses the supplied value when it is finite and positive, otherwise
    /// Kepler's third law for a solar-mass-dominated orbit.
    pub fn mean_motion_deg_per_day(&self) -> f64 {
        match self.mean_motion {
            Some(n) if n.is_finite() && n > 0.0 => n,
            _ => MEAN_MOTION_1AU_DEG_PER_DAY / self.semi_major_axis.powf(1.5),
        }
    }

    /// Orbital period in days.
    pub fn period_days(&self) -> f64 {
        360.0 / self.mean_motion_deg_per_day()
    }

    /// Perihelion distance q = a(1 − e), in AU.
    pub fn perihelion(&self) -> f64 {
        self.semi_major_axis * (1.0 - self.eccentricity)
    }

    /// Aphelion distance Q = a(1 + e), in AU.
    pub fn aphelion(&self) -> f64 {
        self.semi_major_axis * (1.0 + self.eccentricity)
    }
}
