//! Two-body Keplerian propagation: orbital elements + day offset → position.
//!
//! Pure functions, no shared state. Perturbations are ignored; this is a
//! visualization aid, not an ephemeris.

use glam::{DVec3, Vec3};

use super::elements::OrbitalElements;

const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Scene units per astronomical unit.
pub const SCENE_UNITS_PER_AU: f64 = 20.0;

/// Fixed Newton–Raphson iteration count for Kepler's equation.
/// Sufficient for e < 0.8; no convergence check is made.
pub const KEPLER_ITERATIONS: usize = 7;

/// Why a set of elements could not be propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degenerate {
    /// Semi-major axis is NaN or infinite.
    NonFiniteSemiMajorAxis,
    /// Semi-major axis is zero or negative.
    NonPositiveSemiMajorAxis,
    /// Eccentricity is NaN or infinite.
    NonFiniteEccentricity,
    /// Eccentricity outside [0, 1): not a bound ellipse.
    UnboundEccentricity,
    /// One of the orientation angles or the mean anomaly is NaN or infinite.
    NonFiniteAngle,
}

/// Result of propagating one body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Propagation {
    /// Position in scene units, renderer axes (Y up).
    Position(Vec3),
    /// Input was rejected; the body is drawn at the origin.
    Degenerate(Degenerate),
}

impl Propagation {
    /// Scene position, or the origin for degenerate input.
    pub fn position(&self) -> Vec3 {
        match self {
            Propagation::Position(p) => *p,
            Propagation::Degenerate(_) => Vec3::ZERO,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, Propagation::Degenerate(_))
    }
}

/// Check elements before any trigonometry touches them.
pub fn validate(elements: &OrbitalElements) -> Result<(), Degenerate> {
    let a = elements.semi_major_axis;
    let e = elements.eccentricity;
    if !a.is_finite() {
        return Err(Degenerate::NonFiniteSemiMajorAxis);
    }
    if a <= 0.0 {
        return Err(Degenerate::NonPositiveSemiMajorAxis);
    }
    if !e.is_finite() {
        return Err(Degenerate::NonFiniteEccentricity);
    }
    if !(0.0..1.0).contains(&e) {
        return Err(Degenerate::UnboundEccentricity);
    }
    let angles = [
        elements.inclination,
        elements.ascending_node,
        elements.perihelion_argument,
        elements.mean_anomaly,
    ];
    if angles.iter().any(|v| !v.is_finite()) {
        return Err(Degenerate::NonFiniteAngle);
    }
    Ok(())
}

/// Solve Kepler's equation E − e·sin(E) = M for the eccentric anomaly.
/// Newton–Raphson seeded at E₀ = M, fixed iteration count.
/// `mean_anomaly` in radians, returns radians.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let mut ea = mean_anomaly;
    for _ in 0..KEPLER_ITERATIONS {
        let delta = ea - eccentricity * ea.sin() - mean_anomaly;
        let derivative = 1.0 - eccentricity * ea.cos();
        ea -= delta / derivative;
    }
    ea
}

/// Heliocentric ecliptic position (x, y, z) in AU at `days` from epoch.
/// Z is the ecliptic north pole.
pub fn heliocentric_position(elements: &OrbitalElements, days: f64) -> Result<DVec3, Degenerate> {
    validate(elements)?;

    let a = elements.semi_major_axis;
    let e = elements.eccentricity;
    let n = elements.mean_motion_deg_per_day();

    // Range reduction is left to sin/cos.
    let m = (elements.mean_anomaly + n * days) * DEG_TO_RAD;
    let ea = solve_kepler(m, e);

    // Perifocal plane: x toward perihelion.
    let x_orb = a * (ea.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * ea.sin();

    let (sin_w, cos_w) = (elements.perihelion_argument * DEG_TO_RAD).sin_cos();
    let (sin_i, cos_i) = (elements.inclination * DEG_TO_RAD).sin_cos();
    let (sin_o, cos_o) = (elements.ascending_node * DEG_TO_RAD).sin_cos();

    let x = (cos_o * cos_w - sin_o * sin_w * cos_i) * x_orb
        + (-cos_o * sin_w - sin_o * cos_w * cos_i) * y_orb;
    let y = (sin_o * cos_w + cos_o * sin_w * cos_i) * x_orb
        + (-sin_o * sin_w + cos_o * cos_w * cos_i) * y_orb;
    let z = (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb;

    Ok(DVec3::new(x, y, z))
}

/// Map an ecliptic AU position to scene units on renderer axes.
/// Ecliptic north becomes +Y; ecliptic +Y becomes −Z (right-handed).
pub fn to_scene(ecliptic_au: DVec3) -> Vec3 {
    let s = ecliptic_au * SCENE_UNITS_PER_AU;
    Vec3::new(s.x as f32, s.z as f32, -s.y as f32)
}

/// Inverse of [`to_scene`], back to ecliptic AU.
pub fn from_scene(scene: Vec3) -> DVec3 {
    DVec3::new(scene.x as f64, -scene.z as f64, scene.y as f64) / SCENE_UNITS_PER_AU
}

/// Scene-space position of a body at `days` from epoch.
pub fn propagate(elements: &OrbitalElements, days: f64) -> Propagation {
    match heliocentric_position(elements, days) {
        Ok(p) => Propagation::Position(to_scene(p)),
        Err(reason) => Propagation::Degenerate(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> OrbitalElements {
        OrbitalElements::planar(1.458, 0.2229)
            .with_angles(10.83, 304.3, 178.9)
            .with_mean_anomaly(110.8)
    }

    #[test]
    fn kepler_circular_orbit() {
        let ea = solve_kepler(1.0, 0.0);
        assert!((ea - 1.0).abs() < 1e-12);
    }

    #[test]
    fn kepler_moderate_eccentricity_converges() {
        for &e in &[0.1, 0.3, 0.5, 0.6] {
            for k in 0..12 {
                let m = k as f64 * 0.5;
                let ea = solve_kepler(m, e);
                let residual = ea - e * ea.sin() - m;
                assert!(residual.abs() < 1e-9, "e = {e}, m = {m}, residual = {residual}");
            }
        }
    }

    #[test]
    fn propagation_is_deterministic() {
        let el = sample();
        for &days in &[-1000.0, -3.5, 0.0, 42.25, 9000.0] {
            let a = propagate(&el, days);
            let b = propagate(&el, days);
            assert_eq!(a, b);
            let (pa, pb) = (a.position(), b.position());
            assert_eq!(pa.x.to_bits(), pb.x.to_bits());
            assert_eq!(pa.y.to_bits(), pb.y.to_bits());
            assert_eq!(pa.z.to_bits(), pb.z.to_bits());
        }
    }

    #[test]
    fn circular_orbit_radius_is_constant() {
        let orientations = [(0.0, 0.0, 0.0), (23.4, 45.0, 90.0), (89.0, 200.0, 310.0), (160.0, 12.0, 7.0)];
        for &(i, node, w) in &orientations {
            let el = OrbitalElements::planar(2.5, 0.0).with_angles(i, node, w).with_mean_anomaly(33.0);
            for step in 0..40 {
                let days = step as f64 * 37.3 - 500.0;
                let p = heliocentric_position(&el, days).unwrap();
                assert!((p.length() - 2.5).abs() < 1e-9, "r = {} at day {days}", p.length());
            }
        }
    }

    #[test]
    fn position_repeats_after_one_period() {
        let el = sample();
        let period = el.period_days();
        for &start in &[0.0, 17.0, 250.0, -80.0] {
            let p0 = heliocentric_position(&el, start).unwrap();
            let p1 = heliocentric_position(&el, start + period).unwrap();
            assert!((p0 - p1).length() < 1e-6, "drift = {}", (p0 - p1).length());
        }
    }

    #[test]
    fn perihelion_at_zero_mean_anomaly() {
        let el = OrbitalElements::planar(2.0, 0.5);
        let p = heliocentric_position(&el, 0.0).unwrap();
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!(p.y.abs() < 1e-12);
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn inclination_lifts_out_of_ecliptic() {
        // Node on +X, perihelion 90° past node, fully inclined: perihelion sits on +Z.
        let el = OrbitalElements::planar(1.0, 0.0).with_angles(90.0, 0.0, 90.0);
        let p = heliocentric_position(&el, 0.0).unwrap();
        assert!((p.z - 1.0).abs() < 1e-12, "p = {p:?}");
    }

    #[test]
    fn scene_axes_put_ecliptic_north_up() {
        let scene = to_scene(DVec3::new(1.0, 2.0, 3.0));
        let s = SCENE_UNITS_PER_AU as f32;
        assert_eq!(scene, Vec3::new(1.0 * s, 3.0 * s, -2.0 * s));
        let back = from_scene(scene);
        assert!((back - DVec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn degenerate_inputs_are_tagged() {
        let cases = [
            (OrbitalElements::planar(f64::NAN, 0.1), Degenerate::NonFiniteSemiMajorAxis),
            (OrbitalElements::planar(f64::INFINITY, 0.1), Degenerate::NonFiniteSemiMajorAxis),
            (OrbitalElements::planar(0.0, 0.1), Degenerate::NonPositiveSemiMajorAxis),
            (OrbitalElements::planar(-1.0, 0.1), Degenerate::NonPositiveSemiMajorAxis),
            (OrbitalElements::planar(1.0, f64::NAN), Degenerate::NonFiniteEccentricity),
            (OrbitalElements::planar(1.0, 1.0), Degenerate::UnboundEccentricity),
            (OrbitalElements::planar(1.0, -0.1), Degenerate::UnboundEccentricity),
            (OrbitalElements::planar(1.0, 0.1).with_mean_anomaly(f64::NAN), Degenerate::NonFiniteAngle),
        ];
        for (el, reason) in cases {
            let result = propagate(&el, 10.0);
            assert_eq!(result, Propagation::Degenerate(reason));
            assert_eq!(result.position(), Vec3::ZERO);
            assert!(result.is_degenerate());
        }
    }
}
