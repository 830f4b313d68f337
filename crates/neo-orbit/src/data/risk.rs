//! Risk classification for near-Earth objects.
//!
//! Two views of the same record: a distance-only warning level used to tint
//! bodies in the scene, and the additive risk score shown in the feed table.

use serde::{Deserialize, Serialize};

/// Closest approach at or inside this distance is a high warning (km).
pub const HIGH_WARNING_KM: f64 = 7.5e6;
/// Closest approach at or inside this distance is a medium warning (km).
pub const MEDIUM_WARNING_KM: f64 = 2.0e7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn code(self) -> f32 {
        match self {
            RiskLevel::Low => 0.0,
            RiskLevel::Medium => 1.0,
            RiskLevel::High => 2.0,
        }
    }
}

/// Warning level from closest-approach distance alone.
/// Unknown distance reads as `Low`.
pub fn warning_level(miss_distance_km: Option<f64>) -> RiskLevel {
    match miss_distance_km {
        Some(d) if d.is_finite() && d <= HIGH_WARNING_KM => RiskLevel::High,
        Some(d) if d.is_finite() && d <= MEDIUM_WARNING_KM => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// Additive risk score and its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u32,
    pub category: RiskLevel,
}

/// Score a record from hazard flag, size, miss distance and speed.
/// Missing inputs contribute nothing.
pub fn assess(
    diameter_m: Option<f64>,
    miss_distance_km: Option<f64>,
    velocity_kps: Option<f64>,
    hazardous: bool,
) -> RiskAssessment {
    let mut score = 0;
    if hazardous {
        score += 50;
    }

    if let Some(d) = diameter_m {
        score += if d >= 1000.0 {
            30
        } else if d >= 300.0 {
            20
        } else if d >= 140.0 {
            10
        } else {
            0
        };
    }

    if let Some(km) = miss_distance_km {
        score += if km <= 750_000.0 {
            30
        } else if km <= 3_000_000.0 {
            20
        } else if km <= 7_500_000.0 {
            10
        } else {
            0
        };
    }

    if let Some(v) = velocity_kps {
        score += if v >= 25.0 {
            15
        } else if v >= 15.0 {
            10
        } else if v >= 8.0 {
            5
        } else {
            0
        };
    }

    let category = if score >= 70 {
        RiskLevel::High
    } else if score >= 40 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };
    RiskAssessment { score, category }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_thresholds_are_inclusive() {
        assert_eq!(warning_level(Some(7.5e6)), RiskLevel::High);
        assert_eq!(warning_level(Some(7.5e6 + 1.0)), RiskLevel::Medium);
        assert_eq!(warning_level(Some(2.0e7)), RiskLevel::Medium);
        assert_eq!(warning_level(Some(2.0e7 + 1.0)), RiskLevel::Low);
        assert_eq!(warning_level(Some(384_400.0)), RiskLevel::High);
    }

    #[test]
    fn unknown_distance_is_low() {
        assert_eq!(warning_level(None), RiskLevel::Low);
        assert_eq!(warning_level(Some(f64::NAN)), RiskLevel::Low);
    }

    #[test]
    fn hazardous_large_close_fast_is_high() {
        let r = assess(Some(1200.0), Some(500_000.0), Some(30.0), true);
        assert_eq!(r.score, 50 + 30 + 30 + 15);
        assert_eq!(r.category, RiskLevel::High);
    }

    #[test]
    fn medium_band() {
        // 20 (300 m) + 20 (2e6 km) + 5 (9 km/s) = 45
        let r = assess(Some(300.0), Some(2_000_000.0), Some(9.0), false);
        assert_eq!(r.score, 45);
        assert_eq!(r.category, RiskLevel::Medium);
    }

    #[test]
    fn missing_everything_scores_zero() {
        let r = assess(None, None, None, false);
        assert_eq!(r, RiskAssessment { score: 0, category: RiskLevel::Low });
    }

    #[test]
    fn hazard_flag_alone_is_medium() {
        let r = assess(Some(50.0), Some(40_000_000.0), Some(4.0), true);
        assert_eq!(r.score, 50);
        assert_eq!(r.category, RiskLevel::Medium);
    }
}
