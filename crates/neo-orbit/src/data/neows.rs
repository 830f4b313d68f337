//! NeoWs lookup payload parsing.
//!
//! The host page fetches `/neo/rest/v1/neo/{id}` and hands the JSON body over
//! unchanged. NeoWs encodes most numbers as strings, so every numeric field
//! accepts either form.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::risk::{self, RiskAssessment, RiskLevel};
use crate::orbit::elements::OrbitalElements;

pub type ElementsResult<T> = Result<T, ElementsError>;

/// Why a lookup payload could not produce a trackable record.
#[derive(Error, Debug)]
pub enum ElementsError {
    #[error("malformed lookup payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload has no orbital_data section")]
    MissingOrbitalData,

    #[error("missing orbital element: {0}")]
    MissingField(&'static str),

    #[error("orbital element {field} is not a number: {value}")]
    InvalidNumber { field: &'static str, value: String },

    /// Reported by the host page when the request itself failed.
    #[error("fetch failed: {0}")]
    Fetch(String),
}

#[derive(Debug, Deserialize)]
struct RawLookup {
    id: Option<String>,
    name: Option<String>,
    nasa_jpl_url: Option<String>,
    #[serde(default)]
    is_potentially_hazardous_asteroid: bool,
    estimated_diameter: Option<RawDiameterUnits>,
    #[serde(default)]
    close_approach_data: Vec<RawCloseApproach>,
    orbital_data: Option<RawOrbitalData>,
}

#[derive(Debug, Deserialize)]
struct RawDiameterUnits {
    meters: Option<RawDiameter>,
}

#[derive(Debug, Deserialize)]
struct RawDiameter {
    estimated_diameter_min: Option<Value>,
    estimated_diameter_max: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawCloseApproach {
    close_approach_date: Option<String>,
    orbiting_body: Option<String>,
    relative_velocity: Option<RawVelocity>,
    miss_distance: Option<RawMissDistance>,
}

#[derive(Debug, Deserialize)]
struct RawVelocity {
    kilometers_per_second: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawMissDistance {
    kilometers: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawOrbitalData {
    semi_major_axis: Option<Value>,
    eccentricity: Option<Value>,
    inclination: Option<Value>,
    ascending_node_longitude: Option<Value>,
    perihelion_argument: Option<Value>,
    mean_anomaly: Option<Value>,
    mean_motion: Option<Value>,
    epoch_osculation: Option<Value>,
}

/// A near-Earth object ready to be tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct NeoRecord {
    /// NeoWs id (e.g. "2000433").
    pub neo_id: String,
    pub name: String,
    pub jpl_url: Option<String>,
    pub hazardous: bool,
    /// Mean of the min/max estimated diameter, in meters.
    pub diameter_m: Option<f64>,
    /// Closest Earth approach, in kilometers.
    pub miss_distance_km: Option<f64>,
    /// Relative velocity at that approach, in km/s.
    pub velocity_kps: Option<f64>,
    pub close_approach_date: Option<String>,
    /// Julian date of the osculating elements.
    pub epoch_osculation: Option<f64>,
    pub elements: OrbitalElements,
}

impl NeoRecord {
    /// Distance-only warning level used for scene tinting.
    pub fn warning(&self) -> RiskLevel {
        risk::warning_level(self.miss_distance_km)
    }

    /// Additive risk score for tabular display.
    pub fn risk(&self) -> RiskAssessment {
        risk::assess(self.diameter_m, self.miss_distance_km, self.velocity_kps, self.hazardous)
    }
}

/// Lenient number: JSON numbers and numeric strings parse, anything else is `None`.
fn to_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strict number for required elements.
fn required(value: Option<&Value>, field: &'static str) -> ElementsResult<f64> {
    let value = value.ok_or(ElementsError::MissingField(field))?;
    to_float(Some(value)).ok_or_else(|| ElementsError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn mean_diameter(d: Option<&RawDiameter>) -> Option<f64> {
    let d = d?;
    let min = to_float(d.estimated_diameter_min.as_ref());
    let max = to_float(d.estimated_diameter_max.as_ref());
    match (min, max) {
        (Some(lo), Some(hi)) => Some((lo + hi) / 2.0),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}

fn miss_km(entry: &RawCloseApproach) -> Option<f64> {
    to_float(entry.miss_distance.as_ref().and_then(|m| m.kilometers.as_ref()))
}

/// Closest approach to Earth; falls back to the first listed approach.
fn pick_close_approach(entries: &[RawCloseApproach]) -> Option<&RawCloseApproach> {
    entries
        .iter()
        .filter(|e| e.orbiting_body.as_deref() == Some("Earth"))
        .filter(|e| miss_km(e).is_some())
        .min_by(|a, b| {
            let (a, b) = (miss_km(a).unwrap_or(f64::MAX), miss_km(b).unwrap_or(f64::MAX));
            a.total_cmp(&b)
        })
        .or_else(|| entries.first())
}

fn parse_elements(raw: &RawOrbitalData) -> ElementsResult<OrbitalElements> {
    Ok(OrbitalElements {
        semi_major_axis: required(raw.semi_major_axis.as_ref(), "semi_major_axis")?,
        eccentricity: required(raw.eccentricity.as_ref(), "eccentricity")?,
        inclination: required(raw.inclination.as_ref(), "inclination")?,
        ascending_node: required(raw.ascending_node_longitude.as_ref(), "ascending_node_longitude")?,
        perihelion_argument: required(raw.perihelion_argument.as_ref(), "perihelion_argument")?,
        mean_anomaly: required(raw.mean_anomaly.as_ref(), "mean_anomaly")?,
        mean_motion: to_float(raw.mean_motion.as_ref()),
    })
}

/// Parse a NeoWs lookup response body.
pub fn parse_lookup(json: &str) -> ElementsResult<NeoRecord> {
    let raw: RawLookup = serde_json::from_str(json)?;
    let orbital = raw.orbital_data.as_ref().ok_or(ElementsError::MissingOrbitalData)?;
    let elements = parse_elements(orbital)?;

    let approach = pick_close_approach(&raw.close_approach_data);
    let diameter_m = mean_diameter(raw.estimated_diameter.as_ref().and_then(|d| d.meters.as_ref()));

    Ok(NeoRecord {
        neo_id: raw.id.unwrap_or_default(),
        name: raw.name.unwrap_or_default(),
        jpl_url: raw.nasa_jpl_url,
        hazardous: raw.is_potentially_hazardous_asteroid,
        diameter_m,
        miss_distance_km: approach.and_then(miss_km),
        velocity_kps: approach.and_then(|a| {
            to_float(a.relative_velocity.as_ref().and_then(|v| v.kilometers_per_second.as_ref()))
        }),
        close_approach_date: approach.and_then(|a| a.close_approach_date.clone()),
        epoch_osculation: to_float(orbital.epoch_osculation.as_ref()),
        elements,
    })
}
