pub mod neows;
pub mod risk;

pub use neows::{parse_lookup, ElementsError, ElementsResult, NeoRecord};
pub use risk::{assess, warning_level, RiskAssessment, RiskLevel};
