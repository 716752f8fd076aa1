use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{Gender, SymptomSeverity};

/// Lower bound applied to every scored confidence.
pub const MIN_CONFIDENCE: f64 = 0.1;
/// Upper bound applied to every scored confidence.
pub const MAX_CONFIDENCE: f64 = 0.95;
/// Half-width of the fixed confidence band.
pub const INTERVAL_HALF_WIDTH: f64 = 0.1;

/// One diagnosis request. Symptom labels are free text; scorers lower-case
/// them before matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    pub symptoms: Vec<String>,
    pub age: u32,
    pub gender: Gender,
    pub duration: String,
    pub severity: SymptomSeverity,
    #[serde(default)]
    pub additional_notes: Option<String>,
}

impl PredictionInput {
    /// Symptoms trimmed and lower-cased, order preserved.
    pub fn normalized_symptoms(&self) -> Vec<String> {
        self.symptoms
            .iter()
            .map(|s| s.trim().to_lowercase())
            .collect()
    }
}

/// Fixed ±0.1 band around a point confidence, clamped to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub high: f64,
}

impl ConfidenceInterval {
    pub fn around(confidence: f64) -> Self {
        Self {
            low: (confidence - INTERVAL_HALF_WIDTH).max(0.0),
            high: (confidence + INTERVAL_HALF_WIDTH).min(1.0),
        }
    }
}

/// A scored disease candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub disease_id: Uuid,
    pub disease_name: String,
    pub confidence: f64,
    pub confidence_interval: ConfidenceInterval,
    pub reasoning: Vec<String>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
    /// Shared analysis summary; set only by the LLM pathway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_explanation: Option<String>,
}

/// Clamp a raw score into [MIN_CONFIDENCE, MAX_CONFIDENCE]. NaN maps to the floor.
pub fn clamp_confidence(raw: f64) -> f64 {
    if raw.is_nan() {
        return MIN_CONFIDENCE;
    }
    raw.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Sort by non-increasing confidence. Stable, so ties keep their input order.
pub fn sort_by_confidence(predictions: &mut [PredictionResult]) {
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}
