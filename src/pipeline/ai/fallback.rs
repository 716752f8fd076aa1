use crate::models::{ConfidenceInterval, Disease, PredictionInput, PredictionResult};
use crate::pipeline::rules::explain::DISCLAIMERS;

/// Symptom keywords recognised in degraded mode, matched as substrings.
pub const COMMON_SYMPTOM_KEYWORDS: [&str; 5] = ["fever", "cough", "headache", "fatigue", "nausea"];

/// Confidence by rank for the degraded-mode results.
const FALLBACK_CONFIDENCES: [f64; 3] = [0.6, 0.5, 0.4];

pub const FALLBACK_EXPLANATION: &str = "Detailed AI analysis is currently unavailable. These predictions come from a simplified symptom match and are less accurate than a full analysis.";

/// Degraded-mode predictions: catalog entries whose name or description
/// mentions a common keyword found in the reported symptoms, first three
/// in catalog order.
pub fn fallback_predictions(diseases: &[Disease], input: &PredictionInput) -> Vec<PredictionResult> {
    let symptoms = input.normalized_symptoms();
    let keywords: Vec<&str> = COMMON_SYMPTOM_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| symptoms.iter().any(|s| s.contains(kw)))
        .collect();

    if keywords.is_empty() {
        return Vec::new();
    }

    diseases
        .iter()
        .filter_map(|disease| {
            let haystack = format!(
                "{} {}",
                disease.name.to_lowercase(),
                disease.description.as_deref().unwrap_or_default().to_lowercase()
            );
            let hits: Vec<&str> = keywords
                .iter()
                .copied()
                .filter(|kw| haystack.contains(kw))
                .collect();
            (!hits.is_empty()).then_some((disease, hits))
        })
        .zip(FALLBACK_CONFIDENCES)
        .map(|((disease, hits), confidence)| PredictionResult {
            disease_id: disease.id,
            disease_name: disease.name.clone(),
            confidence,
            confidence_interval: ConfidenceInterval::around(confidence),
            reasoning: vec![format!(
                "Reported {} can be associated with {}",
                hits.join(", "),
                disease.name
            )],
            risk_factors: vec!["Detailed risk assessment unavailable".to_string()],
            recommendations: std::iter::once(
                "Consult a healthcare professional for an accurate assessment",
            )
            .chain(DISCLAIMERS)
            .map(str::to_string)
            .collect(),
            ai_explanation: Some(FALLBACK_EXPLANATION.to_string()),
        })
        .collect()
}
