//! Human-readable reasoning, risk factor and recommendation lines for
//! rule-based predictions.

use super::keywords::{
    advice_for, age_bonus, diseases_for_symptom, ANXIETY_DISORDER, COMMON_COLD, PNEUMONIA,
};
use crate::models::enums::{Gender, SymptomSeverity};
use crate::models::{Disease, PredictionInput};

/// Appended to every prediction's recommendations.
pub const DISCLAIMERS: [&str; 2] = [
    "This prediction is generated by an automated tool and is not a medical diagnosis",
    "Always consult a qualified healthcare professional for medical advice",
];

const GENERIC_RISK_FACTORS: [&str; 2] = ["General health status", "Environmental exposure"];

fn age_threshold(disease_name: &str) -> Option<u32> {
    age_bonus(disease_name).map(|(age, _)| age)
}

/// Normalized symptoms whose table entry lists `disease_name`.
pub fn matched_symptoms<'a>(symptoms: &'a [String], disease_name: &str) -> Vec<&'a str> {
    symptoms
        .iter()
        .filter(|s| diseases_for_symptom(s.as_str()).iter().any(|d| *d == disease_name))
        .map(String::as_str)
        .collect()
}

pub fn build_reasoning(disease: &Disease, input: &PredictionInput, symptoms: &[String]) -> Vec<String> {
    let name = disease.name.as_str();
    let mut reasoning = Vec::new();

    let matched = matched_symptoms(symptoms, name);
    if !matched.is_empty() {
        reasoning.push(format!(
            "Reported symptoms consistent with {name}: {}",
            matched.join(", ")
        ));
    }

    if let Some(threshold) = age_threshold(name) {
        if input.age > threshold {
            reasoning.push(format!(
                "Age {} is associated with an increased risk of {name}",
                input.age
            ));
        }
    }

    if input.severity.matches(disease.severity_level) {
        reasoning.push(format!(
            "Reported {} severity is consistent with a typical {name} presentation",
            input.severity
        ));
    }

    if name == COMMON_COLD && input.duration.to_lowercase().contains("day") {
        reasoning.push(format!(
            "Symptom duration ({}) fits the usual course of a common cold",
            input.duration.trim()
        ));
    }

    if reasoning.is_empty() {
        reasoning.push(format!("{name} is considered based on the overall symptom pattern"));
    }

    reasoning
}

pub fn build_risk_factors(disease: &Disease, input: &PredictionInput, symptoms: &[String]) -> Vec<String> {
    let name = disease.name.as_str();
    let mut factors = Vec::new();

    if input.age > 65 {
        factors.push("Advanced age".to_string());
    }

    if age_threshold(name).is_some() && input.age > 40 {
        factors.push(format!("Age over 40 increases the risk of {name}"));
    }

    if input.gender == Gender::Female && name == ANXIETY_DISORDER {
        factors.push("Anxiety disorders are more prevalent in women".to_string());
    }

    if name == PNEUMONIA {
        let has = |label: &str| symptoms.iter().any(|s| s == label);
        if has("chest pain") {
            factors.push("Chest pain may indicate lung involvement (Pneumonia)".to_string());
        }
        if has("shortness of breath") {
            factors.push("Shortness of breath suggests reduced respiratory capacity".to_string());
        }
    }

    if input.severity == SymptomSeverity::Severe {
        factors.push("Severe symptom presentation".to_string());
    }

    if factors.is_empty() {
        factors.extend(GENERIC_RISK_FACTORS.iter().map(|f| f.to_string()));
    }

    factors
}

pub fn build_recommendations(disease: &Disease, confidence: f64) -> Vec<String> {
    let urgency = if confidence > 0.7 {
        "Seek medical consultation promptly for a proper diagnosis"
    } else if confidence > 0.5 {
        "Consult a doctor to confirm this assessment"
    } else {
        "Monitor your symptoms and consult a doctor if they worsen"
    };

    std::iter::once(urgency)
        .chain(advice_for(&disease.name).iter().copied())
        .chain(DISCLAIMERS)
        .map(str::to_string)
        .collect()
}
