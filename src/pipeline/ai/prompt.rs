use crate::models::{Disease, PredictionInput};

pub const DIAGNOSIS_SYSTEM_PROMPT: &str = "You are a medical AI assistant that supports differential diagnosis from patient-reported symptoms. You assist, and never replace, a qualified clinician. Reply with a single valid JSON object and nothing else: no markdown, no code fences, no commentary.";

const NO_DESCRIPTION: &str = "No description available";

/// Longest free-text field forwarded to the model, in characters.
const MAX_FIELD_CHARS: usize = 500;

/// One bullet per catalog entry: `- {name} ({code or N/A}): {description}`.
pub fn build_disease_context(diseases: &[Disease]) -> String {
    diseases
        .iter()
        .map(|d| {
            format!(
                "- {} ({}): {}",
                d.name,
                d.icd_code.as_deref().unwrap_or("N/A"),
                d.description.as_deref().unwrap_or(NO_DESCRIPTION)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full user prompt: patient data, catalog context, output contract and
/// the medical disclaimer instruction.
pub fn build_prediction_prompt(input: &PredictionInput, disease_context: &str) -> String {
    let symptoms = input
        .symptoms
        .iter()
        .map(|s| sanitize_field(s))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let notes = input
        .additional_notes
        .as_deref()
        .map(sanitize_field)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "None".to_string());

    format!(
        r#"Analyze the following patient information and identify the most likely conditions.

PATIENT INFORMATION:
- Age: {age}
- Gender: {gender}
- Symptom duration: {duration}
- Severity: {severity}
- Symptoms: {symptoms}
- Additional notes: {notes}

AVAILABLE DISEASES:
{disease_context}

INSTRUCTIONS:
1. Only consider diseases from the list above and copy their names exactly as written.
2. Return 3 to 5 predictions ordered from most to least likely.
3. Give each prediction a confidence between 0.0 and 1.0.
4. Explain the reasoning, list relevant risk factors and give practical recommendations.

Respond with a JSON object in exactly this format:
{{
  "predictions": [
    {{
      "diseaseName": "exact disease name from the list",
      "confidence": 0.75,
      "reasoning": ["why this disease fits"],
      "riskFactors": ["relevant risk factor"],
      "recommendations": ["practical next step"]
    }}
  ],
  "aiExplanation": "short overall summary of the analysis"
}}

IMPORTANT: This analysis supports, and does not replace, professional medical judgment. Every prediction must include a recommendation to consult a qualified healthcare professional."#,
        age = input.age,
        gender = input.gender,
        duration = sanitize_field(&input.duration),
        severity = input.severity,
    )
}

/// Collapse whitespace, drop control characters and cap length so free text
/// cannot reshape the prompt layout.
fn sanitize_field(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_FIELD_CHARS)
        .collect()
}
