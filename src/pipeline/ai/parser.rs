use serde_json::Value;

use crate::pipeline::DiagnosisError;

/// Used when the model omits `aiExplanation`.
pub const DEFAULT_AI_EXPLANATION: &str = "AI analysis completed without an overall summary.";

/// Model reply after structural validation, before catalog resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDiagnosis {
    pub predictions: Vec<RawPrediction>,
    pub ai_explanation: String,
}

/// One `predictions[]` entry with text fields normalized to lists.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPrediction {
    pub disease_name: String,
    pub confidence: f64,
    pub reasoning: Vec<String>,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Parse the model's reply. The whole reply must be one JSON object with a
/// `predictions` array; anything else is a malformed response. Individual
/// entries without a usable `diseaseName` or `confidence` are skipped, but a
/// non-empty array in which every entry is skipped is malformed too.
pub fn parse_diagnosis_response(content: &str) -> Result<ParsedDiagnosis, DiagnosisError> {
    let root: Value = serde_json::from_str(content.trim())
        .map_err(|e| DiagnosisError::MalformedResponse(format!("invalid JSON: {e}")))?;

    let entries = root
        .get("predictions")
        .ok_or_else(|| DiagnosisError::MalformedResponse("missing predictions array".into()))?
        .as_array()
        .ok_or_else(|| DiagnosisError::MalformedResponse("predictions is not an array".into()))?;

    let predictions: Vec<RawPrediction> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let parsed = parse_entry(entry);
            if parsed.is_none() {
                tracing::warn!(index, "Skipping prediction entry without name or confidence");
            }
            parsed
        })
        .collect();

    if predictions.is_empty() && !entries.is_empty() {
        return Err(DiagnosisError::MalformedResponse(format!(
            "none of the {} prediction entries is usable",
            entries.len()
        )));
    }

    let ai_explanation = root
        .get("aiExplanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_AI_EXPLANATION)
        .to_string();

    Ok(ParsedDiagnosis {
        predictions,
        ai_explanation,
    })
}

fn parse_entry(entry: &Value) -> Option<RawPrediction> {
    let disease_name = entry
        .get("diseaseName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())?
        .to_string();

    let confidence = entry.get("confidence").and_then(number_lenient)?;

    Some(RawPrediction {
        disease_name,
        confidence,
        reasoning: text_list(entry.get("reasoning")),
        risk_factors: text_list(entry.get("riskFactors")),
        recommendations: text_list(entry.get("recommendations")),
    })
}

/// Accept a JSON number or a numeric string.
fn number_lenient(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Normalize a text field: a bare string becomes a one-element list,
/// arrays keep their non-empty string items, anything else is empty.
fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_response() {
        let content = r#"{
          "predictions": [
            {
              "diseaseName": "Influenza (Flu)",
              "confidence": 0.82,
              "reasoning": ["Fever and body aches", "Seasonal pattern"],
              "riskFactors": ["Age over 65"],
              "recommendations": ["Rest", "Consult a doctor"]
            },
            {
              "diseaseName": "Common Cold",
              "confidence": 0.4,
              "reasoning": "Mild upper respiratory symptoms",
              "riskFactors": [],
              "recommendations": "Stay hydrated"
            }
          ],
          "aiExplanation": "Viral respiratory infection is most likely."
        }"#;

        let parsed = parse_diagnosis_response(content).unwrap();
        assert_eq!(parsed.predictions.len(), 2);
        assert_eq!(parsed.predictions[0].disease_name, "Influenza (Flu)");
        assert_eq!(parsed.predictions[0].reasoning.len(), 2);
        assert_eq!(parsed.predictions[1].reasoning, vec!["Mild upper respiratory symptoms"]);
        assert_eq!(parsed.predictions[1].recommendations, vec!["Stay hydrated"]);
        assert!(parsed.predictions[1].risk_factors.is_empty());
        assert_eq!(parsed.ai_explanation, "Viral respiratory infection is most likely.");
    }

    #[test]
    fn missing_predictions_is_malformed() {
        let result = parse_diagnosis_response(r#"{"aiExplanation": "none"}"#);
        assert!(matches!(result, Err(DiagnosisError::MalformedResponse(_))));
    }

    #[test]
    fn non_array_predictions_is_malformed() {
        let result = parse_diagnosis_response(r#"{"predictions": {"diseaseName": "Migraine"}}"#);
        assert!(matches!(result, Err(DiagnosisError::MalformedResponse(_))));
    }

    #[test]
    fn fenced_json_is_rejected() {
        let content = "```json\n{\"predictions\": []}\n```";
        assert!(matches!(
            parse_diagnosis_response(content),
            Err(DiagnosisError::MalformedResponse(_))
        ));
    }

    #[test]
    fn prose_reply_is_rejected() {
        assert!(parse_diagnosis_response("I think it is the flu.").is_err());
    }

    #[test]
    fn entries_without_name_or_confidence_are_skipped() {
        let content = r#"{"predictions": [
            {"confidence": 0.5},
            {"diseaseName": "Migraine"},
            {"diseaseName": "  ", "confidence": 0.5},
            {"diseaseName": "Migraine", "confidence": "0.7"}
        ]}"#;
        let parsed = parse_diagnosis_response(content).unwrap();
        assert_eq!(parsed.predictions.len(), 1);
        assert_eq!(parsed.predictions[0].confidence, 0.7);
        assert_eq!(parsed.ai_explanation, DEFAULT_AI_EXPLANATION);
    }

    #[test]
    fn all_entries_unusable_is_malformed() {
        let content = r#"{"predictions": [
            {"diseaseName": "Migraine"},
            {"confidence": 0.7},
            {"diseaseName": "Flu", "confidence": "high"}
        ], "aiExplanation": "x"}"#;
        match parse_diagnosis_response(content) {
            Err(DiagnosisError::MalformedResponse(msg)) => assert!(msg.contains("3 prediction entries")),
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn text_list_ignores_non_strings() {
        let value = serde_json::json!(["a", 3, null, " ", "b"]);
        assert_eq!(text_list(Some(&value)), vec!["a", "b"]);
        assert!(text_list(Some(&serde_json::json!(42))).is_empty());
        assert!(text_list(None).is_empty());
    }

    #[test]
    fn empty_predictions_array_is_valid() {
        let parsed = parse_diagnosis_response(r#"{"predictions": [], "aiExplanation": "x"}"#).unwrap();
        assert!(parsed.predictions.is_empty());
    }
}
