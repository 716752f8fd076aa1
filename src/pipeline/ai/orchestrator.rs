use std::collections::HashSet;
use std::time::Duration;

use serde::Serialize;

use super::fallback::fallback_predictions;
use super::parser::{parse_diagnosis_response, ParsedDiagnosis};
use super::prompt::{build_disease_context, build_prediction_prompt, DIAGNOSIS_SYSTEM_PROMPT};
use super::types::LlmClient;
use crate::catalog::{find_by_name, DiseaseCatalog};
use crate::config::DEFAULT_LLM_TIMEOUT_SECS;
use crate::models::{
    clamp_confidence, sort_by_confidence, ConfidenceInterval, Disease, PredictionInput,
    PredictionResult,
};
use crate::pipeline::{DiagnosisError, Predictor};

/// Which step of the cascade produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionStage {
    /// Model reply parsed and resolved against the catalog.
    Primary,
    /// Model path failed; degraded keyword heuristic answered.
    Fallback,
    /// Both steps failed.
    Failed,
}

/// Outcome of one LLM-backed scoring call, with the stage that produced it.
#[derive(Debug)]
pub struct ScoringOutcome {
    pub stage: PredictionStage,
    pub predictions: Vec<PredictionResult>,
    /// Why the primary step was abandoned, when it was.
    pub primary_error: Option<DiagnosisError>,
    /// Why the fallback step failed, when it did.
    pub fallback_error: Option<DiagnosisError>,
}

impl ScoringOutcome {
    pub fn into_result(self) -> Result<Vec<PredictionResult>, DiagnosisError> {
        match (self.stage, self.primary_error, self.fallback_error) {
            (PredictionStage::Failed, Some(primary), Some(fallback)) => {
                Err(DiagnosisError::FallbackFailed {
                    primary: Box::new(primary),
                    fallback: Box::new(fallback),
                })
            }
            _ => Ok(self.predictions),
        }
    }
}

/// LLM-backed scorer.
///
/// Cascade: Primary (catalog → prompt → model → parse → resolve), then on
/// any failure Fallback (fresh catalog fetch → keyword heuristic), then
/// Failed. No retries; one failed model call goes straight to Fallback.
pub struct LlmScorer<L, C> {
    llm: L,
    catalog: C,
    timeout: Duration,
}

impl<L: LlmClient, C: DiseaseCatalog> LlmScorer<L, C> {
    pub fn new(llm: L, catalog: C) -> Self {
        Self {
            llm,
            catalog,
            timeout: Duration::from_secs(DEFAULT_LLM_TIMEOUT_SECS),
        }
    }

    /// Upper bound on the model call, applied on top of any client timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the full cascade. Never returns early with an error; a failure in
    /// both steps is reported as [`PredictionStage::Failed`].
    pub async fn run(&self, input: &PredictionInput) -> ScoringOutcome {
        let primary_error = match self.primary(input).await {
            Ok(predictions) => {
                tracing::info!(count = predictions.len(), "AI prediction complete");
                return ScoringOutcome {
                    stage: PredictionStage::Primary,
                    predictions,
                    primary_error: None,
                    fallback_error: None,
                };
            }
            Err(e) => e,
        };

        tracing::warn!(error = %primary_error, "AI prediction failed, using fallback heuristic");

        match self.fallback(input) {
            Ok(predictions) => ScoringOutcome {
                stage: PredictionStage::Fallback,
                predictions,
                primary_error: Some(primary_error),
                fallback_error: None,
            },
            Err(e) => {
                tracing::error!(error = %e, "Fallback heuristic failed");
                ScoringOutcome {
                    stage: PredictionStage::Failed,
                    predictions: Vec::new(),
                    primary_error: Some(primary_error),
                    fallback_error: Some(e),
                }
            }
        }
    }

    async fn primary(&self, input: &PredictionInput) -> Result<Vec<PredictionResult>, DiagnosisError> {
        let diseases = self.catalog.fetch_all()?;
        let context = build_disease_context(&diseases);
        let prompt = build_prediction_prompt(input, &context);
        tracing::debug!(prompt_chars = prompt.len(), diseases = diseases.len(), "Sending diagnosis prompt");

        let reply = tokio::time::timeout(self.timeout, self.llm.complete(DIAGNOSIS_SYSTEM_PROMPT, &prompt))
            .await
            .map_err(|_| DiagnosisError::Timeout(self.timeout))??;

        let parsed = parse_diagnosis_response(&reply)?;
        Ok(resolve_predictions(parsed, &diseases))
    }

    fn fallback(&self, input: &PredictionInput) -> Result<Vec<PredictionResult>, DiagnosisError> {
        let diseases = self.catalog.fetch_all()?;
        Ok(fallback_predictions(&diseases, input))
    }
}

impl<L: LlmClient, C: DiseaseCatalog> Predictor for LlmScorer<L, C> {
    async fn predict(&self, input: &PredictionInput) -> Result<Vec<PredictionResult>, DiagnosisError> {
        self.run(input).await.into_result()
    }
}

/// Turn parsed model output into results, keeping only diseases present in
/// `diseases` (exact name match). Repeated names keep their first entry.
pub fn resolve_predictions(parsed: ParsedDiagnosis, diseases: &[Disease]) -> Vec<PredictionResult> {
    let mut seen = HashSet::new();
    let mut predictions: Vec<PredictionResult> = parsed
        .predictions
        .into_iter()
        .filter_map(|raw| {
            let Some(disease) = find_by_name(diseases, &raw.disease_name) else {
                tracing::warn!(disease = %raw.disease_name, "Model predicted disease absent from catalog, dropping");
                return None;
            };
            if !seen.insert(disease.id) {
                tracing::debug!(disease = %disease.name, "Duplicate model prediction, keeping first");
                return None;
            }

            let confidence = clamp_confidence(raw.confidence);
            Some(PredictionResult {
                disease_id: disease.id,
                disease_name: disease.name.clone(),
                confidence,
                confidence_interval: ConfidenceInterval::around(confidence),
                reasoning: raw.reasoning,
                risk_factors: raw.risk_factors,
                recommendations: raw.recommendations,
                ai_explanation: Some(parsed.ai_explanation.clone()),
            })
        })
        .collect();

    sort_by_confidence(&mut predictions);
    predictions
}
