//! One diagnosis session: both pathways over the same input, side by side,
//! plus a merged ranking.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rand::Rng;
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

use super::ai::{LlmClient, LlmScorer, PredictionStage};
use super::rules::RuleBasedScorer;
use crate::catalog::DiseaseCatalog;
use crate::db::{replace_session_predictions, DatabaseError};
use crate::models::enums::PredictionSource;
use crate::models::{
    clamp_confidence, sort_by_confidence, ConfidenceInterval, PredictionInput, PredictionResult,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisSession {
    pub id: Uuid,
    pub created_at: NaiveDateTime,
    pub input: PredictionInput,
    pub rule_based: Vec<PredictionResult>,
    pub ai: Vec<PredictionResult>,
    pub ai_stage: PredictionStage,
    /// Why the AI pathway degraded or failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
    pub merged: Vec<PredictionResult>,
}

impl DiagnosisSession {
    /// Run both scorers concurrently and merge their output. A failed AI
    /// pathway leaves `ai` empty and records the cause in `ai_error`.
    ///
    /// The rule pass reads the catalog synchronously, so it runs on the
    /// blocking pool while the model call is in flight.
    pub async fn run<RC, R, L, AC>(
        rules: &Arc<RuleBasedScorer<RC, R>>,
        llm: &LlmScorer<L, AC>,
        input: PredictionInput,
    ) -> Self
    where
        RC: DiseaseCatalog + 'static,
        R: Rng + Send + 'static,
        L: LlmClient,
        AC: DiseaseCatalog,
    {
        let id = Uuid::new_v4();
        tracing::info!(session = %id, symptoms = input.symptoms.len(), "Diagnosis session started");

        let rule_task = {
            let rules = Arc::clone(rules);
            let input = input.clone();
            tokio::task::spawn_blocking(move || rules.score(&input))
        };
        let (rule_based, outcome) = tokio::join!(rule_task, llm.run(&input));
        let rule_based = rule_based.unwrap_or_else(|e| {
            tracing::error!(session = %id, error = %e, "Rule-based scoring task failed");
            Vec::new()
        });

        let ai_stage = outcome.stage;
        let (ai, ai_error) = match ai_stage {
            PredictionStage::Primary => (outcome.predictions, None),
            PredictionStage::Fallback => {
                let reason = outcome.primary_error.as_ref().map(ToString::to_string);
                (outcome.predictions, reason)
            }
            PredictionStage::Failed => (Vec::new(), outcome.into_result().err().map(|e| e.to_string())),
        };

        let merged = merge_predictions(&rule_based, &ai);

        tracing::info!(
            session = %id,
            stage = ?ai_stage,
            rule_based = rule_based.len(),
            ai = ai.len(),
            merged = merged.len(),
            "Diagnosis session complete"
        );

        Self {
            id,
            created_at: chrono::Local::now().naive_local(),
            input,
            rule_based,
            ai,
            ai_stage,
            ai_error,
            merged,
        }
    }

    /// Store all three lists under this session's id in one transaction;
    /// on error nothing from this call is kept.
    pub fn persist(&self, conn: &Connection) -> Result<(), DatabaseError> {
        let tx = conn.unchecked_transaction()?;
        for (source, predictions) in [
            (PredictionSource::RuleBased, &self.rule_based),
            (PredictionSource::Ai, &self.ai),
            (PredictionSource::Merged, &self.merged),
        ] {
            replace_session_predictions(&tx, &self.id, source, predictions, self.created_at)?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Combine both lists by disease id. Diseases found by both pathways get the
/// mean confidence and the union of their texts; the rest pass through.
/// Intervals are recomputed and the result sorted by confidence.
pub fn merge_predictions(
    rule_based: &[PredictionResult],
    ai: &[PredictionResult],
) -> Vec<PredictionResult> {
    let mut merged: Vec<PredictionResult> = Vec::new();
    let mut index: HashMap<Uuid, usize> = HashMap::new();

    for prediction in rule_based.iter().chain(ai) {
        match index.get(&prediction.disease_id) {
            Some(&i) => {
                let entry = &mut merged[i];
                entry.confidence = clamp_confidence((entry.confidence + prediction.confidence) / 2.0);
                extend_unique(&mut entry.reasoning, &prediction.reasoning);
                extend_unique(&mut entry.risk_factors, &prediction.risk_factors);
                extend_unique(&mut entry.recommendations, &prediction.recommendations);
                if entry.ai_explanation.is_none() {
                    entry.ai_explanation = prediction.ai_explanation.clone();
                }
            }
            None => {
                index.insert(prediction.disease_id, merged.len());
                merged.push(prediction.clone());
            }
        }
    }

    for entry in &mut merged {
        entry.confidence_interval = ConfidenceInterval::around(entry.confidence);
    }
    sort_by_confidence(&mut merged);
    merged
}

fn extend_unique(target: &mut Vec<String>, items: &[String]) {
    for item in items {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}
