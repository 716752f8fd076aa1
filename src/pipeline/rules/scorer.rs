use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::explain::{build_reasoning, build_recommendations, build_risk_factors};
use super::keywords::{age_bonus, diseases_for_symptom, prevalence_of, DEFAULT_CANDIDATES};
use crate::catalog::{fetch_or_embedded, find_by_name, DiseaseCatalog};
use crate::models::enums::SymptomSeverity;
use crate::models::{
    clamp_confidence, sort_by_confidence, ConfidenceInterval, Disease, PredictionInput,
    PredictionResult,
};
use crate::pipeline::{DiagnosisError, Predictor};

/// Smallest number of candidates selected before capping by candidate count.
const MIN_SELECTION: usize = 3;
/// Extra candidates drawn on top of [`MIN_SELECTION`] (0..=this).
const MAX_EXTRA_SELECTION: usize = 2;

/// Deterministic keyword lookup plus randomized heuristic confidence.
///
/// Never fails: an unreachable catalog store is replaced by the embedded
/// catalog. The random source is injected so tests can pin it.
pub struct RuleBasedScorer<C, R = StdRng> {
    catalog: C,
    rng: Mutex<R>,
}

impl<C: DiseaseCatalog> RuleBasedScorer<C, StdRng> {
    pub fn new(catalog: C) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    pub fn seeded(catalog: C, seed: u64) -> Self {
        Self::with_rng(catalog, StdRng::seed_from_u64(seed))
    }
}

impl<C: DiseaseCatalog, R: Rng + Send> RuleBasedScorer<C, R> {
    pub fn with_rng(catalog: C, rng: R) -> Self {
        Self {
            catalog,
            rng: Mutex::new(rng),
        }
    }

    /// Score `input` against a fresh catalog fetch.
    pub fn score(&self, input: &PredictionInput) -> Vec<PredictionResult> {
        let diseases = fetch_or_embedded(&self.catalog);
        self.score_against(&diseases, input)
    }

    /// Score `input` against an already fetched catalog.
    pub fn score_against(&self, diseases: &[Disease], input: &PredictionInput) -> Vec<PredictionResult> {
        let symptoms = input.normalized_symptoms();
        let candidates = resolve_candidates(diseases, &candidate_names(&symptoms));
        let ranked = rank_by_prevalence(candidates);

        // A poisoned lock only means another scorer panicked mid-draw; the
        // generator state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        let take = selection_size(&mut *rng, ranked.len());
        let mut predictions: Vec<PredictionResult> = ranked
            .into_iter()
            .take(take)
            .map(|disease| {
                let base = rng.gen_range(0.3..0.7);
                let confidence = score_confidence(base, &disease.name, input);
                PredictionResult {
                    disease_id: disease.id,
                    disease_name: disease.name.clone(),
                    confidence,
                    confidence_interval: ConfidenceInterval::around(confidence),
                    reasoning: build_reasoning(disease, input, &symptoms),
                    risk_factors: build_risk_factors(disease, input, &symptoms),
                    recommendations: build_recommendations(disease, confidence),
                    ai_explanation: None,
                }
            })
            .collect();
        drop(rng);

        sort_by_confidence(&mut predictions);

        tracing::debug!(
            symptoms = symptoms.len(),
            predictions = predictions.len(),
            "Rule-based scoring complete"
        );
        predictions
    }
}

impl<C: DiseaseCatalog, R: Rng + Send> Predictor for RuleBasedScorer<C, R> {
    async fn predict(&self, input: &PredictionInput) -> Result<Vec<PredictionResult>, DiagnosisError> {
        Ok(self.score(input))
    }
}

/// Deduplicated disease names for the normalized symptoms, in first-seen
/// order. Falls back to [`DEFAULT_CANDIDATES`] when no symptom matches.
pub fn candidate_names(symptoms: &[String]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for symptom in symptoms {
        for name in diseases_for_symptom(symptom) {
            if !names.contains(name) {
                names.push(*name);
            }
        }
    }

    if names.is_empty() {
        names.extend_from_slice(DEFAULT_CANDIDATES);
    }
    names
}

/// Map candidate names onto catalog rows, dropping names the catalog lacks.
fn resolve_candidates<'a>(diseases: &'a [Disease], names: &[&str]) -> Vec<&'a Disease> {
    names
        .iter()
        .filter_map(|name| {
            let found = find_by_name(diseases, name);
            if found.is_none() {
                tracing::warn!(disease = %name, "Keyword candidate missing from catalog, skipping");
            }
            found
        })
        .collect()
}

/// Higher fixed prevalence first; ties keep candidate order.
fn rank_by_prevalence(mut candidates: Vec<&Disease>) -> Vec<&Disease> {
    candidates.sort_by(|a, b| prevalence_of(&b.name).total_cmp(&prevalence_of(&a.name)));
    candidates
}

/// Randomized 3..=5, capped by the number of candidates.
pub fn selection_size<R: Rng + ?Sized>(rng: &mut R, candidate_count: usize) -> usize {
    let wanted = MIN_SELECTION + rng.gen_range(0..=MAX_EXTRA_SELECTION);
    wanted.min(candidate_count)
}

/// Heuristic confidence for one candidate given its random `base`.
pub fn score_confidence(base: f64, disease_name: &str, input: &PredictionInput) -> f64 {
    let mut confidence = base;

    confidence += (input.symptoms.len() as f64 * 0.05).min(0.2);

    match input.severity {
        SymptomSeverity::Severe => confidence += 0.1,
        SymptomSeverity::Mild => confidence -= 0.1,
        SymptomSeverity::Moderate => {}
    }

    if let Some((threshold, bonus)) = age_bonus(disease_name) {
        if input.age > threshold {
            confidence += bonus;
        }
    }

    clamp_confidence(confidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::FlakyCatalog;
    use crate::catalog::{embedded_catalog, SqliteCatalog, StaticCatalog};
    use crate::models::enums::Gender;
    use crate::models::{MAX_CONFIDENCE, MIN_CONFIDENCE};
    use crate::pipeline::rules::keywords::*;
    use rand::rngs::mock::StepRng;

    fn input(symptoms: &[&str], age: u32, severity: SymptomSeverity) -> PredictionInput {
        PredictionInput {
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
            age,
            gender: Gender::Male,
            duration: "1 week".into(),
            severity,
            additional_notes: None,
        }
    }

    fn names(predictions: &[PredictionResult]) -> Vec<&str> {
        predictions.iter().map(|p| p.disease_name.as_str()).collect()
    }

    fn assert_well_formed(predictions: &[PredictionResult]) {
        for p in predictions {
            assert!((MIN_CONFIDENCE..=MAX_CONFIDENCE).contains(&p.confidence));
            let ci = p.confidence_interval;
            assert!(ci.low >= 0.0 && ci.high <= 1.0);
            assert!(ci.low <= p.confidence && p.confidence <= ci.high);
            assert!(!p.reasoning.is_empty());
            assert!(!p.risk_factors.is_empty());
            assert!(p.recommendations.len() >= 3);
            assert!(p.ai_explanation.is_none());
        }
        assert!(predictions
            .windows(2)
            .all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn candidates_are_deduplicated_in_order() {
        let symptoms = vec!["fever".to_string(), "cough".to_string()];
        assert_eq!(
            candidate_names(&symptoms),
            vec![COMMON_COLD, INFLUENZA, PNEUMONIA, BRONCHITIS]
        );
    }

    #[test]
    fn unmatched_symptoms_use_default_candidates() {
        assert_eq!(candidate_names(&["itching".to_string()]), DEFAULT_CANDIDATES);
        assert_eq!(candidate_names(&[]), DEFAULT_CANDIDATES);
    }

    #[test]
    fn selection_size_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let n = selection_size(&mut rng, 10);
            assert!((3..=5).contains(&n));
        }
        assert_eq!(selection_size(&mut rng, 2), 2);
        assert_eq!(selection_size(&mut rng, 0), 0);
    }

    #[test]
    fn confidence_components() {
        let base_input = input(&["fever", "cough"], 30, SymptomSeverity::Moderate);
        // 0.4 + 2 * 0.05
        assert!((score_confidence(0.4, COMMON_COLD, &base_input) - 0.5).abs() < 1e-9);

        let many = input(&["a", "b", "c", "d", "e", "f"], 30, SymptomSeverity::Moderate);
        // symptom bonus capped at 0.2
        assert!((score_confidence(0.4, COMMON_COLD, &many) - 0.6).abs() < 1e-9);

        let older = input(&["dizziness"], 50, SymptomSeverity::Moderate);
        assert!((score_confidence(0.4, HYPERTENSION, &older) - 0.6).abs() < 1e-9);
        assert!((score_confidence(0.4, DIABETES_TYPE_2, &older) - 0.55).abs() < 1e-9);
    }

    #[test]
    fn confidence_is_clamped() {
        let high = input(&["a", "b", "c", "d"], 70, SymptomSeverity::Severe);
        assert_eq!(score_confidence(0.69, HYPERTENSION, &high), MAX_CONFIDENCE);

        let low = input(&[], 20, SymptomSeverity::Mild);
        assert_eq!(score_confidence(0.1, COMMON_COLD, &low), MIN_CONFIDENCE);
    }

    #[test]
    fn severe_never_scores_below_mild() {
        for base in [0.3, 0.45, 0.5, 0.69] {
            for name in [COMMON_COLD, HYPERTENSION, PNEUMONIA] {
                let severe = score_confidence(base, name, &input(&["fever"], 45, SymptomSeverity::Severe));
                let mild = score_confidence(base, name, &input(&["fever"], 45, SymptomSeverity::Mild));
                assert!(severe >= mild);
            }
        }
    }

    #[test]
    fn severe_run_dominates_mild_run_with_same_seed() {
        let catalog = StaticCatalog::embedded();
        let severe = RuleBasedScorer::seeded(catalog.clone(), 42)
            .score(&input(&["fever", "cough"], 30, SymptomSeverity::Severe));
        let mild = RuleBasedScorer::seeded(catalog, 42)
            .score(&input(&["fever", "cough"], 30, SymptomSeverity::Mild));

        for s in &severe {
            if let Some(m) = mild.iter().find(|m| m.disease_id == s.disease_id) {
                assert!(s.confidence >= m.confidence, "{}", s.disease_name);
            }
        }
    }

    #[test]
    fn stepped_rng_gives_exact_scores() {
        // An all-zero generator draws the minimum: 3 candidates, base 0.3.
        let scorer = RuleBasedScorer::with_rng(StaticCatalog::embedded(), StepRng::new(0, 0));
        let result = scorer.score(&input(&["fever", "cough", "chills"], 30, SymptomSeverity::Moderate));

        assert_eq!(result.len(), 3);
        // 0.3 + 3 * 0.05, identical for every candidate; stable sort keeps
        // prevalence order.
        assert_eq!(names(&result), vec![COMMON_COLD, INFLUENZA, PNEUMONIA]);
        for p in &result {
            assert!((p.confidence - 0.45).abs() < 1e-9);
            assert!((p.confidence_interval.low - 0.35).abs() < 1e-9);
            assert!((p.confidence_interval.high - 0.55).abs() < 1e-9);
        }
    }

    #[test]
    fn matched_input_returns_three_to_five() {
        let scorer = RuleBasedScorer::seeded(SqliteCatalog::open_in_memory().unwrap(), 3);
        for _ in 0..50 {
            let result = scorer.score(&input(
                &["fever", "cough", "fatigue", "nausea"],
                50,
                SymptomSeverity::Moderate,
            ));
            assert!((3..=5).contains(&result.len()));
            assert_well_formed(&result);
        }
    }

    #[test]
    fn unmatched_input_predicts_defaults_only() {
        let scorer = RuleBasedScorer::seeded(StaticCatalog::embedded(), 9);
        for symptoms in [vec![], vec!["itching"], vec!["Fever!"]] {
            let result = scorer.score(&input(&symptoms, 30, SymptomSeverity::Moderate));
            assert_eq!(result.len(), 2);
            assert!(result.iter().all(|p| DEFAULT_CANDIDATES.contains(&p.disease_name.as_str())));
            assert_well_formed(&result);
        }
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        let scorer = RuleBasedScorer::seeded(StaticCatalog::embedded(), 1);
        let result = scorer.score(&input(&["  Sensitivity To Light "], 30, SymptomSeverity::Moderate));
        assert_eq!(names(&result), vec![MIGRAINE]);
    }

    #[test]
    fn headache_scenario() {
        let scorer = RuleBasedScorer::seeded(StaticCatalog::embedded(), 11);
        let inp = PredictionInput {
            symptoms: vec!["headache".into()],
            age: 30,
            gender: Gender::Female,
            duration: "2 days".into(),
            severity: SymptomSeverity::Mild,
            additional_notes: None,
        };
        for _ in 0..20 {
            let result = scorer.score(&inp);
            let mut got = names(&result);
            got.sort();
            assert_eq!(got, vec![COMMON_COLD, INFLUENZA, MIGRAINE]);
            assert_well_formed(&result);
        }
    }

    #[test]
    fn chest_pain_scenario_mentions_disease_names() {
        let scorer = RuleBasedScorer::seeded(StaticCatalog::embedded(), 5);
        let inp = input(&["chest pain", "shortness of breath"], 45, SymptomSeverity::Severe);
        let result = scorer.score(&inp);

        let mut seen = 0;
        for p in &result {
            let text = [p.reasoning.as_slice(), p.risk_factors.as_slice()].concat().join(" ");
            if p.disease_name == PNEUMONIA {
                assert!(text.contains("Pneumonia"));
                seen += 1;
            }
            if p.disease_name == HYPERTENSION {
                assert!(text.contains("Hypertension"));
                assert!(text.contains("Age 45"));
                seen += 1;
            }
        }
        assert_eq!(seen, 2);
        assert_well_formed(&result);
    }

    #[test]
    fn candidates_missing_from_catalog_are_skipped() {
        // Embedded catalog has no Asthma or Bronchitis.
        let scorer = RuleBasedScorer::seeded(StaticCatalog::new(embedded_catalog()), 2);
        let result = scorer.score(&input(&["wheezing"], 30, SymptomSeverity::Moderate));
        assert!(result.is_empty());
    }

    #[test]
    fn unreachable_store_uses_embedded_catalog() {
        let scorer = RuleBasedScorer::seeded(FlakyCatalog::always_down(), 8);
        let result = scorer.score(&input(&["vomiting"], 30, SymptomSeverity::Moderate));
        assert_eq!(names(&result), vec![GASTROENTERITIS]);
    }

    #[test]
    fn catalog_is_refetched_per_call() {
        let catalog = std::sync::Arc::new(FlakyCatalog::new(0, embedded_catalog()));
        let scorer = RuleBasedScorer::seeded(catalog.clone(), 4);
        scorer.score(&input(&["fever"], 30, SymptomSeverity::Moderate));
        scorer.score(&input(&["fever"], 30, SymptomSeverity::Moderate));
        assert_eq!(catalog.calls(), 2);
    }

    #[tokio::test]
    async fn predict_wraps_score() {
        let scorer = RuleBasedScorer::seeded(StaticCatalog::embedded(), 11);
        let result = scorer
            .predict(&input(&["headache"], 30, SymptomSeverity::Moderate))
            .await
            .unwrap();
        assert_eq!(result.len(), 3);
        assert_well_formed(&result);
    }
}
