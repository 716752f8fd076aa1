use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::enums::{PredictionSource, SeverityLevel};
use crate::models::{ConfidenceInterval, Disease, PredictionResult};

// ═══════════════════════════════════════════
// Disease Repository
// ═══════════════════════════════════════════

const DISEASE_COLUMNS: &str = "id, name, description, icd_code, severity_level, is_common,
     prevalence, treatment_info, prevention_info";

pub fn insert_disease(conn: &Connection, disease: &Disease) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO diseases (id, name, description, icd_code, severity_level, is_common,
         prevalence, treatment_info, prevention_info)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            disease.id.to_string(),
            disease.name,
            disease.description,
            disease.icd_code,
            disease.severity_level.as_str(),
            disease.is_common as i32,
            disease.prevalence,
            disease.treatment_info,
            disease.prevention_info,
        ],
    )?;
    Ok(())
}

/// All catalog rows, ordered by name.
pub fn list_diseases(conn: &Connection) -> Result<Vec<Disease>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DISEASE_COLUMNS} FROM diseases ORDER BY name"
    ))?;

    let rows = stmt
        .query_map([], read_disease_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(disease_from_row).collect()
}

pub fn count_diseases(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM diseases", [], |row| row.get(0))?;
    Ok(count)
}

// Internal row type for Disease mapping
struct DiseaseRow {
    id: String,
    name: String,
    description: Option<String>,
    icd_code: Option<String>,
    severity_level: String,
    is_common: i32,
    prevalence: f64,
    treatment_info: Option<String>,
    prevention_info: Option<String>,
}

fn read_disease_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DiseaseRow> {
    Ok(DiseaseRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        icd_code: row.get(3)?,
        severity_level: row.get(4)?,
        is_common: row.get(5)?,
        prevalence: row.get(6)?,
        treatment_info: row.get(7)?,
        prevention_info: row.get(8)?,
    })
}

fn disease_from_row(row: DiseaseRow) -> Result<Disease, DatabaseError> {
    Ok(Disease {
        id: parse_uuid(&row.id)?,
        name: row.name,
        description: row.description,
        icd_code: row.icd_code,
        severity_level: SeverityLevel::from_str(&row.severity_level)?,
        is_common: row.is_common != 0,
        prevalence: row.prevalence,
        treatment_info: row.treatment_info,
        prevention_info: row.prevention_info,
    })
}

// ═══════════════════════════════════════════
// Diagnosis Prediction Repository
// ═══════════════════════════════════════════

/// Persist one scorer's ranked output for a diagnosis session.
/// Replaces any rows already stored for the same session and source.
pub fn save_session_predictions(
    conn: &Connection,
    session_id: &Uuid,
    source: PredictionSource,
    predictions: &[PredictionResult],
    created_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    replace_session_predictions(&tx, session_id, source, predictions, created_at)?;
    tx.commit()?;
    Ok(())
}

/// DELETE + INSERT for one session and source, without its own transaction.
/// Callers writing several sources atomically wrap this in theirs.
pub fn replace_session_predictions(
    conn: &Connection,
    session_id: &Uuid,
    source: PredictionSource,
    predictions: &[PredictionResult],
    created_at: NaiveDateTime,
) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM diagnosis_predictions WHERE session_id = ?1 AND source = ?2",
        params![session_id.to_string(), source.as_str()],
    )?;

    let mut stmt = conn.prepare(
        "INSERT INTO diagnosis_predictions (id, session_id, source, rank, disease_id,
         disease_name, confidence, interval_low, interval_high, reasoning, risk_factors,
         recommendations, ai_explanation, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )?;

    for (rank, prediction) in predictions.iter().enumerate() {
        stmt.execute(params![
            Uuid::new_v4().to_string(),
            session_id.to_string(),
            source.as_str(),
            rank as i64,
            prediction.disease_id.to_string(),
            prediction.disease_name,
            prediction.confidence,
            prediction.confidence_interval.low,
            prediction.confidence_interval.high,
            to_json_list(&prediction.reasoning)?,
            to_json_list(&prediction.risk_factors)?,
            to_json_list(&prediction.recommendations)?,
            prediction.ai_explanation,
            created_at,
        ])?;
    }

    Ok(())
}

/// Stored predictions for a session and source, in their original rank order.
pub fn list_session_predictions(
    conn: &Connection,
    session_id: &Uuid,
    source: PredictionSource,
) -> Result<Vec<PredictionResult>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT disease_id, disease_name, confidence, interval_low, interval_high,
         reasoning, risk_factors, recommendations, ai_explanation
         FROM diagnosis_predictions WHERE session_id = ?1 AND source = ?2
         ORDER BY rank",
    )?;

    let rows = stmt
        .query_map(params![session_id.to_string(), source.as_str()], |row| {
            Ok(PredictionRow {
                disease_id: row.get(0)?,
                disease_name: row.get(1)?,
                confidence: row.get(2)?,
                interval_low: row.get(3)?,
                interval_high: row.get(4)?,
                reasoning: row.get(5)?,
                risk_factors: row.get(6)?,
                recommendations: row.get(7)?,
                ai_explanation: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter().map(prediction_from_row).collect()
}

struct PredictionRow {
    disease_id: String,
    disease_name: String,
    confidence: f64,
    interval_low: f64,
    interval_high: f64,
    reasoning: String,
    risk_factors: String,
    recommendations: String,
    ai_explanation: Option<String>,
}

fn prediction_from_row(row: PredictionRow) -> Result<PredictionResult, DatabaseError> {
    Ok(PredictionResult {
        disease_id: parse_uuid(&row.disease_id)?,
        disease_name: row.disease_name,
        confidence: row.confidence,
        confidence_interval: ConfidenceInterval {
            low: row.interval_low,
            high: row.interval_high,
        },
        reasoning: from_json_list(&row.reasoning)?,
        risk_factors: from_json_list(&row.risk_factors)?,
        recommendations: from_json_list(&row.recommendations)?,
        ai_explanation: row.ai_explanation,
    })
}

fn parse_uuid(raw: &str) -> Result<Uuid, DatabaseError> {
    Uuid::parse_str(raw).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

fn to_json_list(items: &[String]) -> Result<String, DatabaseError> {
    serde_json::to_string(items).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}

fn from_json_list(raw: &str) -> Result<Vec<String>, DatabaseError> {
    serde_json::from_str(raw).map_err(|e| DatabaseError::ConstraintViolation(e.to_string()))
}
