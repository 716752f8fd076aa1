pub mod rules; // Rule-based differential scorer
pub mod ai; // LLM-backed scorer with degraded-mode fallback
pub mod session; // Runs both pathways and merges their output

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::models::{PredictionInput, PredictionResult};

pub use ai::LlmError;

#[derive(Error, Debug)]
pub enum DiagnosisError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Language model error: {0}")]
    Llm(#[from] LlmError),

    #[error("Language model call exceeded {0:?}")]
    Timeout(Duration),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("AI prediction failed ({primary}) and fallback failed ({fallback})")]
    FallbackFailed {
        primary: Box<DiagnosisError>,
        fallback: Box<DiagnosisError>,
    },
}

/// A diagnosis pathway: one self-contained call per request, no state
/// carried between calls.
pub trait Predictor {
    fn predict(
        &self,
        input: &PredictionInput,
    ) -> impl Future<Output = Result<Vec<PredictionResult>, DiagnosisError>> + Send;
}
