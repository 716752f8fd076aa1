use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::SeverityLevel;

/// Namespace for name-derived disease ids, so the embedded catalog and the
/// seeded database agree on identifiers.
const DISEASE_NAMESPACE: Uuid = Uuid::from_u128(0x6d1c_2b8e_4f0a_4c51_9a7e_d1a9_05e3_c0de);

/// Catalog entry. Read-only to the scorers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub icd_code: Option<String>,
    pub severity_level: SeverityLevel,
    pub is_common: bool,
    /// Prevalence estimate in [0, 1].
    pub prevalence: f64,
    pub treatment_info: Option<String>,
    pub prevention_info: Option<String>,
}

impl Disease {
    /// Minimal entry with a name-derived id; optional fields left empty.
    pub fn new(name: &str, severity_level: SeverityLevel, prevalence: f64) -> Self {
        Self {
            id: disease_id_for(name),
            name: name.to_string(),
            description: None,
            icd_code: None,
            severity_level,
            is_common: false,
            prevalence: prevalence.clamp(0.0, 1.0),
            treatment_info: None,
            prevention_info: None,
        }
    }
}

/// Stable id for a disease name.
pub fn disease_id_for(name: &str) -> Uuid {
    Uuid::new_v5(&DISEASE_NAMESPACE, name.as_bytes())
}
