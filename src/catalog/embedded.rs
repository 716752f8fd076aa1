use crate::models::enums::SeverityLevel;
use crate::models::Disease;

struct Entry {
    name: &'static str,
    icd_code: &'static str,
    severity: SeverityLevel,
    is_common: bool,
    prevalence: f64,
    description: &'static str,
    treatment: &'static str,
    prevention: &'static str,
}

const EMBEDDED: &[Entry] = &[
    Entry {
        name: "Common Cold",
        icd_code: "J00",
        severity: SeverityLevel::Mild,
        is_common: true,
        prevalence: 0.35,
        description: "Viral infection of the upper respiratory tract with runny nose, sore throat, cough and mild fatigue.",
        treatment: "Rest, fluids and over-the-counter symptom relief.",
        prevention: "Frequent hand washing and avoiding close contact with sick people.",
    },
    Entry {
        name: "Influenza (Flu)",
        icd_code: "J11",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.15,
        description: "Contagious respiratory illness with fever, cough, body aches, headache and fatigue.",
        treatment: "Rest, fluids, antiviral medication when started early.",
        prevention: "Annual influenza vaccination.",
    },
    Entry {
        name: "Hypertension",
        icd_code: "I10",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.30,
        description: "Persistently elevated blood pressure, often silent; may cause headache, dizziness or chest discomfort.",
        treatment: "Lifestyle changes and antihypertensive medication.",
        prevention: "Low-salt diet, regular exercise and weight control.",
    },
    Entry {
        name: "Diabetes Type 2",
        icd_code: "E11",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.10,
        description: "Chronic impairment of blood sugar regulation with excessive thirst, frequent urination and fatigue.",
        treatment: "Diet, exercise, oral medication and insulin when needed.",
        prevention: "Healthy weight, balanced diet and physical activity.",
    },
    Entry {
        name: "Migraine",
        icd_code: "G43",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.12,
        description: "Recurrent headaches of moderate to severe intensity, often with nausea and light sensitivity.",
        treatment: "Pain relief, triptans and preventive medication.",
        prevention: "Identifying and avoiding triggers, regular sleep.",
    },
    Entry {
        name: "Anxiety Disorder",
        icd_code: "F41.1",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.18,
        description: "Persistent excessive worry with restlessness, rapid heartbeat, sleep problems and fatigue.",
        treatment: "Psychotherapy and, when indicated, medication.",
        prevention: "Stress management, exercise and early support.",
    },
    Entry {
        name: "Pneumonia",
        icd_code: "J18.9",
        severity: SeverityLevel::Severe,
        is_common: false,
        prevalence: 0.05,
        description: "Infection inflaming the air sacs of the lungs, with cough, fever, chest pain and shortness of breath.",
        treatment: "Antibiotics or antivirals depending on cause; hospital care when severe.",
        prevention: "Pneumococcal and influenza vaccination, not smoking.",
    },
    Entry {
        name: "Gastroenteritis",
        icd_code: "A09",
        severity: SeverityLevel::Mild,
        is_common: true,
        prevalence: 0.12,
        description: "Inflammation of the stomach and intestines with nausea, vomiting, diarrhea and abdominal pain.",
        treatment: "Oral rehydration and rest.",
        prevention: "Hand hygiene and safe food handling.",
    },
];

/// Conditions seeded into a fresh database on top of the embedded set.
const SEED_EXTRAS: &[Entry] = &[
    Entry {
        name: "Bronchitis",
        icd_code: "J40",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.06,
        description: "Inflammation of the bronchial tubes with persistent cough, mucus and chest discomfort.",
        treatment: "Rest, fluids and cough relief; inhalers for wheezing.",
        prevention: "Avoiding smoke and respiratory irritants.",
    },
    Entry {
        name: "Asthma",
        icd_code: "J45",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.08,
        description: "Chronic airway inflammation with wheezing, shortness of breath and chest tightness.",
        treatment: "Inhaled bronchodilators and corticosteroids.",
        prevention: "Avoiding known triggers and following an action plan.",
    },
    Entry {
        name: "Allergic Rhinitis",
        icd_code: "J30",
        severity: SeverityLevel::Mild,
        is_common: true,
        prevalence: 0.20,
        description: "Allergic inflammation of the nasal passages with sneezing, congestion and runny nose.",
        treatment: "Antihistamines and nasal corticosteroids.",
        prevention: "Reducing allergen exposure.",
    },
    Entry {
        name: "Urinary Tract Infection",
        icd_code: "N39.0",
        severity: SeverityLevel::Moderate,
        is_common: true,
        prevalence: 0.10,
        description: "Bacterial infection of the urinary tract with painful and frequent urination.",
        treatment: "Antibiotics and fluids.",
        prevention: "Adequate hydration and hygiene.",
    },
];

fn to_disease(entry: &Entry) -> Disease {
    let mut disease = Disease::new(entry.name, entry.severity, entry.prevalence);
    disease.icd_code = Some(entry.icd_code.to_string());
    disease.description = Some(entry.description.to_string());
    disease.is_common = entry.is_common;
    disease.treatment_info = Some(entry.treatment.to_string());
    disease.prevention_info = Some(entry.prevention.to_string());
    disease
}

/// The 8 entries served when the catalog store is unreachable.
pub fn embedded_catalog() -> Vec<Disease> {
    EMBEDDED.iter().map(to_disease).collect()
}

/// Rows inserted into an empty catalog database.
pub fn seed_catalog() -> Vec<Disease> {
    EMBEDDED.iter().chain(SEED_EXTRAS).map(to_disease).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn embedded_has_eight_unique_entries() {
        let catalog = embedded_catalog();
        assert_eq!(catalog.len(), 8);
        let names: HashSet<_> = catalog.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), 8);
        assert!(names.contains("Influenza (Flu)"));
        assert!(names.contains("Common Cold"));
    }

    #[test]
    fn seed_extends_embedded() {
        let seed = seed_catalog();
        assert_eq!(seed.len(), EMBEDDED.len() + SEED_EXTRAS.len());
        assert_eq!(&seed[..8], embedded_catalog().as_slice());
    }

    #[test]
    fn prevalence_within_unit_interval() {
        assert!(seed_catalog()
            .iter()
            .all(|d| (0.0..=1.0).contains(&d.prevalence)));
    }
}
