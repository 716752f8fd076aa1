//! Static symptom→disease lookup data for the rule-based scorer.
//!
//! Keys are lower-case symptom labels matched exactly; values are catalog
//! display names. A name missing from the live catalog is skipped at
//! scoring time.

pub const COMMON_COLD: &str = "Common Cold";
pub const INFLUENZA: &str = "Influenza (Flu)";
pub const HYPERTENSION: &str = "Hypertension";
pub const DIABETES_TYPE_2: &str = "Diabetes Type 2";
pub const MIGRAINE: &str = "Migraine";
pub const ANXIETY_DISORDER: &str = "Anxiety Disorder";
pub const PNEUMONIA: &str = "Pneumonia";
pub const GASTROENTERITIS: &str = "Gastroenteritis";
pub const BRONCHITIS: &str = "Bronchitis";
pub const ASTHMA: &str = "Asthma";
pub const ALLERGIC_RHINITIS: &str = "Allergic Rhinitis";
pub const URINARY_TRACT_INFECTION: &str = "Urinary Tract Infection";

/// Candidates used when no reported symptom hits the table.
pub const DEFAULT_CANDIDATES: &[&str] = &[COMMON_COLD, INFLUENZA];

/// Ranking weight for names missing from [`PREVALENCE`].
pub const DEFAULT_PREVALENCE: f64 = 0.1;

/// Diseases whose confidence rises past an age threshold: (name, age, bonus).
const AGE_SENSITIVE: &[(&str, u32, f64)] = &[(HYPERTENSION, 40, 0.15), (DIABETES_TYPE_2, 35, 0.10)];

pub const SYMPTOM_TABLE: &[(&str, &[&str])] = &[
    ("fever", &[COMMON_COLD, INFLUENZA, PNEUMONIA]),
    ("cough", &[COMMON_COLD, INFLUENZA, PNEUMONIA, BRONCHITIS]),
    ("headache", &[MIGRAINE, INFLUENZA, COMMON_COLD]),
    ("sore throat", &[COMMON_COLD, INFLUENZA]),
    ("runny nose", &[COMMON_COLD, ALLERGIC_RHINITIS]),
    ("sneezing", &[COMMON_COLD, ALLERGIC_RHINITIS]),
    ("congestion", &[COMMON_COLD, ALLERGIC_RHINITIS]),
    ("fatigue", &[INFLUENZA, DIABETES_TYPE_2, ANXIETY_DISORDER]),
    ("body aches", &[INFLUENZA]),
    ("muscle pain", &[INFLUENZA]),
    ("chills", &[INFLUENZA, PNEUMONIA]),
    ("nausea", &[GASTROENTERITIS, MIGRAINE]),
    ("vomiting", &[GASTROENTERITIS]),
    ("diarrhea", &[GASTROENTERITIS]),
    ("abdominal pain", &[GASTROENTERITIS]),
    ("chest pain", &[PNEUMONIA, HYPERTENSION, ANXIETY_DISORDER]),
    ("shortness of breath", &[PNEUMONIA, ASTHMA, ANXIETY_DISORDER]),
    ("wheezing", &[ASTHMA, BRONCHITIS]),
    ("dizziness", &[HYPERTENSION, ANXIETY_DISORDER]),
    ("blurred vision", &[HYPERTENSION, DIABETES_TYPE_2]),
    ("sensitivity to light", &[MIGRAINE]),
    ("excessive thirst", &[DIABETES_TYPE_2]),
    ("frequent urination", &[DIABETES_TYPE_2, URINARY_TRACT_INFECTION]),
    ("painful urination", &[URINARY_TRACT_INFECTION]),
    ("rapid heartbeat", &[ANXIETY_DISORDER, HYPERTENSION]),
    ("restlessness", &[ANXIETY_DISORDER]),
    ("insomnia", &[ANXIETY_DISORDER]),
];

const PREVALENCE: &[(&str, f64)] = &[
    (COMMON_COLD, 0.35),
    (HYPERTENSION, 0.30),
    (ALLERGIC_RHINITIS, 0.25),
    (INFLUENZA, 0.20),
    (ANXIETY_DISORDER, 0.18),
    (MIGRAINE, 0.15),
    (GASTROENTERITIS, 0.12),
    (DIABETES_TYPE_2, 0.10),
    (URINARY_TRACT_INFECTION, 0.10),
    (ASTHMA, 0.08),
    (BRONCHITIS, 0.06),
    (PNEUMONIA, 0.05),
];

const DISEASE_ADVICE: &[(&str, &[&str])] = &[
    (COMMON_COLD, &["Get plenty of rest", "Stay hydrated with warm fluids"]),
    (
        INFLUENZA,
        &[
            "Rest at home to avoid spreading the infection",
            "Stay hydrated",
            "Ask a doctor about antiviral treatment if symptoms began within 48 hours",
        ],
    ),
    (
        HYPERTENSION,
        &[
            "Monitor your blood pressure regularly",
            "Reduce salt intake and limit alcohol",
            "Schedule a follow-up to review cardiovascular risk",
        ],
    ),
    (
        DIABETES_TYPE_2,
        &[
            "Request a blood glucose or HbA1c test",
            "Follow a balanced diet low in refined sugar",
        ],
    ),
    (
        MIGRAINE,
        &[
            "Rest in a quiet, dark room during attacks",
            "Keep a headache diary to identify triggers",
        ],
    ),
    (
        ANXIETY_DISORDER,
        &[
            "Practice relaxation and breathing techniques",
            "Consider speaking with a mental health professional",
        ],
    ),
    (
        PNEUMONIA,
        &[
            "Seek prompt medical evaluation; a chest X-ray may be needed",
            "Rest and stay hydrated",
        ],
    ),
    (
        GASTROENTERITIS,
        &["Drink oral rehydration fluids", "Eat bland foods as tolerated"],
    ),
    (
        BRONCHITIS,
        &["Avoid smoke and other airway irritants", "Use a humidifier and rest"],
    ),
    (
        ASTHMA,
        &["Keep a rescue inhaler available", "Avoid known triggers"],
    ),
    (
        ALLERGIC_RHINITIS,
        &["Limit exposure to known allergens", "Ask a pharmacist about antihistamines"],
    ),
    (
        URINARY_TRACT_INFECTION,
        &["Drink plenty of water", "Get a urine test to confirm infection"],
    ),
];

/// Diseases associated with an already lower-cased symptom label.
pub fn diseases_for_symptom(symptom: &str) -> &'static [&'static str] {
    SYMPTOM_TABLE
        .iter()
        .find(|(keyword, _)| *keyword == symptom)
        .map(|(_, diseases)| *diseases)
        .unwrap_or(&[])
}

/// Fixed ranking weight for a disease name.
pub fn prevalence_of(name: &str) -> f64 {
    PREVALENCE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, p)| *p)
        .unwrap_or(DEFAULT_PREVALENCE)
}

/// Age threshold (exclusive) and confidence bonus for age-sensitive diseases.
pub fn age_bonus(name: &str) -> Option<(u32, f64)> {
    AGE_SENSITIVE
        .iter()
        .find(|(n, _, _)| *n == name)
        .map(|(_, age, bonus)| (*age, *bonus))
}

/// Disease-specific advice lines (empty for unknown names).
pub fn advice_for(name: &str) -> &'static [&'static str] {
    DISEASE_ADVICE
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, advice)| *advice)
        .unwrap_or(&[])
}
