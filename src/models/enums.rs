use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(SeverityLevel {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
    Critical => "critical",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

str_enum!(SymptomSeverity {
    Mild => "mild",
    Moderate => "moderate",
    Severe => "severe",
});

str_enum!(PredictionSource {
    RuleBased => "rule_based",
    Ai => "ai",
    Merged => "merged",
});

impl SymptomSeverity {
    /// Whether a catalog severity tier matches the reported severity.
    /// `Critical` has no reported counterpart and never matches.
    pub fn matches(&self, level: SeverityLevel) -> bool {
        self.as_str() == level.as_str()
    }
}
