use serde::{Deserialize, Serialize};

/// Returned when a string does not name any variant of a `str_enum!` type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid {field} value: {value}")]
pub struct ParseEnumError {
    pub field: String,
    pub value: String,
}

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

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
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ParseEnumError {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Scenario {
    Normal => "normal",
    Tachycardia => "tachycardia",
    Hypotension => "hypotension",
    HypertensiveCrisis => "hypertensive_crisis",
    RespiratoryDistress => "respiratory_distress",
    FeverSepsis => "fever_sepsis",
    Bradycardia => "bradycardia",
    CardiacArrestWarning => "cardiac_arrest_warning",
});

// Declaration order is escalation order: Medium < High < Critical.
str_enum!(AlertSeverity {
    Medium => "medium",
    High => "high",
    Critical => "critical",
});
