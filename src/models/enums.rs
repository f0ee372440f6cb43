use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
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

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidValue {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Booked => "booked",
    Arrived => "arrived",
    Cancelled => "cancelled",
});

str_enum!(ProcedureStatus {
    InProgress => "in-progress",
    Completed => "completed",
});

str_enum!(ParticipationStatus {
    Accepted => "accepted",
    Declined => "declined",
    Tentative => "tentative",
});

str_enum!(ContactSystem {
    Phone => "phone",
    Email => "email",
});

str_enum!(IdentifierUse {
    Official => "official",
    Usual => "usual",
});
