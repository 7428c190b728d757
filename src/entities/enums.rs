//! Enumerazioni - Tipi enumerati utilizzati nelle entità
//!
//! Nel database sono salvati come VARCHAR con il valore testuale di `as_str()`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Valore testuale che non corrisponde a nessuna variante
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(#[serde(rename = $value)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = UnknownVariant;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

string_enum! {
    /// Ruolo dell'utente, discrimina gli accessi alle route
    Role {
        Student => "student",
        Consultant => "consultant",
        Admin => "admin",
    }
}

string_enum! {
    /// Tipologia dei lead raccolti nella tabella `leads`
    LeadKind {
        VisitVisa => "visit-visa",
        DiscountOffer => "discount-offer",
        OnlineConsultant => "online-consultant",
        Complaint => "complaint",
        Feedback => "feedback",
    }
}

string_enum! {
    LeadStatus {
        New => "new",
        Contacted => "contacted",
        Converted => "converted",
        Closed => "closed",
    }
}

string_enum! {
    UniversityType {
        Public => "public",
        Private => "private",
    }
}

string_enum! {
    CourseLevel {
        Certificate => "certificate",
        Diploma => "diploma",
        Bachelor => "bachelor",
        Master => "master",
        Phd => "phd",
    }
}
