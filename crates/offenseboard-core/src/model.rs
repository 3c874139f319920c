use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type RecordId = String;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseLabelError {
    pub kind: &'static str,
    pub value: String,
}

/// Display tone used by the console when rendering a label as a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Neutral,
    Info,
    Success,
    Warning,
    Danger,
}

// Closed label set with a single wire spelling per variant. The wire form is
// also the comparable projection used by equality filters.
macro_rules! label_enum {
    (
        $(#[$meta:meta])* $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ParseLabelError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse::<$name>().map_err(serde::de::Error::custom)
            }
        }
    };
}

label_enum!(OffenseStatus, "offense status" {
    Pending => "Pending",
    Paid => "Paid",
    UnderAppeal => "Under Appeal",
    Overdue => "Overdue",
});

label_enum!(Severity, "severity" {
    Low => "Low",
    Medium => "Medium",
    High => "High",
    Critical => "Critical",
});

label_enum!(OffenseType, "offense type" {
    Speeding => "Speeding",
    RedLight => "Red Light",
    IllegalParking => "Illegal Parking",
    NoSeatbelt => "No Seatbelt",
    PhoneUse => "Phone Use",
    Dui => "DUI",
});

label_enum!(Role, "role" {
    Admin => "Admin",
    Supervisor => "Supervisor",
    Officer => "Officer",
    Clerk => "Clerk",
});

label_enum!(
    /// Console account state of a staff user.
    AccountStatus, "account status" {
    Active => "Active",
    Inactive => "Inactive",
    Suspended => "Suspended",
});

label_enum!(
    /// State of a driver's licence.
    LicenseStatus, "license status" {
    Valid => "Valid",
    Suspended => "Suspended",
    Revoked => "Revoked",
    Expired => "Expired",
});

impl OffenseStatus {
    pub fn badge(&self) -> Tone {
        match self {
            OffenseStatus::Pending => Tone::Warning,
            OffenseStatus::Paid => Tone::Success,
            OffenseStatus::UnderAppeal => Tone::Info,
            OffenseStatus::Overdue => Tone::Danger,
        }
    }
}

impl Severity {
    pub fn badge(&self) -> Tone {
        match self {
            Severity::Low => Tone::Neutral,
            Severity::Medium => Tone::Info,
            Severity::High => Tone::Warning,
            Severity::Critical => Tone::Danger,
        }
    }
}

impl Role {
    pub fn badge(&self) -> Tone {
        match self {
            Role::Admin => Tone::Danger,
            Role::Supervisor => Tone::Warning,
            Role::Officer => Tone::Info,
            Role::Clerk => Tone::Neutral,
        }
    }
}

impl AccountStatus {
    pub fn badge(&self) -> Tone {
        match self {
            AccountStatus::Active => Tone::Success,
            AccountStatus::Inactive => Tone::Neutral,
            AccountStatus::Suspended => Tone::Danger,
        }
    }
}

impl LicenseStatus {
    pub fn badge(&self) -> Tone {
        match self {
            LicenseStatus::Valid => Tone::Success,
            LicenseStatus::Suspended => Tone::Warning,
            LicenseStatus::Revoked => Tone::Danger,
            LicenseStatus::Expired => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    #[serde(default)]
    pub license_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Officer {
    pub name: String,
    pub badge: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offense {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub offense_type: OffenseType,
    pub severity: Severity,
    pub status: OffenseStatus,
    pub driver: Party,
    pub plate: String,
    // unassigned citations (camera captures) have no officer
    #[serde(default)]
    pub officer: Option<Officer>,
    pub location: String,
    pub issued_on: NaiveDate,
    pub fine: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(default)]
    pub last_login: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: RecordId,
    pub name: String,
    pub license_number: String,
    pub plate: String,
    pub license_status: LicenseStatus,
    #[serde(default)]
    pub offense_count: u32,
    #[serde(default)]
    pub outstanding_fines: u32,
}
