use crate::errors::Result;
use crate::model::{
    AccountStatus, Driver, LicenseStatus, Offense, OffenseStatus, OffenseType, Officer, Party,
    Role, Severity, User,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Collections the console lists, in the JSON fixture layout.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub offenses: Vec<Offense>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn officer(name: &str, badge: &str) -> Option<Officer> {
    Some(Officer {
        name: name.to_string(),
        badge: badge.to_string(),
    })
}

fn party(name: &str, license: &str) -> Party {
    Party {
        name: name.to_string(),
        license_number: Some(license.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn offense(
    id: &str,
    offense_type: OffenseType,
    severity: Severity,
    status: OffenseStatus,
    driver: Party,
    plate: &str,
    officer: Option<Officer>,
    location: &str,
    issued_on: NaiveDate,
    fine: u32,
) -> Offense {
    Offense {
        id: id.to_string(),
        offense_type,
        severity,
        status,
        driver,
        plate: plate.to_string(),
        officer,
        location: location.to_string(),
        issued_on,
        fine,
    }
}

fn user(id: &str, name: &str, email: &str, role: Role, status: AccountStatus) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        status,
        last_login: None,
    }
}

fn driver(
    id: &str,
    name: &str,
    license_number: &str,
    plate: &str,
    license_status: LicenseStatus,
    offense_count: u32,
    outstanding_fines: u32,
) -> Driver {
    Driver {
        id: id.to_string(),
        name: name.to_string(),
        license_number: license_number.to_string(),
        plate: plate.to_string(),
        license_status,
        offense_count,
        outstanding_fines,
    }
}

impl Dataset {
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Built-in demo data served when no fixture file is configured.
    pub fn sample() -> Self {
        let offenses = vec![
            offense(
                "OFF-2023-0456",
                OffenseType::Speeding,
                Severity::High,
                OffenseStatus::Pending,
                party("John Smith", "DL-48213"),
                "ABC-1234",
                officer("Sarah Johnson", "B-1021"),
                "Highway 101, Mile 42",
                day(2023, 10, 15),
                250,
            ),
            offense(
                "OFF-2023-0455",
                OffenseType::RedLight,
                Severity::Medium,
                OffenseStatus::UnderAppeal,
                party("Emily Davis", "DL-55102"),
                "XYZ-7890",
                officer("Michael Brown", "B-1034"),
                "Main St & 5th Ave",
                day(2023, 10, 14),
                150,
            ),
            offense(
                "OFF-2023-0454",
                OffenseType::IllegalParking,
                Severity::Low,
                OffenseStatus::Paid,
                party("Robert Wilson", "DL-39877"),
                "LMN-4567",
                officer("David Martinez", "B-1047"),
                "Downtown Plaza",
                day(2023, 10, 13),
                75,
            ),
            offense(
                "OFF-2023-0453",
                OffenseType::NoSeatbelt,
                Severity::Medium,
                OffenseStatus::Overdue,
                party("Sarah Johnson", "DL-60234"),
                "QRS-2345",
                officer("Michael Brown", "B-1034"),
                "Oak Street",
                day(2023, 10, 12),
                120,
            ),
            offense(
                "OFF-2023-0452",
                OffenseType::PhoneUse,
                Severity::Medium,
                OffenseStatus::Paid,
                party("Michael Chen", "DL-71345"),
                "TUV-6789",
                officer("David Martinez", "B-1047"),
                "Elm Avenue",
                day(2023, 10, 11),
                100,
            ),
        ];
        let users = vec![
            user(
                "USR-001",
                "Alice Carter",
                "alice.carter@traffic.gov",
                Role::Admin,
                AccountStatus::Active,
            ),
            user(
                "USR-002",
                "Sarah Johnson",
                "sarah.johnson@traffic.gov",
                Role::Officer,
                AccountStatus::Active,
            ),
            user(
                "USR-003",
                "Michael Brown",
                "michael.brown@traffic.gov",
                Role::Officer,
                AccountStatus::Inactive,
            ),
            user(
                "USR-004",
                "Priya Patel",
                "priya.patel@traffic.gov",
                Role::Supervisor,
                AccountStatus::Active,
            ),
            user(
                "USR-005",
                "Tom Nguyen",
                "tom.nguyen@traffic.gov",
                Role::Clerk,
                AccountStatus::Suspended,
            ),
        ];
        let drivers = vec![
            driver(
                "DRV-1001",
                "John Smith",
                "DL-48213",
                "ABC-1234",
                LicenseStatus::Valid,
                3,
                250,
            ),
            driver(
                "DRV-1002",
                "Emily Davis",
                "DL-55102",
                "XYZ-7890",
                LicenseStatus::Expired,
                1,
                150,
            ),
            driver(
                "DRV-1003",
                "Robert Wilson",
                "DL-39877",
                "LMN-4567",
                LicenseStatus::Valid,
                1,
                0,
            ),
            driver(
                "DRV-1004",
                "Sarah Johnson",
                "DL-60234",
                "QRS-2345",
                LicenseStatus::Suspended,
                4,
                120,
            ),
            driver(
                "DRV-1005",
                "Michael Chen",
                "DL-71345",
                "TUV-6789",
                LicenseStatus::Revoked,
                6,
                0,
            ),
        ];
        Self {
            offenses,
            users,
            drivers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_survives_json() {
        let sample = Dataset::sample();
        let raw = serde_json::to_string(&sample).unwrap();
        assert_eq!(Dataset::from_json(&raw).unwrap(), sample);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let ds = Dataset::from_json(r#"{"users":[]}"#).unwrap();
        assert!(ds.offenses.is_empty());
        assert!(ds.drivers.is_empty());
    }

    #[test]
    fn malformed_fixture_is_invalid() {
        let err = Dataset::from_json("{").unwrap_err();
        assert!(matches!(err, crate::ConsoleError::Invalid(_)));
    }
}
