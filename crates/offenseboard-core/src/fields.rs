//! Record adapters for the console entities.

use crate::model::{
    AccountStatus, Driver, LicenseStatus, Offense, OffenseStatus, Role, Severity, User,
};
use crate::query::{Predicate, Record, SearchField};

fn offense_id(o: &Offense) -> Option<&str> {
    Some(&o.id)
}

fn offense_driver(o: &Offense) -> Option<&str> {
    Some(&o.driver.name)
}

fn offense_plate(o: &Offense) -> Option<&str> {
    Some(&o.plate)
}

fn offense_officer(o: &Offense) -> Option<&str> {
    o.officer.as_ref().map(|p| p.name.as_str())
}

impl Record for Offense {
    const FILTER_KEYS: &'static [&'static str] = &["status", "severity", "type"];

    fn filter_value(&self, key: &str) -> Option<&str> {
        match key {
            "status" => Some(self.status.as_str()),
            "severity" => Some(self.severity.as_str()),
            "type" => Some(self.offense_type.as_str()),
            _ => None,
        }
    }

    fn searchable_fields() -> Vec<SearchField<Self>> {
        vec![
            SearchField {
                name: "id",
                get: offense_id,
            },
            SearchField {
                name: "driver.name",
                get: offense_driver,
            },
            SearchField {
                name: "plate",
                get: offense_plate,
            },
            SearchField {
                name: "officer.name",
                get: offense_officer,
            },
        ]
    }

    fn statistics() -> Vec<Predicate<Self>> {
        vec![
            Predicate {
                label: "pendingPayments",
                test: |o: &Offense| o.status == OffenseStatus::Pending,
            },
            Predicate {
                label: "underAppeal",
                test: |o: &Offense| o.status == OffenseStatus::UnderAppeal,
            },
            Predicate {
                label: "overdue",
                test: |o: &Offense| o.status == OffenseStatus::Overdue,
            },
            Predicate {
                label: "paid",
                test: |o: &Offense| o.status == OffenseStatus::Paid,
            },
        ]
    }
}

impl Offense {
    /// Independent per-severity tallies for the dashboard cards.
    pub fn severity_statistics() -> Vec<Predicate<Self>> {
        vec![
            Predicate {
                label: "low",
                test: |o: &Offense| o.severity == Severity::Low,
            },
            Predicate {
                label: "medium",
                test: |o: &Offense| o.severity == Severity::Medium,
            },
            Predicate {
                label: "high",
                test: |o: &Offense| o.severity == Severity::High,
            },
            Predicate {
                label: "critical",
                test: |o: &Offense| o.severity == Severity::Critical,
            },
        ]
    }
}

fn user_id(u: &User) -> Option<&str> {
    Some(&u.id)
}

fn user_name(u: &User) -> Option<&str> {
    Some(&u.name)
}

fn user_email(u: &User) -> Option<&str> {
    Some(&u.email)
}

impl Record for User {
    const FILTER_KEYS: &'static [&'static str] = &["status", "role"];

    fn filter_value(&self, key: &str) -> Option<&str> {
        match key {
            "status" => Some(self.status.as_str()),
            "role" => Some(self.role.as_str()),
            _ => None,
        }
    }

    fn searchable_fields() -> Vec<SearchField<Self>> {
        vec![
            SearchField {
                name: "name",
                get: user_name,
            },
            SearchField {
                name: "email",
                get: user_email,
            },
            SearchField {
                name: "id",
                get: user_id,
            },
        ]
    }

    fn statistics() -> Vec<Predicate<Self>> {
        vec![
            Predicate {
                label: "active",
                test: |u: &User| u.status == AccountStatus::Active,
            },
            Predicate {
                label: "inactive",
                test: |u: &User| u.status == AccountStatus::Inactive,
            },
            Predicate {
                label: "suspended",
                test: |u: &User| u.status == AccountStatus::Suspended,
            },
            Predicate {
                label: "officers",
                test: |u: &User| u.role == Role::Officer,
            },
            Predicate {
                label: "admins",
                test: |u: &User| u.role == Role::Admin,
            },
        ]
    }
}

fn driver_name(d: &Driver) -> Option<&str> {
    Some(&d.name)
}

fn driver_license(d: &Driver) -> Option<&str> {
    Some(&d.license_number)
}

fn driver_plate(d: &Driver) -> Option<&str> {
    Some(&d.plate)
}

impl Record for Driver {
    const FILTER_KEYS: &'static [&'static str] = &["status"];

    fn filter_value(&self, key: &str) -> Option<&str> {
        match key {
            "status" => Some(self.license_status.as_str()),
            _ => None,
        }
    }

    fn searchable_fields() -> Vec<SearchField<Self>> {
        vec![
            SearchField {
                name: "name",
                get: driver_name,
            },
            SearchField {
                name: "license_number",
                get: driver_license,
            },
            SearchField {
                name: "plate",
                get: driver_plate,
            },
        ]
    }

    fn statistics() -> Vec<Predicate<Self>> {
        vec![
            Predicate {
                label: "valid",
                test: |d: &Driver| d.license_status == LicenseStatus::Valid,
            },
            Predicate {
                label: "suspended",
                test: |d: &Driver| d.license_status == LicenseStatus::Suspended,
            },
            Predicate {
                label: "revoked",
                test: |d: &Driver| d.license_status == LicenseStatus::Revoked,
            },
            Predicate {
                label: "expired",
                test: |d: &Driver| d.license_status == LicenseStatus::Expired,
            },
            Predicate {
                label: "withOutstandingFines",
                test: |d: &Driver| d.outstanding_fines > 0,
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Dataset;
    use crate::query::{FilterSpec, QueryEngine};

    #[test]
    fn offense_without_officer_is_searchable_on_other_fields() {
        let mut data = Dataset::sample().offenses;
        data[0].officer = None;
        let engine = QueryEngine::<Offense>::new();
        let by_id = engine.filter(&data, &FilterSpec::default().with_search(&data[0].id));
        assert_eq!(by_id.len(), 1);
    }

    #[test]
    fn cleared_officer_no_longer_matches_search() {
        let mut data = Dataset::sample().offenses;
        let idx = data.iter().position(|o| o.id == "OFF-2023-0456").unwrap();
        data[idx].officer = None;
        let engine = QueryEngine::<Offense>::new();
        let hits: Vec<&str> = engine
            .filter(&data, &FilterSpec::default().with_search("sarah"))
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(hits, vec!["OFF-2023-0453"]);
    }

    #[test]
    fn user_role_filter() {
        let data = Dataset::sample().users;
        let engine = QueryEngine::<User>::new();
        let officers = engine.filter(&data, &FilterSpec::reset::<User>().with("role", "Officer"));
        assert!(!officers.is_empty());
        assert!(officers.iter().all(|u| u.role == Role::Officer));
    }

    #[test]
    fn driver_status_projection_uses_license_status() {
        let data = Dataset::sample().drivers;
        let engine = QueryEngine::<Driver>::new();
        let revoked = engine.filter(&data, &FilterSpec::default().with("status", "Revoked"));
        assert!(revoked
            .iter()
            .all(|d| d.license_status == LicenseStatus::Revoked));
        let stats = engine.statistics(&data);
        assert_eq!(
            stats.get("valid").unwrap()
                + stats.get("suspended").unwrap()
                + stats.get("revoked").unwrap()
                + stats.get("expired").unwrap(),
            data.len()
        );
    }
}
