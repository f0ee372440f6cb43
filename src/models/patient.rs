use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{ContactSystem, IdentifierUse};

/// Business identifier, e.g. the chart code printed on paperwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "use")]
    pub use_: IdentifierUse,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: ContactSystem,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceCoverage {
    pub provider: String,
    pub policy_number: String,
}

/// Free-text history and allergy lists kept on the chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalNotes {
    pub medical_history: Vec<String>,
    pub allergies: Vec<String>,
}

/// The root of all relationships: every other resource points back at a
/// patient via a `Patient/<id>` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: String,
    pub identifier: Vec<Identifier>,
    pub name: Vec<HumanName>,
    pub telecom: Vec<ContactPoint>,
    pub birth_date: NaiveDate,
    pub note: ClinicalNotes,
    pub insurance: InsuranceCoverage,
}

impl Patient {
    /// Primary display name; empty when the chart has none.
    pub fn display_name(&self) -> &str {
        self.name.first().map(|n| n.text.as_str()).unwrap_or("")
    }

    /// Primary identifier code; empty when the chart has none.
    pub fn identifier_value(&self) -> &str {
        self.identifier
            .first()
            .map(|i| i.value.as_str())
            .unwrap_or("")
    }

    /// First contact point of the given system.
    pub fn contact(&self, system: ContactSystem) -> Option<&str> {
        self.telecom
            .iter()
            .find(|t| t.system == system)
            .map(|t| t.value.as_str())
    }

    pub fn phone(&self) -> Option<&str> {
        self.contact(ContactSystem::Phone)
    }

    pub fn email(&self) -> Option<&str> {
        self.contact(ContactSystem::Email)
    }

    /// Creation instant encoded in generator-minted ids.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        super::created_instant(&self.id)
    }
}

/// Patient fields minus the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPatient {
    pub identifier: Vec<Identifier>,
    pub name: Vec<HumanName>,
    pub telecom: Vec<ContactPoint>,
    pub birth_date: NaiveDate,
    pub note: ClinicalNotes,
    pub insurance: InsuranceCoverage,
}

impl NewPatient {
    pub(crate) fn into_patient(self, id: String) -> Patient {
        Patient {
            id,
            identifier: self.identifier,
            name: self.name,
            telecom: self.telecom,
            birth_date: self.birth_date,
            note: self.note,
            insurance: self.insurance,
        }
    }
}

/// Partial update; `None` fields keep their current value. The id is not
/// representable here and therefore immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatientPatch {
    pub identifier: Option<Vec<Identifier>>,
    pub name: Option<Vec<HumanName>>,
    pub telecom: Option<Vec<ContactPoint>>,
    pub birth_date: Option<NaiveDate>,
    pub note: Option<ClinicalNotes>,
    pub insurance: Option<InsuranceCoverage>,
}

impl PatientPatch {
    pub(crate) fn apply(self, current: &Patient) -> Patient {
        Patient {
            id: current.id.clone(),
            identifier: self.identifier.unwrap_or_else(|| current.identifier.clone()),
            name: self.name.unwrap_or_else(|| current.name.clone()),
            telecom: self.telecom.unwrap_or_else(|| current.telecom.clone()),
            birth_date: self.birth_date.unwrap_or(current.birth_date),
            note: self.note.unwrap_or_else(|| current.note.clone()),
            insurance: self.insurance.unwrap_or_else(|| current.insurance.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Patient {
        Patient {
            id: "1".into(),
            identifier: vec![Identifier {
                use_: IdentifierUse::Official,
                value: "P001".into(),
            }],
            name: vec![HumanName {
                text: "John Doe".into(),
            }],
            telecom: vec![
                ContactPoint {
                    system: ContactSystem::Phone,
                    value: "555-123-4567".into(),
                },
                ContactPoint {
                    system: ContactSystem::Email,
                    value: "john.doe@example.com".into(),
                },
            ],
            birth_date: NaiveDate::from_ymd_opt(1985, 5, 20).unwrap(),
            note: ClinicalNotes::default(),
            insurance: InsuranceCoverage {
                provider: "MetLife Dental".into(),
                policy_number: "MET123456789".into(),
            },
        }
    }

    #[test]
    fn accessors_pick_first_matching_entry() {
        let p = sample();
        assert_eq!(p.display_name(), "John Doe");
        assert_eq!(p.identifier_value(), "P001");
        assert_eq!(p.phone(), Some("555-123-4567"));
        assert_eq!(p.email(), Some("john.doe@example.com"));
    }

    #[test]
    fn accessors_tolerate_empty_lists() {
        let mut p = sample();
        p.name.clear();
        p.identifier.clear();
        p.telecom.clear();
        assert_eq!(p.display_name(), "");
        assert_eq!(p.identifier_value(), "");
        assert_eq!(p.phone(), None);
    }

    #[test]
    fn patch_merges_only_supplied_fields() {
        let p = sample();
        let patch = PatientPatch {
            name: Some(vec![HumanName {
                text: "Johnathan Doe".into(),
            }]),
            ..Default::default()
        };
        let updated = patch.apply(&p);
        assert_eq!(updated.id, "1");
        assert_eq!(updated.display_name(), "Johnathan Doe");
        assert_eq!(updated.identifier_value(), "P001");
        assert_eq!(updated.birth_date, p.birth_date);
    }

    #[test]
    fn identifier_use_serializes_as_use() {
        let json = serde_json::to_string(&sample().identifier[0]).unwrap();
        assert!(json.contains("\"use\":\"official\""));
    }
}
