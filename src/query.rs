//! Stateless filter, sort, and scoping functions over snapshot slices.
//!
//! Every function returns a freshly allocated, explicitly ordered `Vec`;
//! nothing here retains or mutates store state. Consumers re-run these
//! whenever the snapshot or the parameters change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::local_day;
use crate::models::*;

/// Placeholder rendered when a reference no longer resolves.
pub const UNKNOWN_PATIENT: &str = "Unknown patient";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sortable columns of the patient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatientSortKey {
    Identifier,
    Name,
    BirthDate,
}

/// Search and sort parameters for the patient table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientQuery {
    pub search: String,
    pub sort_key: PatientSortKey,
    pub direction: SortDirection,
}

impl Default for PatientQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            sort_key: PatientSortKey::Name,
            direction: SortDirection::Ascending,
        }
    }
}

/// Filter by case-insensitive substring over display name and identifier
/// code (an empty term passes everything), then sort by the chosen key.
///
/// The sort is stable: rows with equal keys keep their snapshot order.
pub fn search_patients(patients: &[Patient], query: &PatientQuery) -> Vec<Patient> {
    let term = query.search.to_lowercase();
    let mut results: Vec<Patient> = patients
        .iter()
        .filter(|p| {
            term.is_empty()
                || p.display_name().to_lowercase().contains(&term)
                || p.identifier_value().to_lowercase().contains(&term)
        })
        .cloned()
        .collect();

    results.sort_by(|a, b| {
        let ord = match query.sort_key {
            PatientSortKey::Identifier => a.identifier_value().cmp(b.identifier_value()),
            PatientSortKey::Name => a.display_name().cmp(b.display_name()),
            PatientSortKey::BirthDate => a.birth_date.cmp(&b.birth_date),
        };
        match query.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
    results
}

/// Appointments on the given local calendar day, ascending by start time.
pub fn appointments_on(appointments: &[Appointment], day: NaiveDate) -> Vec<Appointment> {
    let mut results: Vec<Appointment> = appointments
        .iter()
        .filter(|a| local_day(a.start) == day)
        .cloned()
        .collect();
    results.sort_by_key(|a| a.start);
    results
}

/// All appointments involving the patient, newest first.
pub fn patient_appointments(appointments: &[Appointment], patient_id: &str) -> Vec<Appointment> {
    let mut results: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.references_patient(patient_id))
        .cloned()
        .collect();
    results.sort_by(|a, b| b.start.cmp(&a.start));
    results
}

/// Procedures whose subject is the patient, in snapshot order.
pub fn patient_procedures(procedures: &[Procedure], patient_id: &str) -> Vec<Procedure> {
    procedures
        .iter()
        .filter(|p| p.references_patient(patient_id))
        .cloned()
        .collect()
}

/// Imaging studies whose subject is the patient, in snapshot order.
pub fn patient_imaging(studies: &[ImagingStudy], patient_id: &str) -> Vec<ImagingStudy> {
    studies
        .iter()
        .filter(|s| s.references_patient(patient_id))
        .cloned()
        .collect()
}

/// All procedures, most recently performed first.
pub fn procedures_newest_first(procedures: &[Procedure]) -> Vec<Procedure> {
    let mut results: Vec<Procedure> = procedures.to_vec();
    results.sort_by(|a, b| b.performed_at.cmp(&a.performed_at));
    results
}

/// Resolve a reference to the current patient display name.
///
/// Degrades to [`UNKNOWN_PATIENT`] when the reference is malformed, points
/// at a non-patient kind, or its target has been deleted out-of-band.
pub fn patient_display(patients: &[Patient], reference: &Reference) -> String {
    match reference.target() {
        Ok((ResourceKind::Patient, id)) => patients
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| UNKNOWN_PATIENT.to_string()),
        _ => UNKNOWN_PATIENT.to_string(),
    }
}
