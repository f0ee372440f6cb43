//! In-memory resource store.
//!
//! Holds the four clinical collections behind a single `RwLock` and exposes
//! the full CRUD surface. Key properties:
//! - Mutators run under the write lock, bump a version counter, and publish
//!   it over a `watch` channel; one logical writer at a time.
//! - Readers take `Snapshot`s — `Arc`'d copies of the collections — and can
//!   never observe a half-applied mutation or mutate shared state in place.
//! - Deleting a patient cascades to every appointment, procedure and imaging
//!   study referencing it, inside the same write guard. The cascade consults
//!   a patient → dependents index maintained on every mutation instead of
//!   scanning the collections.
//! - A mutation that targets a missing id reports `StoreError::NotFound`.

mod ids;
mod seed;

pub use ids::IdGenerator;

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;
use tokio::sync::watch;

use crate::models::*;

/// Errors from store mutations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {kind} with id {id}")]
    NotFound { kind: ResourceKind, id: String },
}

/// Per-kind removal counts reported by a patient cascade delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeOutcome {
    pub appointments_removed: usize,
    pub procedures_removed: usize,
    pub imaging_studies_removed: usize,
}

/// An immutable view of all four collections at one instant.
///
/// Cloning a snapshot is cheap (four `Arc` bumps). The `version` field is
/// the value that produced it; a consumer holding a snapshot recomputes its
/// derived views when the store's published version moves past it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub patients: Arc<Vec<Patient>>,
    pub appointments: Arc<Vec<Appointment>>,
    pub procedures: Arc<Vec<Procedure>>,
    pub imaging_studies: Arc<Vec<ImagingStudy>>,
    pub version: u64,
}

// ─── Internal state ──────────────────────────────────────────────────────────

/// Dependent entity ids for one patient, one set per kind.
#[derive(Debug, Default)]
struct Dependents {
    appointments: HashSet<String>,
    procedures: HashSet<String>,
    imaging_studies: HashSet<String>,
}

impl Dependents {
    fn is_empty(&self) -> bool {
        self.appointments.is_empty()
            && self.procedures.is_empty()
            && self.imaging_studies.is_empty()
    }
}

#[derive(Debug, Default)]
struct Collections {
    patients: Arc<Vec<Patient>>,
    appointments: Arc<Vec<Appointment>>,
    procedures: Arc<Vec<Procedure>>,
    imaging_studies: Arc<Vec<ImagingStudy>>,
    /// Patient id → ids of entities referencing that patient.
    dependents: HashMap<String, Dependents>,
    version: u64,
}

impl Collections {
    // ── Dependents index maintenance ─────────────────────

    fn link_appointment(&mut self, appt: &Appointment) {
        for pid in appt.patient_ids() {
            self.dependents
                .entry(pid.to_string())
                .or_default()
                .appointments
                .insert(appt.id.clone());
        }
    }

    fn unlink_appointment(&mut self, appt: &Appointment) {
        for pid in appt.patient_ids() {
            if let Some(deps) = self.dependents.get_mut(pid) {
                deps.appointments.remove(&appt.id);
                if deps.is_empty() {
                    self.dependents.remove(pid);
                }
            }
        }
    }

    fn link_procedure(&mut self, proc: &Procedure) {
        if let Ok((ResourceKind::Patient, pid)) = proc.subject.target() {
            self.dependents
                .entry(pid.to_string())
                .or_default()
                .procedures
                .insert(proc.id.clone());
        }
    }

    fn unlink_procedure(&mut self, proc: &Procedure) {
        if let Ok((ResourceKind::Patient, pid)) = proc.subject.target() {
            if let Some(deps) = self.dependents.get_mut(pid) {
                deps.procedures.remove(&proc.id);
                if deps.is_empty() {
                    self.dependents.remove(pid);
                }
            }
        }
    }

    fn link_imaging_study(&mut self, study: &ImagingStudy) {
        if let Ok((ResourceKind::Patient, pid)) = study.subject.target() {
            self.dependents
                .entry(pid.to_string())
                .or_default()
                .imaging_studies
                .insert(study.id.clone());
        }
    }

    fn unlink_imaging_study(&mut self, study: &ImagingStudy) {
        if let Ok((ResourceKind::Patient, pid)) = study.subject.target() {
            if let Some(deps) = self.dependents.get_mut(pid) {
                deps.imaging_studies.remove(&study.id);
                if deps.is_empty() {
                    self.dependents.remove(pid);
                }
            }
        }
    }

    fn rebuild_dependents(&mut self) {
        self.dependents.clear();
        let appointments = Arc::clone(&self.appointments);
        let procedures = Arc::clone(&self.procedures);
        let imaging_studies = Arc::clone(&self.imaging_studies);
        for appt in appointments.iter() {
            self.link_appointment(appt);
        }
        for proc in procedures.iter() {
            self.link_procedure(proc);
        }
        for study in imaging_studies.iter() {
            self.link_imaging_study(study);
        }
    }
}

// ─── ResourceStore ───────────────────────────────────────────────────────────

/// The clinic's shared in-memory data layer.
///
/// Constructed explicitly and passed to consumers (usually in an `Arc`);
/// there is no ambient global instance. Lives for the whole process, is
/// never torn down, and assumes one logical mutator at a time — the write
/// lock enforces that in a multi-threaded host.
pub struct ResourceStore {
    inner: RwLock<Collections>,
    ids: IdGenerator,
    version_tx: watch::Sender<u64>,
}

impl ResourceStore {
    /// An empty store at version 0.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
            ids: IdGenerator::new(),
            version_tx: watch::channel(0).0,
        }
    }

    /// A store preloaded with the demo dataset.
    pub fn seeded() -> Self {
        let store = Self::new();
        {
            let mut inner = store.write();
            inner.patients = Arc::new(seed::demo_patients());
            inner.appointments = Arc::new(seed::demo_appointments());
            inner.procedures = Arc::new(seed::demo_procedures());
            inner.imaging_studies = Arc::new(seed::demo_imaging_studies());
            inner.rebuild_dependents();
        }
        store
    }

    // A poisoned lock means a mutator panicked mid-write; that is a
    // programming-contract violation, so propagating the panic is correct.
    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.inner.read().expect("store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.inner.write().expect("store lock poisoned")
    }

    fn bump(&self, inner: &mut Collections) {
        inner.version += 1;
        self.version_tx.send_replace(inner.version);
    }

    // ── Change propagation ───────────────────────────────

    /// The version of the most recent mutation.
    pub fn version(&self) -> u64 {
        self.read().version
    }

    /// Subscribe to version changes. Receivers see every mutation's version
    /// (or at least the latest, if they lag) and recompute derived views
    /// from a fresh `snapshot()`.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    /// The current contents of all four collections.
    pub fn snapshot(&self) -> Snapshot {
        let inner = self.read();
        Snapshot {
            patients: Arc::clone(&inner.patients),
            appointments: Arc::clone(&inner.appointments),
            procedures: Arc::clone(&inner.procedures),
            imaging_studies: Arc::clone(&inner.imaging_studies),
            version: inner.version,
        }
    }

    // ── Patients ─────────────────────────────────────────

    /// Mint an id, append, return the created patient. Field validation is
    /// the caller's concern; the store accepts what it is given.
    pub fn add_patient(&self, new: NewPatient) -> Patient {
        let created = new.into_patient(self.ids.next_id());
        let mut inner = self.write();
        let mut patients = inner.patients.as_ref().clone();
        patients.push(created.clone());
        inner.patients = Arc::new(patients);
        self.bump(&mut inner);
        tracing::debug!(id = %created.id, "patient created");
        created
    }

    pub fn update_patient(&self, id: &str, patch: PatientPatch) -> Result<Patient, StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.patients, id, ResourceKind::Patient)?;
        let updated = patch.apply(&inner.patients[pos]);
        let mut patients = inner.patients.as_ref().clone();
        patients[pos] = updated.clone();
        inner.patients = Arc::new(patients);
        self.bump(&mut inner);
        Ok(updated)
    }

    /// Remove a patient and, atomically, every appointment, procedure and
    /// imaging study referencing `Patient/<id>`. No reader can observe a
    /// state where the dependents outlive the patient.
    pub fn delete_patient(&self, id: &str) -> Result<CascadeOutcome, StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.patients, id, ResourceKind::Patient)?;
        let mut patients = inner.patients.as_ref().clone();
        patients.remove(pos);
        inner.patients = Arc::new(patients);

        let deps = inner.dependents.remove(id).unwrap_or_default();

        let (kept, removed_appointments) = partition_by_id(&inner.appointments, &deps.appointments);
        inner.appointments = Arc::new(kept);
        // An appointment can list several patient participants; drop the
        // removed ones from the other patients' index entries too.
        for appt in &removed_appointments {
            inner.unlink_appointment(appt);
        }

        let (kept, removed_procedures) = partition_by_id(&inner.procedures, &deps.procedures);
        inner.procedures = Arc::new(kept);

        let (kept, removed_studies) = partition_by_id(&inner.imaging_studies, &deps.imaging_studies);
        inner.imaging_studies = Arc::new(kept);

        let outcome = CascadeOutcome {
            appointments_removed: removed_appointments.len(),
            procedures_removed: removed_procedures.len(),
            imaging_studies_removed: removed_studies.len(),
        };
        self.bump(&mut inner);
        tracing::info!(
            patient = %id,
            appointments = outcome.appointments_removed,
            procedures = outcome.procedures_removed,
            imaging_studies = outcome.imaging_studies_removed,
            "patient deleted with cascade"
        );
        Ok(outcome)
    }

    // ── Appointments ─────────────────────────────────────

    pub fn add_appointment(&self, new: NewAppointment) -> Appointment {
        let created = new.into_appointment(self.ids.next_id());
        let mut inner = self.write();
        let mut appointments = inner.appointments.as_ref().clone();
        appointments.push(created.clone());
        inner.appointments = Arc::new(appointments);
        inner.link_appointment(&created);
        self.bump(&mut inner);
        tracing::debug!(id = %created.id, "appointment created");
        created
    }

    pub fn update_appointment(
        &self,
        id: &str,
        patch: AppointmentPatch,
    ) -> Result<Appointment, StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.appointments, id, ResourceKind::Appointment)?;
        let previous = inner.appointments[pos].clone();
        let updated = patch.apply(&previous);
        inner.unlink_appointment(&previous);
        inner.link_appointment(&updated);
        let mut appointments = inner.appointments.as_ref().clone();
        appointments[pos] = updated.clone();
        inner.appointments = Arc::new(appointments);
        self.bump(&mut inner);
        Ok(updated)
    }

    pub fn delete_appointment(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.appointments, id, ResourceKind::Appointment)?;
        let mut appointments = inner.appointments.as_ref().clone();
        let removed = appointments.remove(pos);
        inner.appointments = Arc::new(appointments);
        inner.unlink_appointment(&removed);
        self.bump(&mut inner);
        Ok(())
    }

    // ── Procedures ───────────────────────────────────────

    pub fn add_procedure(&self, new: NewProcedure) -> Procedure {
        let created = new.into_procedure(self.ids.next_id());
        let mut inner = self.write();
        let mut procedures = inner.procedures.as_ref().clone();
        procedures.push(created.clone());
        inner.procedures = Arc::new(procedures);
        inner.link_procedure(&created);
        self.bump(&mut inner);
        tracing::debug!(id = %created.id, "procedure created");
        created
    }

    pub fn update_procedure(
        &self,
        id: &str,
        patch: ProcedurePatch,
    ) -> Result<Procedure, StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.procedures, id, ResourceKind::Procedure)?;
        let previous = inner.procedures[pos].clone();
        let updated = patch.apply(&previous);
        inner.unlink_procedure(&previous);
        inner.link_procedure(&updated);
        let mut procedures = inner.procedures.as_ref().clone();
        procedures[pos] = updated.clone();
        inner.procedures = Arc::new(procedures);
        self.bump(&mut inner);
        Ok(updated)
    }

    pub fn delete_procedure(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.procedures, id, ResourceKind::Procedure)?;
        let mut procedures = inner.procedures.as_ref().clone();
        let removed = procedures.remove(pos);
        inner.procedures = Arc::new(procedures);
        inner.unlink_procedure(&removed);
        self.bump(&mut inner);
        Ok(())
    }

    // ── Imaging studies ──────────────────────────────────

    pub fn add_imaging_study(&self, new: NewImagingStudy) -> ImagingStudy {
        let created = new.into_study(self.ids.next_id());
        let mut inner = self.write();
        let mut studies = inner.imaging_studies.as_ref().clone();
        studies.push(created.clone());
        inner.imaging_studies = Arc::new(studies);
        inner.link_imaging_study(&created);
        self.bump(&mut inner);
        tracing::debug!(id = %created.id, "imaging study created");
        created
    }

    pub fn update_imaging_study(
        &self,
        id: &str,
        patch: ImagingStudyPatch,
    ) -> Result<ImagingStudy, StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.imaging_studies, id, ResourceKind::ImagingStudy)?;
        let previous = inner.imaging_studies[pos].clone();
        let updated = patch.apply(&previous);
        inner.unlink_imaging_study(&previous);
        inner.link_imaging_study(&updated);
        let mut studies = inner.imaging_studies.as_ref().clone();
        studies[pos] = updated.clone();
        inner.imaging_studies = Arc::new(studies);
        self.bump(&mut inner);
        Ok(updated)
    }

    pub fn delete_imaging_study(&self, id: &str) -> Result<(), StoreError> {
        let mut inner = self.write();
        let pos = position_of(&inner.imaging_studies, id, ResourceKind::ImagingStudy)?;
        let mut studies = inner.imaging_studies.as_ref().clone();
        let removed = studies.remove(pos);
        inner.imaging_studies = Arc::new(studies);
        inner.unlink_imaging_study(&removed);
        self.bump(&mut inner);
        Ok(())
    }
}

impl Default for ResourceStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

trait HasId {
    fn id(&self) -> &str;
}

macro_rules! has_id {
    ($($ty:ty),+) => {
        $(impl HasId for $ty {
            fn id(&self) -> &str {
                &self.id
            }
        })+
    };
}

has_id!(Patient, Appointment, Procedure, ImagingStudy);

fn position_of<T: HasId>(list: &[T], id: &str, kind: ResourceKind) -> Result<usize, StoreError> {
    list.iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| StoreError::NotFound {
            kind,
            id: id.to_string(),
        })
}

/// Split a collection into (kept, removed) by membership of `remove`.
fn partition_by_id<T: HasId + Clone>(list: &[T], remove: &HashSet<String>) -> (Vec<T>, Vec<T>) {
    let mut kept = Vec::with_capacity(list.len());
    let mut removed = Vec::new();
    for item in list {
        if remove.contains(item.id()) {
            removed.push(item.clone());
        } else {
            kept.push(item.clone());
        }
    }
    (kept, removed)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_patient(name: &str, code: &str) -> NewPatient {
        NewPatient {
            identifier: vec![Identifier {
                use_: IdentifierUse::Official,
                value: code.into(),
            }],
            name: vec![HumanName { text: name.into() }],
            telecom: vec![],
            birth_date: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            note: ClinicalNotes::default(),
            insurance: InsuranceCoverage {
                provider: "N/A".into(),
                policy_number: "N/A".into(),
            },
        }
    }

    fn new_appointment_for(patient_id: &str, display: &str) -> NewAppointment {
        NewAppointment {
            status: AppointmentStatus::Booked,
            start: Utc.with_ymd_and_hms(2026, 8, 4, 9, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2026, 8, 4, 9, 30, 0).unwrap(),
            participant: vec![Participant {
                actor: Reference::patient(patient_id, display),
                status: ParticipationStatus::Accepted,
            }],
        }
    }

    fn new_procedure_for(patient_id: &str) -> NewProcedure {
        NewProcedure {
            status: ProcedureStatus::Completed,
            code: CodeableConcept {
                coding: vec![Coding {
                    system: "CDT".into(),
                    code: "D1110".into(),
                }],
                text: "Prophylaxis - adult".into(),
            },
            subject: Reference::patient(patient_id, ""),
            performed_at: Utc.with_ymd_and_hms(2026, 8, 4, 11, 0, 0).unwrap(),
            body_site: vec![],
        }
    }

    fn new_study_for(patient_id: &str) -> NewImagingStudy {
        NewImagingStudy {
            subject: Reference::patient(patient_id, ""),
            modality: Modality {
                system: "DCM".into(),
                code: "X-Ray".into(),
            },
            note: vec![],
            series: vec![],
        }
    }

    #[test]
    fn add_assigns_fresh_unique_ids() {
        let store = ResourceStore::new();
        let a = store.add_patient(new_patient("A", "P100"));
        let b = store.add_patient(new_patient("B", "P101"));
        assert_ne!(a.id, b.id);
        assert_eq!(store.snapshot().patients.len(), 2);
    }

    #[test]
    fn update_merges_and_preserves_id() {
        let store = ResourceStore::new();
        let created = store.add_patient(new_patient("Ann", "P100"));
        let updated = store
            .update_patient(
                &created.id,
                PatientPatch {
                    name: Some(vec![HumanName { text: "Anne".into() }]),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.display_name(), "Anne");
        assert_eq!(updated.identifier_value(), "P100");
    }

    #[test]
    fn update_missing_id_reports_not_found() {
        let store = ResourceStore::new();
        let err = store
            .update_patient("missing", PatientPatch::default())
            .unwrap_err();
        match err {
            StoreError::NotFound { kind, id } => {
                assert_eq!(kind, ResourceKind::Patient);
                assert_eq!(id, "missing");
            }
        }
    }

    #[test]
    fn delete_missing_appointment_reports_not_found() {
        let store = ResourceStore::new();
        assert!(store.delete_appointment("nope").is_err());
        assert!(store.delete_procedure("nope").is_err());
        assert!(store.delete_imaging_study("nope").is_err());
    }

    #[test]
    fn every_mutation_bumps_the_version() {
        let store = ResourceStore::new();
        assert_eq!(store.version(), 0);
        let p = store.add_patient(new_patient("A", "P1"));
        assert_eq!(store.version(), 1);
        store
            .update_patient(&p.id, PatientPatch::default())
            .unwrap();
        assert_eq!(store.version(), 2);
        store.delete_patient(&p.id).unwrap();
        assert_eq!(store.version(), 3);
    }

    #[test]
    fn snapshot_carries_the_producing_version() {
        let store = ResourceStore::seeded();
        let before = store.snapshot();
        store.add_patient(new_patient("New", "P999"));
        let after = store.snapshot();
        assert_eq!(after.version, before.version + 1);
        // The old snapshot is untouched by the mutation.
        assert_eq!(before.patients.len(), 3);
        assert_eq!(after.patients.len(), 4);
    }

    #[test]
    fn subscribers_see_mutations() {
        let store = ResourceStore::new();
        let rx = store.subscribe();
        assert_eq!(*rx.borrow(), 0);
        store.add_patient(new_patient("A", "P1"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow(), 1);
    }

    #[test]
    fn cascade_removes_every_dependent_of_the_patient() {
        let store = ResourceStore::seeded();
        let outcome = store.delete_patient("2").unwrap();
        assert_eq!(
            outcome,
            CascadeOutcome {
                appointments_removed: 2,
                procedures_removed: 1,
                imaging_studies_removed: 1,
            }
        );

        let snap = store.snapshot();
        assert_eq!(snap.patients.len(), 2);
        assert_eq!(snap.appointments.len(), 3);
        assert_eq!(snap.procedures.len(), 2);
        assert_eq!(snap.imaging_studies.len(), 1);

        assert!(!snap.appointments.iter().any(|a| a.references_patient("2")));
        assert!(!snap.procedures.iter().any(|p| p.references_patient("2")));
        assert!(!snap
            .imaging_studies
            .iter()
            .any(|s| s.references_patient("2")));
    }

    #[test]
    fn cascade_covers_entities_added_and_retargeted_after_seeding() {
        let store = ResourceStore::seeded();
        store.add_appointment(new_appointment_for("3", "Peter Jones"));
        let proc = store.add_procedure(new_procedure_for("1"));
        // Retarget the procedure to patient 3; the index must follow.
        store
            .update_procedure(
                &proc.id,
                ProcedurePatch {
                    subject: Some(Reference::patient("3", "Peter Jones")),
                    ..Default::default()
                },
            )
            .unwrap();
        store.add_imaging_study(new_study_for("3"));

        let outcome = store.delete_patient("3").unwrap();
        assert_eq!(
            outcome,
            CascadeOutcome {
                // Seeded appointment "3" plus the one added above.
                appointments_removed: 2,
                procedures_removed: 1,
                imaging_studies_removed: 1,
            }
        );
        let snap = store.snapshot();
        assert!(!snap.appointments.iter().any(|a| a.references_patient("3")));
        assert!(!snap.procedures.iter().any(|p| p.references_patient("3")));
    }

    #[test]
    fn retargeted_procedure_no_longer_cascades_from_its_old_patient() {
        let store = ResourceStore::seeded();
        let proc = store.add_procedure(new_procedure_for("1"));
        store
            .update_procedure(
                &proc.id,
                ProcedurePatch {
                    subject: Some(Reference::patient("3", "Peter Jones")),
                    ..Default::default()
                },
            )
            .unwrap();

        store.delete_patient("1").unwrap();
        let snap = store.snapshot();
        // The retargeted procedure survives the old subject's cascade.
        assert!(snap.procedures.iter().any(|p| p.id == proc.id));
    }

    #[test]
    fn deleting_an_appointment_detaches_it_from_the_cascade() {
        let store = ResourceStore::seeded();
        store.delete_appointment("5").unwrap();
        let outcome = store.delete_patient("2").unwrap();
        assert_eq!(outcome.appointments_removed, 1);
    }

    #[test]
    fn dangling_reference_is_accepted_and_cascades_once_the_target_exists() {
        // The store does not block creating a reference to a patient that
        // does not exist yet; it is a lookup key, nothing more.
        let store = ResourceStore::new();
        store.add_appointment(new_appointment_for("ghost", "Ghost"));
        assert_eq!(store.snapshot().appointments.len(), 1);
        assert!(store.delete_patient("ghost").is_err());
    }

    #[test]
    fn seeded_store_matches_the_demo_dataset() {
        let snap = ResourceStore::seeded().snapshot();
        assert_eq!(snap.patients.len(), 3);
        assert_eq!(snap.appointments.len(), 5);
        assert_eq!(snap.procedures.len(), 3);
        assert_eq!(snap.imaging_studies.len(), 2);
        assert_eq!(snap.version, 0);
    }
}
