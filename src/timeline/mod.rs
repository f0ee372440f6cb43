//! Per-patient timeline.
//!
//! Fuses the patient's appointments, procedures and imaging studies into one
//! reverse-chronological sequence. Each kind projects into the common
//! `TimelineEntry` shape with its own date source and copy; the merged list
//! is what the patient-detail screen renders.

mod project;
mod types;

pub use types::*;

use crate::query;
use crate::store::Snapshot;

/// Assemble the patient's merged timeline, newest first.
///
/// Equal dates order by kind (appointments, then procedures, then imaging
/// studies), then by source id ascending, so the merge is deterministic for
/// identical inputs.
pub fn patient_timeline(snapshot: &Snapshot, patient_id: &str) -> Vec<TimelineEntry> {
    let mut entries = project::project_appointments(&query::patient_appointments(
        &snapshot.appointments,
        patient_id,
    ));
    entries.extend(project::project_procedures(&query::patient_procedures(
        &snapshot.procedures,
        patient_id,
    )));
    entries.extend(project::project_imaging(&query::patient_imaging(
        &snapshot.imaging_studies,
        patient_id,
    )));

    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.source_id.cmp(&b.source_id))
    });
    entries
}

// ─── Tests ───────────────────────────────────────────────────────────────────
