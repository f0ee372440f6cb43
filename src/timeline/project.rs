use chrono::{DateTime, Local, Utc};

use super::types::{TimelineEntry, TimelineKind};
use crate::models::{Appointment, ImagingStudy, Procedure};

pub(super) fn project_appointments(appointments: &[Appointment]) -> Vec<TimelineEntry> {
    appointments
        .iter()
        .map(|a| TimelineEntry {
            date: a.start,
            kind: TimelineKind::Appointment,
            title: "Appointment".into(),
            details: format!(
                "Scheduled from {} to {}",
                short_time(a.start),
                short_time(a.end)
            ),
            status: Some(a.status.as_str().into()),
            source_id: a.id.clone(),
        })
        .collect()
}

pub(super) fn project_procedures(procedures: &[Procedure]) -> Vec<TimelineEntry> {
    procedures
        .iter()
        .map(|p| TimelineEntry {
            date: p.performed_at,
            kind: TimelineKind::Procedure,
            title: format!("{} - {}", p.primary_code(), p.code.text),
            details: format!("Tooth: {}", p.tooth_code()),
            status: Some(p.status.as_str().into()),
            source_id: p.id.clone(),
        })
        .collect()
}

pub(super) fn project_imaging(studies: &[ImagingStudy]) -> Vec<TimelineEntry> {
    studies
        .iter()
        .map(|s| TimelineEntry {
            // The id-derived creation surrogate; see ImagingStudy::created_at.
            date: s.created_at(),
            kind: TimelineKind::Imaging,
            title: format!("Imaging Study - {}", s.modality.code),
            details: s.first_note().into(),
            status: Some("completed".into()),
            source_id: s.id.clone(),
        })
        .collect()
}

fn short_time(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&Local).format("%-I:%M %p").to_string()
}
