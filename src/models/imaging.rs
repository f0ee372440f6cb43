use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::procedure::Coding;
use super::reference::{Reference, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modality {
    pub system: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesBodySite {
    pub system: String,
    pub code: String,
    pub display: String,
}

/// One captured instance inside a series. The SOP class carries the image
/// location in this mock layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesInstance {
    pub uid: String,
    pub sop_class: Coding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub body_site: SeriesBodySite,
    pub instance: Vec<SeriesInstance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagingStudy {
    pub id: String,
    pub subject: Reference,
    pub modality: Modality,
    pub note: Vec<Annotation>,
    pub series: Vec<Series>,
}

impl ImagingStudy {
    /// Mock creation instant encoded in the id. Studies whose id does not
    /// parse as a millisecond timestamp fall back to the Unix epoch so the
    /// timeline degrades instead of failing.
    pub fn created_at(&self) -> DateTime<Utc> {
        super::created_instant(&self.id).unwrap_or(DateTime::UNIX_EPOCH)
    }

    /// First annotation text; empty when the study carries none.
    pub fn first_note(&self) -> &str {
        self.note.first().map(|n| n.text.as_str()).unwrap_or("")
    }

    pub fn references_patient(&self, patient_id: &str) -> bool {
        self.subject.points_to(ResourceKind::Patient, patient_id)
    }
}

/// ImagingStudy fields minus the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewImagingStudy {
    pub subject: Reference,
    pub modality: Modality,
    pub note: Vec<Annotation>,
    pub series: Vec<Series>,
}

impl NewImagingStudy {
    pub(crate) fn into_study(self, id: String) -> ImagingStudy {
        ImagingStudy {
            id,
            subject: self.subject,
            modality: self.modality,
            note: self.note,
            series: self.series,
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImagingStudyPatch {
    pub subject: Option<Reference>,
    pub modality: Option<Modality>,
    pub note: Option<Vec<Annotation>>,
    pub series: Option<Vec<Series>>,
}

impl ImagingStudyPatch {
    pub(crate) fn apply(self, current: &ImagingStudy) -> ImagingStudy {
        ImagingStudy {
            id: current.id.clone(),
            subject: self.subject.unwrap_or_else(|| current.subject.clone()),
            modality: self.modality.unwrap_or_else(|| current.modality.clone()),
            note: self.note.unwrap_or_else(|| current.note.clone()),
            series: self.series.unwrap_or_else(|| current.series.clone()),
        }
    }
}
