use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::ProcedureStatus;
use super::reference::{Reference, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
    pub text: String,
}

/// Tooth (or region) the procedure applies to, in the chart's notation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodySite {
    pub coding: Vec<Coding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: String,
    pub status: ProcedureStatus,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub performed_at: DateTime<Utc>,
    pub body_site: Vec<BodySite>,
}

impl Procedure {
    /// Primary procedure code, e.g. "D2740"; empty when uncoded.
    pub fn primary_code(&self) -> &str {
        self.code
            .coding
            .first()
            .map(|c| c.code.as_str())
            .unwrap_or("")
    }

    /// Tooth designation from the first body site, "N/A" when absent.
    pub fn tooth_code(&self) -> &str {
        self.body_site
            .first()
            .and_then(|b| b.coding.first())
            .map(|c| c.code.as_str())
            .unwrap_or("N/A")
    }

    pub fn references_patient(&self, patient_id: &str) -> bool {
        self.subject.points_to(ResourceKind::Patient, patient_id)
    }
}

/// Procedure fields minus the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProcedure {
    pub status: ProcedureStatus,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub performed_at: DateTime<Utc>,
    pub body_site: Vec<BodySite>,
}

impl NewProcedure {
    pub(crate) fn into_procedure(self, id: String) -> Procedure {
        Procedure {
            id,
            status: self.status,
            code: self.code,
            subject: self.subject,
            performed_at: self.performed_at,
            body_site: self.body_site,
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcedurePatch {
    pub status: Option<ProcedureStatus>,
    pub code: Option<CodeableConcept>,
    pub subject: Option<Reference>,
    pub performed_at: Option<DateTime<Utc>>,
    pub body_site: Option<Vec<BodySite>>,
}

impl ProcedurePatch {
    pub(crate) fn apply(self, current: &Procedure) -> Procedure {
        Procedure {
            id: current.id.clone(),
            status: self.status.unwrap_or(current.status),
            code: self.code.unwrap_or_else(|| current.code.clone()),
            subject: self.subject.unwrap_or_else(|| current.subject.clone()),
            performed_at: self.performed_at.unwrap_or(current.performed_at),
            body_site: self.body_site.unwrap_or_else(|| current.body_site.clone()),
        }
    }
}
