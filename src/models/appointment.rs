use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AppointmentStatus, ParticipationStatus};
use super::reference::{Reference, ResourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub actor: Reference,
    pub status: ParticipationStatus,
}

/// A scheduled visit. One patient participant is expected, though the
/// participant list itself carries no such guarantee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub status: AppointmentStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub participant: Vec<Participant>,
}

impl Appointment {
    /// Ids of every patient participant, in participant order.
    pub fn patient_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.participant.iter().filter_map(|p| match p.actor.target() {
            Ok((ResourceKind::Patient, id)) => Some(id),
            _ => None,
        })
    }

    /// The patient participant's id, if any participant references one.
    pub fn patient_id(&self) -> Option<&str> {
        self.patient_ids().next()
    }

    /// The patient participant's reference, display string included.
    pub fn patient_ref(&self) -> Option<&Reference> {
        self.participant
            .iter()
            .find(|p| matches!(p.actor.target(), Ok((ResourceKind::Patient, _))))
            .map(|p| &p.actor)
    }

    pub fn references_patient(&self, patient_id: &str) -> bool {
        self.participant
            .iter()
            .any(|p| p.actor.points_to(ResourceKind::Patient, patient_id))
    }
}

/// Appointment fields minus the store-assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub status: AppointmentStatus,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub participant: Vec<Participant>,
}

impl NewAppointment {
    pub(crate) fn into_appointment(self, id: String) -> Appointment {
        Appointment {
            id,
            status: self.status,
            start: self.start,
            end: self.end,
            participant: self.participant,
        }
    }
}

/// Partial update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    pub status: Option<AppointmentStatus>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub participant: Option<Vec<Participant>>,
}

impl AppointmentPatch {
    pub(crate) fn apply(self, current: &Appointment) -> Appointment {
        Appointment {
            id: current.id.clone(),
            status: self.status.unwrap_or(current.status),
            start: self.start.unwrap_or(current.start),
            end: self.end.unwrap_or(current.end),
            participant: self
                .participant
                .unwrap_or_else(|| current.participant.clone()),
        }
    }
}
