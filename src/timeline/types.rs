use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single entry on a patient's timeline — unified across the three
/// event-bearing collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub kind: TimelineKind,
    pub title: String,
    pub details: String,
    pub status: Option<String>,
    /// Id of the source entity; doubles as the final merge tie-breaker.
    pub source_id: String,
}

/// Which collection an entry was projected from. The variant order is the
/// documented equal-date ordering of the merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimelineKind {
    Appointment,
    Procedure,
    Imaging,
}

impl TimelineKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Appointment => "Appointment",
            Self::Procedure => "Procedure",
            Self::Imaging => "Imaging",
        }
    }
}
