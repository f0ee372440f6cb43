use serde::{Deserialize, Serialize};

use super::ModelError;

/// The four resource kinds held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Patient,
    Appointment,
    Procedure,
    ImagingStudy,
}

impl ResourceKind {
    /// The kind prefix used in reference strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Appointment => "Appointment",
            Self::Procedure => "Procedure",
            Self::ImagingStudy => "ImagingStudy",
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Patient" => Ok(Self::Patient),
            "Appointment" => Ok(Self::Appointment),
            "Procedure" => Ok(Self::Procedure),
            "ImagingStudy" => Ok(Self::ImagingStudy),
            _ => Err(ModelError::InvalidValue {
                field: "ResourceKind".into(),
                value: s.into(),
            }),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed string link to another resource, `"<Kind>/<id>"`.
///
/// References carry a denormalized display string so views can render a
/// label without a lookup. The link itself is resolved lazily; the target
/// may have been deleted out from under it, and consumers are expected to
/// degrade to a placeholder rather than fail (see `query::patient_display`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
    pub display: String,
}

impl Reference {
    pub fn new(kind: ResourceKind, id: &str, display: &str) -> Self {
        Self {
            reference: format!("{}/{}", kind.as_str(), id),
            display: display.to_string(),
        }
    }

    /// Shorthand for the overwhelmingly common case.
    pub fn patient(id: &str, display: &str) -> Self {
        Self::new(ResourceKind::Patient, id, display)
    }

    /// Split the link into kind and id.
    pub fn target(&self) -> Result<(ResourceKind, &str), ModelError> {
        let (kind, id) = self
            .reference
            .split_once('/')
            .ok_or_else(|| ModelError::MalformedReference(self.reference.clone()))?;
        Ok((kind.parse()?, id))
    }

    /// Whether this reference points at the given resource.
    pub fn points_to(&self, kind: ResourceKind, id: &str) -> bool {
        matches!(self.target(), Ok((k, i)) if k == kind && i == id)
    }
}
