//! Typed clinical resources.
//!
//! One file per entity, mirroring the shapes the UI layer consumes. Entities
//! are plain serde values: immutable once read, replaced wholesale by store
//! mutations. Cross-entity links are `Reference` string keys resolved by
//! lookup, never enforced structurally.

pub mod appointment;
pub mod enums;
pub mod imaging;
pub mod patient;
pub mod procedure;
pub mod reference;

pub use appointment::*;
pub use enums::*;
pub use imaging::*;
pub use patient::*;
pub use procedure::*;
pub use reference::*;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors from model-level parsing.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Malformed reference: {0}")]
    MalformedReference(String),
}

/// Recover the creation instant encoded in a store-minted id.
///
/// Ids are decimal millisecond timestamps, so they double as a creation-time
/// surrogate. Returns `None` for ids that did not come from the generator
/// (hand-written seed ids parse to instants near the Unix epoch, which reads
/// as "not recent" everywhere this is consulted).
pub fn created_instant(id: &str) -> Option<DateTime<Utc>> {
    let millis: i64 = id.parse().ok()?;
    DateTime::from_timestamp_millis(millis)
}
