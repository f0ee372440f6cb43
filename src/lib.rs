//! Dentara — in-memory clinical data core for a dental clinic manager.
//!
//! The [`store::ResourceStore`] holds four typed resource collections
//! (patients, appointments, procedures, imaging studies) linked by string
//! references, with a CRUD surface that cascades patient deletes to every
//! dependent record. Everything downstream — calendar grids, per-patient
//! timelines, filtered tables, dashboard aggregates — is a pure function of
//! a store [`store::Snapshot`], recomputed whenever the store's published
//! version moves. Boundary contracts for the host shell's collaborators
//! (notifications, authentication, AI suggestions) live in their own
//! modules.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod notify;
pub mod query;
pub mod store;
pub mod suggest;
pub mod timeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for a host shell.
///
/// Honors `RUST_LOG` when set, falling back to the crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
