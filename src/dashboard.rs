//! Dashboard aggregates.
//!
//! Headline counts plus the today's-appointments list, recomputed from a
//! fresh snapshot on every render.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::calendar::local_day;
use crate::models::{Appointment, ProcedureStatus};
use crate::query;
use crate::store::Snapshot;

/// Counts shown on the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub appointments_today: usize,
    pub new_patients_this_week: usize,
    pub pending_procedures: usize,
}

pub fn dashboard_stats(snapshot: &Snapshot) -> DashboardStats {
    dashboard_stats_on(snapshot, Local::now().date_naive())
}

/// [`dashboard_stats`] with "today" passed explicitly.
pub fn dashboard_stats_on(snapshot: &Snapshot, today: NaiveDate) -> DashboardStats {
    let week_ago = week_ago_instant(today);
    DashboardStats {
        appointments_today: snapshot
            .appointments
            .iter()
            .filter(|a| local_day(a.start) == today)
            .count(),
        // Creation time comes from the id surrogate; hand-seeded ids decode
        // to the distant past and are never counted as new.
        new_patients_this_week: snapshot
            .patients
            .iter()
            .filter(|p| p.created_at().is_some_and(|c| c >= week_ago))
            .count(),
        pending_procedures: snapshot
            .procedures
            .iter()
            .filter(|p| p.status == ProcedureStatus::InProgress)
            .count(),
    }
}

/// Today's appointments, ascending by start time.
pub fn todays_appointments(snapshot: &Snapshot) -> Vec<Appointment> {
    todays_appointments_on(snapshot, Local::now().date_naive())
}

/// [`todays_appointments`] with "today" passed explicitly.
pub fn todays_appointments_on(snapshot: &Snapshot, today: NaiveDate) -> Vec<Appointment> {
    query::appointments_on(&snapshot.appointments, today)
}

/// Local midnight seven days before `today`.
fn week_ago_instant(today: NaiveDate) -> DateTime<Utc> {
    let midnight = today.and_hms_opt(0, 0, 0).expect("midnight exists");
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .expect("local midnight exists")
        .with_timezone(&Utc)
        - Duration::days(7)
}
