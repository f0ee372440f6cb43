//! Calendar grid generation.
//!
//! Turns a reference date into the fixed-shape grid covering the full
//! calendar month that contains it: an ordered list of weeks, each exactly
//! seven days, Sunday first, padded with adjacent-month days so every week
//! is complete. Two consumers share the shape:
//! - the appointment calendar attaches that day's events to each cell;
//! - the date-time picker instead disables past days and offers the
//!   clinic's fixed 15-minute time slots.
//!
//! Day membership is decided at local-day granularity; time-of-day is
//! ignored. Month lengths, year boundaries and leap Februaries all flow
//! through plain date arithmetic, nothing is special-cased.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::config;
use crate::models::Appointment;

/// Anything with a single start instant can be placed on the grid.
pub trait DayEvent {
    fn start_instant(&self) -> DateTime<Utc>;
}

impl DayEvent for Appointment {
    fn start_instant(&self) -> DateTime<Utc> {
        self.start
    }
}

/// Calendar day of an instant in the clinic's local timezone.
pub fn local_day(instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(&Local).date_naive()
}

/// One cell of the appointment calendar.
#[derive(Debug, Clone)]
pub struct CalendarDay<E> {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<E>,
}

/// One cell of the date-time picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PickerDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_disabled: bool,
}

/// A bookable time of day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSlot {
    /// Patient-facing label, e.g. "8:00 AM".
    pub display: String,
    /// 24-hour wall-clock value.
    pub value: NaiveTime,
}

// ─── Month grid ──────────────────────────────────────────────────────────────

/// The appointment-calendar grid for the month containing `reference`.
pub fn month_grid<E>(reference: NaiveDate, events: &[E]) -> Vec<Vec<CalendarDay<E>>>
where
    E: DayEvent + Clone,
{
    month_grid_on(reference, Local::now().date_naive(), events)
}

/// [`month_grid`] with "today" passed explicitly, keeping the computation a
/// pure function of its inputs.
pub fn month_grid_on<E>(
    reference: NaiveDate,
    today: NaiveDate,
    events: &[E],
) -> Vec<Vec<CalendarDay<E>>>
where
    E: DayEvent + Clone,
{
    into_weeks(month_span(reference).map(|date| CalendarDay {
        date,
        is_current_month: same_month(date, reference),
        is_today: date == today,
        events: events
            .iter()
            .filter(|e| local_day(e.start_instant()) == date)
            .cloned()
            .collect(),
    }))
}

/// The date-time-picker grid for the month containing `reference`.
pub fn picker_grid(reference: NaiveDate) -> Vec<Vec<PickerDay>> {
    picker_grid_on(reference, Local::now().date_naive())
}

/// [`picker_grid`] with "today" passed explicitly. Days strictly before
/// today are disabled.
pub fn picker_grid_on(reference: NaiveDate, today: NaiveDate) -> Vec<Vec<PickerDay>> {
    into_weeks(month_span(reference).map(|date| PickerDay {
        date,
        is_current_month: same_month(date, reference),
        is_disabled: date < today,
    }))
}

fn same_month(date: NaiveDate, reference: NaiveDate) -> bool {
    date.year() == reference.year() && date.month() == reference.month()
}

/// Every day from the Sunday on or before the 1st through the Saturday on
/// or after the last day of the month. The span length is always a multiple
/// of seven; a month that already ends on a Saturday gets no trailing pad.
fn month_span(reference: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let first = reference.with_day(1).expect("every month has a day 1");
    let last = last_day_of_month(first);
    let start = first - Duration::days(first.weekday().num_days_from_sunday() as i64);
    let end = last + Duration::days((6 - last.weekday().num_days_from_sunday()) as i64);
    start.iter_days().take_while(move |d| *d <= end)
}

fn last_day_of_month(first: NaiveDate) -> NaiveDate {
    let (year, month) = match first.month() {
        12 => (first.year() + 1, 1),
        m => (first.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("every month has a day 1") - Duration::days(1)
}

fn into_weeks<D>(days: impl Iterator<Item = D>) -> Vec<Vec<D>> {
    let mut grid = Vec::new();
    let mut week = Vec::with_capacity(7);
    for day in days {
        week.push(day);
        if week.len() == 7 {
            grid.push(std::mem::take(&mut week));
        }
    }
    debug_assert!(week.is_empty(), "month span not a multiple of seven");
    grid
}

// ─── Time slots ──────────────────────────────────────────────────────────────

/// The clinic's fixed bookable slots: 15-minute increments across
/// 08:00–16:45.
pub fn time_slots() -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    for hour in config::OPENING_HOUR..config::CLOSING_HOUR {
        for minute in (0..60).step_by(config::SLOT_MINUTES as usize) {
            let value = NaiveTime::from_hms_opt(hour, minute, 0).expect("valid slot time");
            slots.push(TimeSlot {
                display: format_12h(value),
                value,
            });
        }
    }
    slots
}

/// Whether a slot is selectable for the given day.
pub fn slot_is_disabled(slot: &TimeSlot, selected_day: NaiveDate) -> bool {
    let now = Local::now();
    slot_is_disabled_at(slot, selected_day, now.date_naive(), now.time())
}

/// A slot is disabled only when the selected day is today and the slot has
/// already passed. Future days are fully open; past days are the grid's
/// concern, not the slot list's.
pub fn slot_is_disabled_at(
    slot: &TimeSlot,
    selected_day: NaiveDate,
    today: NaiveDate,
    now: NaiveTime,
) -> bool {
    selected_day == today && slot.value < now
}

fn format_12h(value: NaiveTime) -> String {
    use chrono::Timelike;
    let hour24 = value.hour();
    let meridiem = if hour24 >= 12 { "PM" } else { "AM" };
    let hour12 = match hour24 % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", hour12, value.minute(), meridiem)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn no_events() -> Vec<Appointment> {
        Vec::new()
    }

    fn flat<E: Clone>(grid: &[Vec<CalendarDay<E>>]) -> Vec<&CalendarDay<E>> {
        grid.iter().flatten().collect()
    }

    #[test]
    fn every_week_has_seven_days() {
        for (y, m) in [
            (2024, 2),
            (2025, 12),
            (2026, 1),
            (2026, 2),
            (2026, 4),
            (2026, 8),
        ] {
            let grid = month_grid_on(date(y, m, 15), date(2026, 8, 4), &no_events());
            assert!(!grid.is_empty());
            for week in &grid {
                assert_eq!(week.len(), 7, "{y}-{m}");
            }
        }
    }

    #[test]
    fn month_days_appear_exactly_once() {
        for (y, m, len) in [(2024, 2, 29), (2026, 2, 28), (2026, 8, 31), (2026, 4, 30)] {
            let grid = month_grid_on(date(y, m, 10), date(2026, 8, 4), &no_events());
            for d in 1..=len {
                let hits = flat(&grid)
                    .iter()
                    .filter(|c| c.date == date(y, m, d))
                    .count();
                assert_eq!(hits, 1, "{y}-{m}-{d}");
            }
            let in_month = flat(&grid).iter().filter(|c| c.is_current_month).count();
            assert_eq!(in_month, len as usize);
        }
    }

    #[test]
    fn month_aligned_to_full_weeks_gets_no_padding() {
        // February 2026 runs Sunday the 1st through Saturday the 28th.
        let grid = month_grid_on(date(2026, 2, 14), date(2026, 8, 4), &no_events());
        assert_eq!(grid.len(), 4);
        assert!(flat(&grid).iter().all(|c| c.is_current_month));
    }

    #[test]
    fn month_ending_on_saturday_gets_no_trailing_week() {
        // January 2026 ends on Saturday the 31st.
        let grid = month_grid_on(date(2026, 1, 10), date(2026, 8, 4), &no_events());
        let last_week = grid.last().unwrap();
        assert_eq!(last_week[6].date, date(2026, 1, 31));
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn december_grid_pads_across_the_year_boundary() {
        let grid = month_grid_on(date(2025, 12, 25), date(2026, 8, 4), &no_events());
        let cells = flat(&grid);
        assert_eq!(cells.first().unwrap().date, date(2025, 11, 30));
        assert_eq!(cells.last().unwrap().date, date(2026, 1, 3));
        assert!(!cells.first().unwrap().is_current_month);
        assert!(!cells.last().unwrap().is_current_month);
    }

    #[test]
    fn leap_february_has_twenty_nine_current_days() {
        let grid = month_grid_on(date(2024, 2, 1), date(2026, 8, 4), &no_events());
        let in_month = flat(&grid).iter().filter(|c| c.is_current_month).count();
        assert_eq!(in_month, 29);
    }

    #[test]
    fn today_is_marked_exactly_once_when_in_view() {
        let today = date(2026, 8, 4);
        let grid = month_grid_on(today, today, &no_events());
        let marked: Vec<_> = flat(&grid).into_iter().filter(|c| c.is_today).collect();
        assert_eq!(marked.len(), 1);
        assert_eq!(marked[0].date, today);
        assert!(marked[0].is_current_month);

        let elsewhere = month_grid_on(date(2026, 3, 1), today, &no_events());
        assert!(!flat(&elsewhere).iter().any(|c| c.is_today));
    }

    #[test]
    fn events_land_on_their_local_day() {
        let today = date(2026, 8, 4);
        let start = |d: u32, h: u32| {
            Local
                .from_local_datetime(&date(2026, 8, d).and_hms_opt(h, 0, 0).unwrap())
                .earliest()
                .unwrap()
                .with_timezone(&Utc)
        };
        let appt = |id: &str, d, h| Appointment {
            id: id.into(),
            status: crate::models::AppointmentStatus::Booked,
            start: start(d, h),
            end: start(d, h) + Duration::minutes(30),
            participant: vec![],
        };
        let events = vec![appt("a", 4, 9), appt("b", 4, 15), appt("c", 6, 9)];

        let grid = month_grid_on(today, today, &events);
        let cells = flat(&grid);
        let on = |d: u32| {
            cells
                .iter()
                .find(|c| c.date == date(2026, 8, d))
                .unwrap()
                .events
                .len()
        };
        assert_eq!(on(4), 2);
        assert_eq!(on(6), 1);
        assert_eq!(on(5), 0);
        let busy_days = cells.iter().filter(|c| !c.events.is_empty()).count();
        assert_eq!(busy_days, 2);
    }

    #[test]
    fn seeded_appointments_mark_exactly_their_days() {
        use std::collections::HashSet;

        let snap = crate::store::ResourceStore::seeded().snapshot();
        let today = Local::now().date_naive();
        let grid = month_grid_on(today, today, snap.appointments.as_slice());

        let busy: HashSet<NaiveDate> = snap.appointments.iter().map(|a| local_day(a.start)).collect();
        for cell in grid.iter().flatten() {
            assert_eq!(
                !cell.events.is_empty(),
                busy.contains(&cell.date),
                "{}",
                cell.date
            );
        }

        // Today always sits inside its own grid, holding the three seeded
        // same-day appointments.
        let today_cell = grid.iter().flatten().find(|c| c.date == today).unwrap();
        assert_eq!(today_cell.events.len(), 3);
        assert!(today_cell.is_today);
        assert!(today_cell.is_current_month);
    }

    #[test]
    fn picker_disables_strictly_past_days() {
        let today = date(2026, 8, 4);
        let grid = picker_grid_on(today, today);
        let cells: Vec<&PickerDay> = grid.iter().flatten().collect();
        let day = |d: u32| cells.iter().find(|c| c.date == date(2026, 8, d)).unwrap();
        assert!(day(3).is_disabled);
        assert!(!day(4).is_disabled);
        assert!(!day(5).is_disabled);
    }

    #[test]
    fn slot_list_covers_the_bookable_day() {
        let slots = time_slots();
        assert_eq!(slots.len(), 36);
        assert_eq!(slots.first().unwrap().display, "8:00 AM");
        assert_eq!(slots.last().unwrap().display, "4:45 PM");
        let noon = slots
            .iter()
            .find(|s| s.value == NaiveTime::from_hms_opt(12, 0, 0).unwrap())
            .unwrap();
        assert_eq!(noon.display, "12:00 PM");
    }

    #[test]
    fn slots_disable_only_for_today_before_now() {
        let slots = time_slots();
        let today = date(2026, 8, 4);
        let now = NaiveTime::from_hms_opt(10, 10, 0).unwrap();
        let nine = &slots[4]; // 9:00 AM
        let eleven = &slots[12]; // 11:00 AM
        assert!(slot_is_disabled_at(nine, today, today, now));
        assert!(!slot_is_disabled_at(eleven, today, today, now));
        // A future selected day never disables a slot.
        assert!(!slot_is_disabled_at(
            nine,
            today + Duration::days(1),
            today,
            now
        ));
    }
}
