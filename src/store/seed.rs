//! Seeded demo dataset.
//!
//! All data here is hardcoded and fictional, standing in for a real clinic
//! system. Ids are small literals ("1", "2", ...) so the cross-references
//! below stay readable; generator-minted ids are far larger, so the two
//! ranges never collide. Dates are relative to the current day, keeping the
//! calendar and dashboard views populated whenever the data is loaded.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};

use crate::models::*;

/// Instant `days` from today at the given local wall-clock time.
fn relative_instant(days: i64, hour: u32, minute: u32) -> DateTime<Utc> {
    let day = Local::now().date_naive() + Duration::days(days);
    let naive = day.and_hms_opt(hour, minute, 0).expect("valid clinic time");
    Local
        .from_local_datetime(&naive)
        .earliest()
        .expect("local time exists")
        .with_timezone(&Utc)
}

fn patient(
    id: &str,
    name: &str,
    birth: (i32, u32, u32),
    code: &str,
    phone: &str,
    email: &str,
    insurer: (&str, &str),
    history: &[&str],
    allergies: &[&str],
) -> Patient {
    Patient {
        id: id.into(),
        identifier: vec![Identifier {
            use_: IdentifierUse::Official,
            value: code.into(),
        }],
        name: vec![HumanName { text: name.into() }],
        telecom: vec![
            ContactPoint {
                system: ContactSystem::Phone,
                value: phone.into(),
            },
            ContactPoint {
                system: ContactSystem::Email,
                value: email.into(),
            },
        ],
        birth_date: chrono::NaiveDate::from_ymd_opt(birth.0, birth.1, birth.2)
            .expect("valid birth date"),
        note: ClinicalNotes {
            medical_history: history.iter().map(|s| s.to_string()).collect(),
            allergies: allergies.iter().map(|s| s.to_string()).collect(),
        },
        insurance: InsuranceCoverage {
            provider: insurer.0.into(),
            policy_number: insurer.1.into(),
        },
    }
}

pub(crate) fn demo_patients() -> Vec<Patient> {
    vec![
        patient(
            "1",
            "John Doe",
            (1985, 5, 20),
            "P001",
            "555-123-4567",
            "john.doe@example.com",
            ("MetLife Dental", "MET123456789"),
            &["Hypertension, controlled with medication."],
            &["Penicillin"],
        ),
        patient(
            "2",
            "Jane Smith",
            (1992, 8, 15),
            "P002",
            "555-987-6543",
            "jane.smith@example.com",
            ("Delta Dental", "DD987654321"),
            &["No significant medical history."],
            &[],
        ),
        patient(
            "3",
            "Peter Jones",
            (1978, 11, 30),
            "P003",
            "555-555-5555",
            "peter.jones@example.com",
            ("Cigna", "CIG555444333"),
            &["Type 2 Diabetes."],
            &["Latex", "Codeine"],
        ),
    ]
}

fn appointment(
    id: &str,
    patient_id: &str,
    display: &str,
    status: AppointmentStatus,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Appointment {
    Appointment {
        id: id.into(),
        status,
        start,
        end,
        participant: vec![Participant {
            actor: Reference::patient(patient_id, display),
            status: ParticipationStatus::Accepted,
        }],
    }
}

pub(crate) fn demo_appointments() -> Vec<Appointment> {
    use AppointmentStatus::*;
    vec![
        appointment(
            "1",
            "1",
            "John Doe",
            Booked,
            relative_instant(0, 9, 0),
            relative_instant(0, 9, 30),
        ),
        appointment(
            "2",
            "2",
            "Jane Smith",
            Booked,
            relative_instant(0, 10, 0),
            relative_instant(0, 11, 0),
        ),
        appointment(
            "3",
            "3",
            "Peter Jones",
            Arrived,
            relative_instant(0, 11, 30),
            relative_instant(0, 12, 0),
        ),
        appointment(
            "4",
            "1",
            "John Doe",
            Booked,
            relative_instant(2, 9, 0),
            relative_instant(2, 10, 0),
        ),
        appointment(
            "5",
            "2",
            "Jane Smith",
            Booked,
            relative_instant(2, 11, 0),
            relative_instant(2, 11, 30),
        ),
    ]
}

fn procedure(
    id: &str,
    patient_id: &str,
    display: &str,
    code: &str,
    text: &str,
    tooth: &str,
    status: ProcedureStatus,
    performed_at: DateTime<Utc>,
) -> Procedure {
    Procedure {
        id: id.into(),
        status,
        code: CodeableConcept {
            coding: vec![Coding {
                system: "CDT".into(),
                code: code.into(),
            }],
            text: text.into(),
        },
        subject: Reference::patient(patient_id, display),
        performed_at,
        body_site: vec![BodySite {
            coding: vec![Coding {
                system: "Universal".into(),
                code: tooth.into(),
            }],
        }],
    }
}

pub(crate) fn demo_procedures() -> Vec<Procedure> {
    use ProcedureStatus::*;
    vec![
        procedure(
            "1",
            "1",
            "John Doe",
            "D2740",
            "Crown - porcelain/ceramic",
            "30",
            Completed,
            relative_instant(-17, 10, 0),
        ),
        procedure(
            "2",
            "2",
            "Jane Smith",
            "D1110",
            "Prophylaxis - adult",
            "14",
            Completed,
            relative_instant(-14, 11, 30),
        ),
        procedure(
            "3",
            "1",
            "John Doe",
            "D0120",
            "Periodic oral evaluation",
            "N/A",
            InProgress,
            relative_instant(7, 15, 0),
        ),
    ]
}

fn imaging_study(
    id: &str,
    patient_id: &str,
    display: &str,
    modality: &str,
    note: &str,
    image_url: &str,
) -> ImagingStudy {
    ImagingStudy {
        id: id.into(),
        subject: Reference::patient(patient_id, display),
        modality: Modality {
            system: "DCM".into(),
            code: modality.into(),
        },
        note: vec![Annotation { text: note.into() }],
        series: vec![Series {
            body_site: SeriesBodySite {
                system: "SNOMED".into(),
                code: "44567001".into(),
                display: "Oral".into(),
            },
            instance: vec![SeriesInstance {
                uid: id.into(),
                sop_class: Coding {
                    system: "URL".into(),
                    code: image_url.into(),
                },
            }],
        }],
    }
}

pub(crate) fn demo_imaging_studies() -> Vec<ImagingStudy> {
    vec![
        imaging_study(
            "1",
            "1",
            "John Doe",
            "X-Ray",
            "Periapical - Tooth #30",
            "https://picsum.photos/seed/img1/800/600",
        ),
        imaging_study(
            "2",
            "2",
            "Jane Smith",
            "CT",
            "CBCT - Full Arch",
            "https://picsum.photos/seed/img2/800/600",
        ),
    ]
}
