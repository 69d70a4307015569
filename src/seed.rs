use crate::model::{AttendanceRecord, AttendanceStatus, Department, Student};
use chrono::{Duration, NaiveDate};
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const MAX_HISTORY_DAYS: u32 = 3_650;

const SUBJECTS: [&str; 5] = [
    "Mathematics",
    "Physics",
    "Programming",
    "Electronics",
    "Mechanical",
];

const TEACHERS: [&str; 5] = [
    "Prof. Ram Kumar",
    "Prof. Shayam",
    "Prof. Manish",
    "Prof. Jatin",
    "Prof. Ansul Sagar",
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn student(
    id: &str,
    first: &str,
    last: &str,
    roll: &str,
    department: &str,
    year: u8,
    joined: NaiveDate,
) -> Student {
    Student {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!(
            "{}.{}@college.edu",
            first.to_ascii_lowercase(),
            last.to_ascii_lowercase()
        ),
        roll_number: roll.to_string(),
        department: department.to_string(),
        year,
        join_date: joined,
    }
}

pub fn default_students() -> Vec<Student> {
    let y21 = date(2021, 8, 15);
    let y22 = date(2022, 8, 15);
    vec![
        student("1", "Rohit", "Verma", "CS2021001", "Computer Science", 3, y21),
        student("2", "Pradeep", "Singh", "CS2021002", "Computer Science", 3, y21),
        student("3", "Nikhil", "Kanaujia", "CS2022001", "Electrical Engineering", 2, y22),
        student("4", "Preeti", "Mandel", "ME2021001", "Mechanical Engineering", 3, y21),
        student("5", "Pratul", "Tiwari", "CS2022008", "Computer Science", 3, y22),
        student("6", "Nitin", "Mathur", "EE2021004", "Electrical Engineering", 3, y21),
    ]
}

pub fn default_departments() -> Vec<Department> {
    [
        ("1", "Computer Science", "CS", 300),
        ("2", "Electrical Engineering", "EE", 120),
        ("3", "Mechanical Engineering", "ME", 100),
    ]
    .into_iter()
    .map(|(id, name, code, total)| Department {
        id: id.to_string(),
        name: name.to_string(),
        code: code.to_string(),
        total_students: total,
    })
    .collect()
}

fn pick(rng: &mut ChaCha8Rng, n: u32) -> u32 {
    rng.next_u32() % n
}

fn clock(rng: &mut ChaCha8Rng, base_hour: u32) -> String {
    let hour = base_hour + pick(rng, 8);
    let minute = pick(rng, 60);
    format!("{}:{:02}", hour, minute)
}

fn roll_status(rng: &mut ChaCha8Rng) -> AttendanceStatus {
    match pick(rng, 100) {
        0..=84 => AttendanceStatus::Present,
        85..=94 => AttendanceStatus::Late,
        _ => AttendanceStatus::Absent,
    }
}

/// Synthetic attendance history: for every day from `today` back
/// `history_days - 1` days, each student attends 2 or 3 sessions.
/// `history_days` is capped at `MAX_HISTORY_DAYS`.
pub fn generate_records(
    students: &[Student],
    today: NaiveDate,
    history_days: u32,
    seed: u64,
) -> Vec<AttendanceRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = Vec::new();

    for offset in 0..history_days.min(MAX_HISTORY_DAYS) {
        let Some(day) = today.checked_sub_signed(Duration::days(i64::from(offset))) else {
            break;
        };
        for s in students {
            let sessions = 2 + pick(&mut rng, 2) as usize;
            for i in 0..sessions {
                let subject = SUBJECTS[pick(&mut rng, SUBJECTS.len() as u32) as usize];
                let teacher = TEACHERS[pick(&mut rng, TEACHERS.len() as u32) as usize];
                let status = roll_status(&mut rng);
                let (time_in, time_out) = if status == AttendanceStatus::Absent {
                    (None, None)
                } else {
                    (Some(clock(&mut rng, 9)), Some(clock(&mut rng, 10)))
                };
                records.push(AttendanceRecord {
                    id: AttendanceRecord::record_id(&s.id, day, i),
                    student_id: s.id.clone(),
                    date: day,
                    status,
                    time_in,
                    time_out,
                    subject: subject.to_string(),
                    teacher: teacher.to_string(),
                });
            }
        }
    }

    records
}
