use crate::model::{AttendanceBand, AttendanceRecord, AttendanceStatus, Department, MarkState, Student};
use crate::store::RecordStore;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const DAILY_SERIES_LEN: usize = 14;
pub const WEEKLY_OVERVIEW_DAYS: i64 = 7;

/// `round(part / whole * 100)`, rounding halves away from zero.
/// A zero denominator yields 0.
pub fn round_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentFilter {
    All,
    Named(String),
}

impl DepartmentFilter {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => DepartmentFilter::All,
            Some(v) if v.eq_ignore_ascii_case("all") => DepartmentFilter::All,
            Some(v) => DepartmentFilter::Named(v.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            DepartmentFilter::All => "all",
            DepartmentFilter::Named(v) => v.as_str(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Tally {
    present: usize,
    late: usize,
    absent: usize,
    total: usize,
}

impl Tally {
    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Late => self.late += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
        self.total += 1;
    }

    fn rate(&self) -> u32 {
        round_percent(self.present, self.total)
    }
}

fn students_by_id(students: &[Student]) -> HashMap<&str, &Student> {
    students.iter().map(|s| (s.id.as_str(), s)).collect()
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::default())
}

/// Cutoff instant for a rolling window; saturates at the earliest
/// representable instant so an oversized window keeps every record.
pub fn window_start(now: NaiveDateTime, window_days: u32) -> NaiveDateTime {
    now.checked_sub_signed(Duration::days(i64::from(window_days)))
        .unwrap_or(NaiveDateTime::MIN)
}

/// Records dated on or after `now - window_days` (dates taken at midnight)
/// whose student belongs to `department`. Records pointing at unknown
/// students only survive the `All` filter.
pub fn filter_by_window_and_department<'a>(
    records: &'a [AttendanceRecord],
    students: &[Student],
    window_days: u32,
    department: &DepartmentFilter,
    now: NaiveDateTime,
) -> Vec<&'a AttendanceRecord> {
    let cutoff = window_start(now, window_days);
    let by_id = students_by_id(students);
    records
        .iter()
        .filter(|r| midnight(r.date) >= cutoff)
        .filter(|r| match department {
            DepartmentFilter::All => true,
            DepartmentFilter::Named(name) => by_id
                .get(r.student_id.as_str())
                .map(|s| s.department == *name)
                .unwrap_or(false),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub label: String,
    pub present: usize,
    pub absent: usize,
    pub late: usize,
    pub rate: u32,
}

/// Per-date status counts for the most recent `DAILY_SERIES_LEN` dates that
/// have records, oldest first.
pub fn daily_series<'a, I>(records: I) -> Vec<DailyPoint>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut by_date: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for r in records {
        by_date.entry(r.date).or_default().add(r.status);
    }
    let skip = by_date.len().saturating_sub(DAILY_SERIES_LEN);
    by_date
        .into_iter()
        .skip(skip)
        .map(|(date, t)| DailyPoint {
            date,
            label: date.format("%b %-d").to_string(),
            present: t.present,
            absent: t.absent,
            late: t.late,
            rate: t.rate(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRate {
    pub subject: String,
    pub attendance_rate: u32,
    pub total_classes: usize,
}

/// Ties on rate keep subject name order.
pub fn subject_rates<'a, I>(records: I) -> Vec<SubjectRate>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut by_subject: BTreeMap<&str, Tally> = BTreeMap::new();
    for r in records {
        by_subject.entry(r.subject.as_str()).or_default().add(r.status);
    }
    let mut rows: Vec<SubjectRate> = by_subject
        .into_iter()
        .map(|(subject, t)| SubjectRate {
            subject: subject.to_string(),
            attendance_rate: t.rate(),
            total_classes: t.total,
        })
        .collect();
    rows.sort_by(|a, b| b.attendance_rate.cmp(&a.attendance_rate));
    rows
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRanking {
    #[serde(flatten)]
    pub student: Student,
    pub attendance_rate: u32,
    pub total_classes: usize,
    pub present_classes: usize,
    pub late_classes: usize,
}

fn ranking_order(a: &StudentRanking, b: &StudentRanking) -> Ordering {
    b.attendance_rate
        .cmp(&a.attendance_rate)
        .then_with(|| b.total_classes.cmp(&a.total_classes))
        .then_with(|| a.student.id.cmp(&b.student.id))
}

/// One row per known student with at least one record. Records for unknown
/// students are ignored.
pub fn student_rankings<'a, I>(records: I, students: &[Student]) -> Vec<StudentRanking>
where
    I: IntoIterator<Item = &'a AttendanceRecord>,
{
    let mut by_student: HashMap<&str, Tally> = HashMap::new();
    for r in records {
        by_student.entry(r.student_id.as_str()).or_default().add(r.status);
    }
    let mut rows: Vec<StudentRanking> = students
        .iter()
        .filter_map(|s| {
            let t = by_student.get(s.id.as_str())?;
            Some(StudentRanking {
                student: s.clone(),
                attendance_rate: t.rate(),
                total_classes: t.total,
                present_classes: t.present,
                late_classes: t.late,
            })
        })
        .collect();
    rows.sort_by(ranking_order);
    rows
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentComparison {
    pub department: String,
    pub code: String,
    pub attendance_rate: u32,
    pub total_students: usize,
    pub average_attendance: u32,
}

/// Per-department present rate over every record, regardless of any window.
/// `average_attendance` mirrors `attendance_rate`.
pub fn department_comparison(
    records: &[AttendanceRecord],
    students: &[Student],
    departments: &[Department],
) -> Vec<DepartmentComparison> {
    let by_id = students_by_id(students);
    let mut by_department: HashMap<&str, Tally> = HashMap::new();
    for r in records {
        if let Some(s) = by_id.get(r.student_id.as_str()) {
            by_department
                .entry(s.department.as_str())
                .or_default()
                .add(r.status);
        }
    }
    departments
        .iter()
        .map(|d| {
            let rate = by_department
                .get(d.name.as_str())
                .map(Tally::rate)
                .unwrap_or(0);
            DepartmentComparison {
                department: d.name.clone(),
                code: d.code.clone(),
                attendance_rate: rate,
                total_students: students.iter().filter(|s| s.department == d.name).count(),
                average_attendance: rate,
            }
        })
        .collect()
}

/// Distinct known students with a `present` record and distinct known students
/// with a `late` record on `date`. A student with both is in both counts.
fn distinct_present_late(
    records: &[AttendanceRecord],
    known: &HashSet<&str>,
    date: NaiveDate,
) -> (usize, usize) {
    let mut present: HashSet<&str> = HashSet::new();
    let mut late: HashSet<&str> = HashSet::new();
    for r in records.iter().filter(|r| r.date == date) {
        let Some(id) = known.get(r.student_id.as_str()) else {
            continue;
        };
        match r.status {
            AttendanceStatus::Present => {
                present.insert(*id);
            }
            AttendanceStatus::Late => {
                late.insert(*id);
            }
            AttendanceStatus::Absent => {}
        }
    }
    (present.len(), late.len())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    pub total_students: usize,
    pub present_today: usize,
    pub late_today: usize,
    pub absent_today: usize,
    pub attendance_rate: u32,
}

/// Absence is the residual of the roster after present and late students,
/// floored at zero since one student can be both present and late.
pub fn today_snapshot(
    records: &[AttendanceRecord],
    students: &[Student],
    today: NaiveDate,
) -> TodaySnapshot {
    let known: HashSet<&str> = students.iter().map(|s| s.id.as_str()).collect();
    let total = students.len();
    let (present, late) = distinct_present_late(records, &known, today);
    TodaySnapshot {
        total_students: total,
        present_today: present,
        late_today: late,
        absent_today: total.saturating_sub(present + late),
        attendance_rate: round_percent(present, total),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    pub date: NaiveDate,
    pub weekday: String,
    pub present: usize,
    pub late: usize,
    pub absent: usize,
}

/// The seven days ending at `today`, counted like `today_snapshot`.
pub fn weekly_overview(
    records: &[AttendanceRecord],
    students: &[Student],
    today: NaiveDate,
) -> Vec<WeeklyPoint> {
    let known: HashSet<&str> = students.iter().map(|s| s.id.as_str()).collect();
    (0..WEEKLY_OVERVIEW_DAYS)
        .rev()
        .filter_map(|back| today.checked_sub_signed(Duration::days(back)))
        .map(|date| {
            let (present, late) = distinct_present_late(records, &known, date);
            WeeklyPoint {
                date,
                weekday: date.format("%a").to_string(),
                present,
                late,
                absent: students.len().saturating_sub(present + late),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentToday {
    pub department: String,
    pub attendance_rate: u32,
    pub total_students: usize,
}

/// Share of each department's enrolled students marked present today.
pub fn department_today(
    records: &[AttendanceRecord],
    students: &[Student],
    departments: &[Department],
    today: NaiveDate,
) -> Vec<DepartmentToday> {
    departments
        .iter()
        .map(|d| {
            let members: HashSet<&str> = students
                .iter()
                .filter(|s| s.department == d.name)
                .map(|s| s.id.as_str())
                .collect();
            let (present, _) = distinct_present_late(records, &members, today);
            DepartmentToday {
                department: d.code.clone(),
                attendance_rate: round_percent(present, members.len()),
                total_students: members.len(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub total_classes: usize,
    pub present_classes: usize,
    pub late_classes: usize,
    pub absent_classes: usize,
    pub attendance_rate: u32,
    pub band: AttendanceBand,
}

pub fn student_summary(records: &[AttendanceRecord], student_id: &str) -> StudentSummary {
    let mut t = Tally::default();
    for r in records.iter().filter(|r| r.student_id == student_id) {
        t.add(r.status);
    }
    let rate = t.rate();
    StudentSummary {
        total_classes: t.total,
        present_classes: t.present,
        late_classes: t.late,
        absent_classes: t.absent,
        attendance_rate: rate,
        band: AttendanceBand::from_rate(rate),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub student: Student,
    pub state: MarkState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_students: usize,
    pub marked_students: usize,
    pub present_students: usize,
    pub late_students: usize,
    pub absent_students: usize,
    pub attendance_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRoster {
    pub date: NaiveDate,
    pub subject: String,
    pub entries: Vec<RosterEntry>,
    pub stats: SessionStats,
}

/// Marking sheet for one class: every student matching `search` (first name,
/// last name or roll number) with the state recorded for `date` and `subject`.
pub fn session_roster(
    store: &RecordStore,
    date: NaiveDate,
    subject: &str,
    search: Option<&str>,
) -> SessionRoster {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let entries: Vec<RosterEntry> = store
        .list_students()
        .iter()
        .filter(|s| {
            needle.is_empty()
                || s.first_name.to_lowercase().contains(&needle)
                || s.last_name.to_lowercase().contains(&needle)
                || s.roll_number.to_lowercase().contains(&needle)
        })
        .map(|s| RosterEntry {
            student: s.clone(),
            state: MarkState::from(store.mark_state(&s.id, date, subject)),
        })
        .collect();

    let mut stats = SessionStats {
        total_students: entries.len(),
        ..SessionStats::default()
    };
    for e in &entries {
        match e.state {
            MarkState::Present => stats.present_students += 1,
            MarkState::Late => stats.late_students += 1,
            MarkState::Absent => stats.absent_students += 1,
            MarkState::NotMarked => continue,
        }
        stats.marked_students += 1;
    }
    stats.attendance_rate = round_percent(stats.present_students, stats.total_students);

    SessionRoster {
        date,
        subject: subject.to_string(),
        entries,
        stats,
    }
}
