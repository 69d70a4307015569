use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub roll_number: String,
    pub department: String,
    pub year: u8,
    pub join_date: NaiveDate,
}

impl Student {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Recorded outcome of one class session. "Not marked" is never stored; it is
/// the absence of a record (see `MarkState`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_out: Option<String>,
    pub subject: String,
    pub teacher: String,
}

impl AttendanceRecord {
    pub fn record_id(student_id: &str, date: NaiveDate, session: usize) -> String {
        format!("{}-{}-{}", student_id, date.format("%Y-%m-%d"), session)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub code: String,
    /// Institution-wide headcount; independent of enrolled `Student` rows.
    pub total_students: u32,
}

/// Display-side projection of an optional status lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkState {
    Present,
    Late,
    Absent,
    NotMarked,
}

impl From<Option<AttendanceStatus>> for MarkState {
    fn from(status: Option<AttendanceStatus>) -> Self {
        match status {
            Some(AttendanceStatus::Present) => MarkState::Present,
            Some(AttendanceStatus::Late) => MarkState::Late,
            Some(AttendanceStatus::Absent) => MarkState::Absent,
            None => MarkState::NotMarked,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttendanceBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl AttendanceBand {
    pub fn from_rate(rate: u32) -> Self {
        if rate >= 85 {
            AttendanceBand::Excellent
        } else if rate >= 75 {
            AttendanceBand::Good
        } else if rate >= 65 {
            AttendanceBand::Average
        } else {
            AttendanceBand::Poor
        }
    }
}
