use crate::model::{AttendanceRecord, AttendanceStatus, Department, Student};
use crate::seed;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// On-disk shape accepted by `RecordStore::from_dataset_file`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub departments: Vec<Department>,
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
    pub search: Option<String>,
    pub department: Option<String>,
    pub year: Option<u8>,
}

/// Read-only roster and attendance history for one session.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    students: Vec<Student>,
    departments: Vec<Department>,
    records: Vec<AttendanceRecord>,
}

impl RecordStore {
    pub fn new(
        students: Vec<Student>,
        departments: Vec<Department>,
        records: Vec<AttendanceRecord>,
    ) -> Self {
        Self {
            students,
            departments,
            records,
        }
    }

    pub fn generate(seed: u64, today: NaiveDate, history_days: u32) -> Self {
        let students = seed::default_students();
        let records = seed::generate_records(&students, today, history_days, seed);
        Self::new(students, seed::default_departments(), records)
    }

    pub fn from_dataset(dataset: Dataset) -> Self {
        Self::new(dataset.students, dataset.departments, dataset.records)
    }

    pub fn from_dataset_file(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading dataset {}", path.display()))?;
        let dataset: Dataset = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing dataset {}", path.display()))?;
        Ok(Self::from_dataset(dataset))
    }

    pub fn list_students(&self) -> &[Student] {
        &self.students
    }

    pub fn list_attendance_records(&self) -> &[AttendanceRecord] {
        &self.records
    }

    pub fn list_departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Status of the first session recorded for this student, date and subject.
    /// `None` means the class was never marked.
    pub fn mark_state(
        &self,
        student_id: &str,
        date: NaiveDate,
        subject: &str,
    ) -> Option<AttendanceStatus> {
        self.records
            .iter()
            .find(|r| r.student_id == student_id && r.date == date && r.subject == subject)
            .map(|r| r.status)
    }

    pub fn subjects(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.subject.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn search_students(&self, query: &StudentQuery) -> Vec<&Student> {
        let needle = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_default();
        self.students
            .iter()
            .filter(|s| {
                needle.is_empty()
                    || s.first_name.to_lowercase().contains(&needle)
                    || s.last_name.to_lowercase().contains(&needle)
                    || s.roll_number.to_lowercase().contains(&needle)
                    || s.email.to_lowercase().contains(&needle)
            })
            .filter(|s| {
                query
                    .department
                    .as_deref()
                    .map(|d| s.department == d)
                    .unwrap_or(true)
            })
            .filter(|s| query.year.map(|y| s.year == y).unwrap_or(true))
            .collect()
    }
}
