use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub dept: String,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    #[default]
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub id: String,
    pub name: String,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub note: String,
}

impl AttendanceRow {
    pub fn default_for(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            status: AttendanceStatus::Present,
            note: String::new(),
        }
    }

    pub fn student_key(&self) -> &str {
        if self.id.is_empty() { &self.name } else { &self.id }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceDay {
    pub course_id: String,
    pub date: String,
    pub saved: bool,
    pub rows: Vec<AttendanceRow>,
}

/// courseId -> roster
pub type Rosters = BTreeMap<String, Vec<Student>>;

/// courseId -> dateISO -> rows
pub type AttendanceBook = BTreeMap<String, BTreeMap<String, Vec<AttendanceRow>>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseOverview {
    #[serde(flatten)]
    pub course: Course,
    pub student_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentAggregate {
    pub name: String,
    pub id: String,
    pub present: u32,
    pub total: u32,
    pub percent: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportResponse {
    pub course_id: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub dates_counted: usize,
    pub students: Vec<StudentAggregate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedCountResponse {
    pub course_id: String,
    pub saved_dates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportFile {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkExport {
    pub files: Vec<ExportFile>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumberedRow {
    pub no: usize,
    #[serde(flatten)]
    pub row: AttendanceRow,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AttendanceView {
    pub course_id: String,
    pub date: String,
    pub saved: bool,
    pub rows: Vec<NumberedRow>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddStudentRequest {
    pub name: String,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveDayRequest {
    pub rows: Vec<AttendanceRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MarkQuery {
    pub date: Option<String>,
    pub status: AttendanceStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}
