use crate::errors::AttendanceError;
use crate::export::{export_file_name, format_day_csv};
use crate::models::{
    AttendanceBook, AttendanceDay, AttendanceRow, AttendanceStatus, Course, CourseOverview,
    BulkExport, ExportFile, Rosters, Student, TeacherProfile,
};
use crate::seed;
use crate::stats::{self, Aggregation, DateFilter};
use crate::storage::{self, StorageKey, Store};
use rand::{Rng, seq::SliceRandom};
use std::{collections::BTreeMap, sync::Arc};
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn Store>,
}

impl Ledger {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    pub fn teacher(&self) -> Option<TeacherProfile> {
        storage::load_opt(self.store(), StorageKey::Teacher)
    }

    pub fn login(&self, name: &str, id: &str) -> Result<TeacherProfile, AttendanceError> {
        let (name, id) = (name.trim(), id.trim());
        if name.is_empty() || id.is_empty() {
            return Err(AttendanceError::InvalidInput("Please enter both fields.".into()));
        }
        let profile = TeacherProfile {
            name: name.to_string(),
            id: id.to_string(),
        };
        storage::save(self.store(), StorageKey::Teacher, &profile)?;
        info!(teacher = %profile.id, "teacher signed in");
        Ok(profile)
    }

    pub fn logout(&self) -> Result<(), AttendanceError> {
        storage::remove(self.store(), StorageKey::Teacher)
    }

    pub fn courses(&self) -> Vec<Course> {
        storage::load(self.store(), StorageKey::Courses, Vec::new())
    }

    pub fn course_overview(&self) -> Vec<CourseOverview> {
        let rosters = self.rosters();
        self.courses()
            .into_iter()
            .map(|course| CourseOverview {
                student_count: rosters.get(&course.id).map_or(0, Vec::len),
                course,
            })
            .collect()
    }

    pub fn roster(&self, course_id: &str) -> Vec<Student> {
        self.rosters().remove(course_id).unwrap_or_default()
    }

    pub fn get_day(&self, course_id: &str, date: &str) -> Result<AttendanceDay, AttendanceError> {
        let (course_id, date) = selection(course_id, date)?;

        if let Some(rows) = self.days(course_id).remove(date) {
            debug!(course = course_id, date, rows = rows.len(), "loaded saved day");
            return Ok(AttendanceDay {
                course_id: course_id.to_string(),
                date: date.to_string(),
                saved: true,
                rows,
            });
        }

        let rows = self
            .roster(course_id)
            .iter()
            .map(AttendanceRow::default_for)
            .collect();
        Ok(AttendanceDay {
            course_id: course_id.to_string(),
            date: date.to_string(),
            saved: false,
            rows,
        })
    }

    pub fn save_day(
        &self,
        course_id: &str,
        date: &str,
        rows: Vec<AttendanceRow>,
    ) -> Result<(), AttendanceError> {
        let (course_id, date) = selection(course_id, date)?;

        let mut book = self.book();
        let count = rows.len();
        book.entry(course_id.to_string())
            .or_default()
            .insert(date.to_string(), rows);
        storage::save(self.store(), StorageKey::Attendance, &book)?;

        info!(course = course_id, date, rows = count, "saved attendance");
        Ok(())
    }

    pub fn saved_date_count(&self, course_id: &str) -> usize {
        self.book().get(course_id).map_or(0, BTreeMap::len)
    }

    pub fn saved_dates(&self, course_id: &str) -> Vec<String> {
        self.days(course_id).into_keys().collect()
    }

    pub fn add_student(&self, course_id: &str, name: &str, id: &str) -> Result<Student, AttendanceError> {
        let course_id = require(course_id, "course")?;
        let (name, id) = (name.trim(), id.trim());
        if name.is_empty() || id.is_empty() {
            return Err(AttendanceError::InvalidInput("Enter name and ID".into()));
        }

        self.push_student(
            course_id,
            Student {
                id: id.to_string(),
                name: name.to_string(),
            },
        )
    }

    /// Appends a copy of a random sample student whose id gets a two-digit
    /// suffix in 10..=99.
    pub fn add_random_sample_student(&self, course_id: &str) -> Result<Student, AttendanceError> {
        let course_id = require(course_id, "course")?;

        let mut rng = rand::thread_rng();
        let mut student = seed::sample_students()
            .choose(&mut rng)
            .cloned()
            .ok_or_else(|| AttendanceError::InvalidInput("no sample students".into()))?;
        let suffix: u8 = rng.gen_range(10..=99);
        student.id = format!("{}{suffix}", student.id);

        self.push_student(course_id, student)
    }

    fn push_student(&self, course_id: &str, student: Student) -> Result<Student, AttendanceError> {
        let mut rosters = self.rosters();
        rosters
            .entry(course_id.to_string())
            .or_default()
            .push(student.clone());
        storage::save(self.store(), StorageKey::Students, &rosters)?;

        info!(course = course_id, student = %student.id, "added student");
        Ok(student)
    }

    pub fn reset_roster_to_sample(&self, course_id: &str) -> Result<Vec<Student>, AttendanceError> {
        let course_id = require(course_id, "course")?;

        let mut rosters = self.rosters();
        let students = seed::sample_students();
        rosters.insert(course_id.to_string(), students.clone());
        storage::save(self.store(), StorageKey::Students, &rosters)?;

        info!(course = course_id, "roster reset to sample");
        Ok(students)
    }

    pub fn clear_all(&self) -> Result<seed::SeedReport, AttendanceError> {
        storage::remove(self.store(), StorageKey::Attendance)?;
        storage::remove(self.store(), StorageKey::Students)?;
        info!("cleared attendance and rosters");
        seed::initialize(self.store())
    }

    pub fn aggregate(&self, course_id: &str, filter: &DateFilter) -> Result<Aggregation, AttendanceError> {
        let course_id = require(course_id, "course")?;
        Ok(stats::aggregate(&self.days(course_id), filter))
    }

    pub fn mark_day(
        &self,
        course_id: &str,
        date: &str,
        status: AttendanceStatus,
    ) -> Result<AttendanceDay, AttendanceError> {
        let mut day = self.get_day(course_id, date)?;
        mark_all(&mut day.rows, status);
        self.save_day(&day.course_id, &day.date, day.rows.clone())?;
        day.saved = true;
        Ok(day)
    }

    pub fn export_day(&self, course_id: &str, date: &str) -> Result<ExportFile, AttendanceError> {
        let (course_id, date) = selection(course_id, date)?;
        let rows = self.days(course_id).remove(date).unwrap_or_default();
        let content =
            format_day_csv(&rows).ok_or_else(|| AttendanceError::EmptyExportSet(date.to_string()))?;
        Ok(ExportFile {
            file_name: export_file_name(course_id, date),
            content,
        })
    }

    pub fn export_all(&self, course_id: &str) -> Result<BulkExport, AttendanceError> {
        let course_id = require(course_id, "course")?;
        let mut export = BulkExport::default();
        for (date, rows) in self.days(course_id) {
            match format_day_csv(&rows) {
                Some(content) => export.files.push(ExportFile {
                    file_name: export_file_name(course_id, &date),
                    content,
                }),
                None => {
                    warn!(course = course_id, date = %date, "no records for date, skipping export");
                    export.skipped.push(date);
                }
            }
        }

        if export.files.is_empty() {
            return Err(AttendanceError::EmptyExportSet("saved dates".into()));
        }
        info!(
            course = course_id,
            files = export.files.len(),
            skipped = export.skipped.len(),
            "exported all dates"
        );
        Ok(export)
    }

    fn rosters(&self) -> Rosters {
        storage::load(self.store(), StorageKey::Students, Rosters::new())
    }

    fn book(&self) -> AttendanceBook {
        storage::load(self.store(), StorageKey::Attendance, AttendanceBook::new())
    }

    fn days(&self, course_id: &str) -> BTreeMap<String, Vec<AttendanceRow>> {
        self.book().remove(course_id).unwrap_or_default()
    }
}

pub fn mark_all(rows: &mut [AttendanceRow], status: AttendanceStatus) {
    for row in rows {
        row.status = status;
    }
}

pub fn filter_rows<'a>(rows: &'a [AttendanceRow], query: &str) -> Vec<(usize, &'a AttendanceRow)> {
    let query = query.trim().to_lowercase();
    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            query.is_empty()
                || row.name.to_lowercase().contains(&query)
                || row.id.to_lowercase().contains(&query)
        })
        .map(|(idx, row)| (idx + 1, row))
        .collect()
}

fn require<'a>(value: &'a str, what: &'static str) -> Result<&'a str, AttendanceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AttendanceError::MissingSelection(what));
    }
    Ok(value)
}

fn selection<'a>(course_id: &'a str, date: &'a str) -> Result<(&'a str, &'a str), AttendanceError> {
    Ok((require(course_id, "course")?, require(date, "date")?))
}
