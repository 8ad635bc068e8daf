use crate::errors::AttendanceError;
use crate::models::{AttendanceBook, Course, Rosters, Student};
use crate::storage::{self, Store, StorageKey};
use serde::Serialize;
use tracing::info;

const SAMPLE_COURSES: [(&str, &str, &str, &str); 2] = [
    ("CSE101", "Web Development", "Computer Science", "10:00 AM - 11:30 AM"),
    ("CSE202", "Data Structures", "CSE", "12:00 PM - 01:30 PM"),
];

const SAMPLE_STUDENTS: [(&str, &str); 5] = [
    ("21001", "sabrina"),
    ("21002", "akter"),
    ("21003", "zannat"),
    ("21004", "mim"),
    ("21005", "sadia"),
];

pub fn sample_courses() -> Vec<Course> {
    SAMPLE_COURSES
        .iter()
        .map(|(id, name, dept, time)| Course {
            id: id.to_string(),
            name: name.to_string(),
            dept: dept.to_string(),
            time: time.to_string(),
        })
        .collect()
}

pub fn sample_students() -> Vec<Student> {
    SAMPLE_STUDENTS
        .iter()
        .map(|(id, name)| Student {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub seeded_courses: bool,
    pub seeded_rosters: usize,
    pub seeded_ledger: bool,
}

// A sample course only gets the sample roster when it has no roster entry at all.
pub fn initialize(store: &dyn Store) -> Result<SeedReport, AttendanceError> {
    let mut report = SeedReport::default();

    if storage::load_opt::<Vec<Course>>(store, StorageKey::Courses).is_none() {
        storage::save(store, StorageKey::Courses, &sample_courses())?;
        report.seeded_courses = true;
    }

    let mut rosters: Rosters = storage::load(store, StorageKey::Students, Rosters::new());
    for course in sample_courses() {
        if !rosters.contains_key(&course.id) {
            rosters.insert(course.id, sample_students());
            report.seeded_rosters += 1;
        }
    }
    storage::save(store, StorageKey::Students, &rosters)?;

    if storage::load_opt::<AttendanceBook>(store, StorageKey::Attendance).is_none() {
        storage::save(store, StorageKey::Attendance, &AttendanceBook::new())?;
        report.seeded_ledger = true;
    }

    info!(
        courses = report.seeded_courses,
        rosters = report.seeded_rosters,
        ledger = report.seeded_ledger,
        "store initialized"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn first_run_seeds_everything() {
        let store = MemoryStore::new();
        let report = initialize(&store).unwrap();
        assert_eq!(
            report,
            SeedReport {
                seeded_courses: true,
                seeded_rosters: 2,
                seeded_ledger: true,
            }
        );

        let rosters: Rosters = storage::load(&store, StorageKey::Students, Rosters::new());
        assert_eq!(rosters["CSE101"].len(), 5);
        assert_eq!(rosters["CSE202"].len(), 5);
    }

    #[test]
    fn second_run_does_not_duplicate_rosters() {
        let store = MemoryStore::new();
        initialize(&store).unwrap();
        let report = initialize(&store).unwrap();
        assert_eq!(report, SeedReport::default());

        let rosters: Rosters = storage::load(&store, StorageKey::Students, Rosters::new());
        assert_eq!(rosters["CSE101"].len(), 5);
    }

    #[test]
    fn empty_roster_is_kept_as_is() {
        let store = MemoryStore::new();
        let mut rosters = Rosters::new();
        rosters.insert("CSE101".into(), Vec::new());
        storage::save(&store, StorageKey::Students, &rosters).unwrap();

        let report = initialize(&store).unwrap();
        assert_eq!(report.seeded_rosters, 1);

        let rosters: Rosters = storage::load(&store, StorageKey::Students, Rosters::new());
        assert!(rosters["CSE101"].is_empty());
        assert_eq!(rosters["CSE202"].len(), 5);
    }

    #[test]
    fn corrupt_course_list_is_reseeded() {
        let store = MemoryStore::new();
        store.write(StorageKey::Courses, "[{").unwrap();
        assert!(initialize(&store).unwrap().seeded_courses);
        let courses: Vec<Course> = storage::load(&store, StorageKey::Courses, Vec::new());
        assert_eq!(courses, sample_courses());
    }
}
