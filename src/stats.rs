use crate::models::{AttendanceRow, AttendanceStatus, StudentAggregate};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateFilter {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl DateFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn range(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::bounded(Some(from.into()), Some(to.into()))
    }

    pub fn bounded(from: Option<String>, to: Option<String>) -> Self {
        let clean = |bound: Option<String>| bound.map(|b| b.trim().to_string()).filter(|b| !b.is_empty());
        Self {
            from: clean(from),
            to: clean(to),
        }
    }

    pub fn contains(&self, date: &str) -> bool {
        self.from.as_deref().is_none_or(|from| date >= from)
            && self.to.as_deref().is_none_or(|to| date <= to)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub dates_counted: usize,
    pub students: Vec<StudentAggregate>,
}

// Equal percents keep first-seen order; days are scanned oldest first.
pub fn aggregate(days: &BTreeMap<String, Vec<AttendanceRow>>, filter: &DateFilter) -> Aggregation {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut students: Vec<StudentAggregate> = Vec::new();
    let mut dates_counted = 0;

    for (_, rows) in days.iter().filter(|(date, _)| filter.contains(date)) {
        dates_counted += 1;
        for row in rows {
            let slot = *index.entry(row.student_key().to_string()).or_insert_with(|| {
                students.push(StudentAggregate {
                    name: row.name.clone(),
                    id: row.id.clone(),
                    present: 0,
                    total: 0,
                    percent: 0,
                });
                students.len() - 1
            });
            let entry = &mut students[slot];
            if row.status == AttendanceStatus::Present {
                entry.present = entry.present.saturating_add(1);
            }
            entry.total = entry.total.saturating_add(1);
        }
    }

    for entry in &mut students {
        entry.percent = percent(entry.present, entry.total);
    }
    students.sort_by(|a, b| b.percent.cmp(&a.percent));

    Aggregation {
        dates_counted,
        students,
    }
}

/// `present / total` as a whole percentage, halves rounded up; 0 when `total` is 0.
pub fn percent(present: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let (present, total) = (u64::from(present.min(total)), u64::from(total));
    ((present * 200 + total) / (total * 2)) as u32
}
