use crate::models::AttendanceRow;

const HEADER: &str = "No,Name,StudentID,Status,Note";

pub fn export_file_name(course_id: &str, date: &str) -> String {
    format!("{course_id}-attendance-{date}.csv")
}

/// Renders one saved day as CSV. Returns `None` when there are no rows.
pub fn format_day_csv(rows: &[AttendanceRow]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(HEADER.to_string());
    for (idx, row) in rows.iter().enumerate() {
        lines.push(format!(
            "{},{},{},{},{}",
            idx + 1,
            quote(&row.name),
            quote(&row.id),
            row.status.as_str(),
            quote(&row.note),
        ));
    }
    Some(lines.join("\n"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttendanceStatus;

    fn rows() -> Vec<AttendanceRow> {
        vec![
            AttendanceRow {
                id: "21001".into(),
                name: "sabrina".into(),
                status: AttendanceStatus::Present,
                note: String::new(),
            },
            AttendanceRow {
                id: "21002".into(),
                name: "akter, jr".into(),
                status: AttendanceStatus::Absent,
                note: "said \"sick\"".into(),
            },
        ]
    }

    #[test]
    fn renders_header_and_numbered_rows() {
        let csv = format_day_csv(&rows()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "No,Name,StudentID,Status,Note",
                r#"1,"sabrina","21001",present,"""#,
                r#"2,"akter, jr","21002",absent,"said ""sick""""#,
            ]
        );
    }

    #[test]
    fn quoted_note_parses_back_exactly() {
        let csv = format_day_csv(&rows()).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(&records[1][1], "akter, jr");
        assert_eq!(&records[1][3], "absent");
        assert_eq!(&records[1][4], "said \"sick\"");
    }

    #[test]
    fn empty_day_has_no_export() {
        assert!(format_day_csv(&[]).is_none());
    }

    #[test]
    fn file_name_is_derived_from_course_and_date() {
        assert_eq!(
            export_file_name("CSE101", "2024-01-10"),
            "CSE101-attendance-2024-01-10.csv"
        );
    }
}
