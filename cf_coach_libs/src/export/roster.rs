use crate::{
    color::BLACK,
    export::{
        layout::{Document, Layout, Weight, MARGIN},
        ExportError, Result,
    },
    models::Student,
    table::Table,
    TableRow, ToCell,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, TableRow)]
pub struct RosterCsvRow {
    #[column("Name")]
    pub name: String,
    #[column("Email")]
    pub email: String,
    #[column("Codeforces Handle")]
    pub handle: String,
    #[column("Submissions")]
    pub submissions: usize,
    #[column("Current Rating")]
    pub current_rating: Option<i32>,
    #[column("Max Rating")]
    pub max_rating: Option<i32>,
}

impl From<&Student> for RosterCsvRow {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            handle: student.codeforces_handle.clone(),
            submissions: student.submissions.len(),
            current_rating: student.current_rating,
            max_rating: student.max_rating,
        }
    }
}

pub fn csv_bytes(students: &[Student]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(RosterCsvRow::headers())?;
    for student in students.iter() {
        writer.write_record(RosterCsvRow::from(student).cells())?;
    }
    writer
        .into_inner()
        .map_err(|e| ExportError::IoError(e.into_error()))
}

fn dash(value: &str) -> String {
    if value.is_empty() {
        String::from("-")
    } else {
        value.to_string()
    }
}

fn dash_rating(rating: Option<i32>) -> String {
    rating
        .map(|rating| rating.to_string())
        .unwrap_or(String::from("-"))
}

pub fn roster_table(students: &[Student]) -> Table {
    Table::new(
        &["Name", "Email", "Handle", "Submissions", "Rating", "Max Rating"],
        students
            .iter()
            .map(|student| {
                vec![
                    dash(&student.name),
                    dash(&student.email),
                    dash(&student.codeforces_handle),
                    student.submissions.len().to_string(),
                    dash_rating(student.current_rating),
                    dash_rating(student.max_rating),
                ]
            })
            .collect(),
    )
}

pub fn roster_document(students: &[Student], generated_at: DateTime<Utc>) -> Document {
    let mut layout = Layout::new("Students List");
    layout.text(MARGIN, 20.0, 16.0, Weight::Bold, BLACK, "Students List");
    layout.advance(10.0);
    layout.table(&roster_table(students), &[]);
    layout.footer(&format!(
        "Generated on: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    layout.finish()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::models::{StudentForm, SubmissionRecord};
    use chrono::TimeZone;

    fn students() -> Vec<Student> {
        let mut rated = Student::new(StudentForm {
            name: String::from("Alice, A."),
            email: String::from("alice@example.com"),
            codeforces_handle: String::from("alice_cf"),
        });
        rated.current_rating = Some(1450);
        rated.max_rating = Some(1520);
        rated.submissions = vec![SubmissionRecord::default(); 3];

        let unrated = Student::new(StudentForm {
            name: String::from("Bob"),
            email: String::from("bob@example.com"),
            codeforces_handle: String::from("bob_cf"),
        });

        vec![rated, unrated]
    }

    #[test]
    fn test_csv_header_and_columns() {
        let bytes = csv_bytes(&students()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines[0],
            "Name,Email,Codeforces Handle,Submissions,Current Rating,Max Rating"
        );
        assert_eq!(lines[1], r#""Alice, A.",alice@example.com,alice_cf,3,1450,1520"#);
        assert_eq!(lines[2], "Bob,bob@example.com,bob_cf,0,N/A,N/A");
    }

    #[test]
    fn test_csv_empty_roster() {
        let text = String::from_utf8(csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(
            text,
            "Name,Email,Codeforces Handle,Submissions,Current Rating,Max Rating\n"
        );
    }

    #[test]
    fn test_roster_table_dashes_missing_values() {
        let table = roster_table(&students());
        assert_eq!(table.body[1][4], "-");
        assert_eq!(table.body[1][5], "-");
        assert_eq!(table.body[0][3], "3");
    }

    #[test]
    fn test_roster_document() {
        let generated_at = Utc.with_ymd_and_hms(2024, 3, 9, 10, 30, 0).unwrap();
        let document = roster_document(&students(), generated_at);
        let texts = document.texts().collect::<Vec<_>>();
        assert_eq!(texts[0], "Students List");
        assert!(texts.contains(&"Generated on: 2024-03-09 10:30:00"));
        assert!(texts.contains(&"bob_cf"));
    }
}
