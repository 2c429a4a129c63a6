pub mod layout;
pub mod pdf;
pub mod report;
pub mod roster;

use crate::fs::write_atomically;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV data")]
    CsvError(#[from] csv::Error),
    #[error("failed to render PDF document: {0}")]
    RenderError(String),
    #[error("failed to save export file")]
    IoError(#[from] std::io::Error),
}

pub fn report_file_name(student_name: &str, date: DateTime<Utc>) -> String {
    let name = student_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect::<String>();
    format!("{}_Codeforces_Report_{}.pdf", name, date.format("%Y%m%d"))
}

pub fn roster_csv_file_name(date: DateTime<Utc>) -> String {
    format!("students_{}.csv", date.format("%Y-%m-%d"))
}

pub fn roster_pdf_file_name(date: DateTime<Utc>) -> String {
    format!("students_{}.pdf", date.format("%Y-%m-%d"))
}

/// Persists a finished export under `dir`. Nothing is left behind when the
/// write fails.
pub async fn save(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(file_name);
    write_atomically(&path, bytes).await?;
    tracing::info!("{} bytes written to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    #[test]
    fn test_file_names() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 10, 0, 0).unwrap();
        assert_eq!(
            report_file_name("Jane O'Neil", date),
            "Jane_O_Neil_Codeforces_Report_20240309.pdf"
        );
        assert_eq!(roster_csv_file_name(date), "students_2024-03-09.csv");
        assert_eq!(roster_pdf_file_name(date), "students_2024-03-09.pdf");
    }

    #[tokio::test]
    async fn test_save() {
        let dir = std::env::temp_dir().join(format!("cf_coach_export_{}", Uuid::new_v4()));
        let path = save(&dir, "students.csv", b"Name\n").await.unwrap();
        assert_eq!(path, dir.join("students.csv"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"Name\n");

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_failed_save_produces_no_file() {
        let dir = std::env::temp_dir().join(format!("cf_coach_export_{}", Uuid::new_v4()));
        let target = dir.join("report.pdf");
        tokio::fs::create_dir_all(target.join("keep")).await.unwrap();

        let result = save(&dir, "report.pdf", b"%PDF-1.3").await;
        assert!(matches!(result, Err(ExportError::IoError(_))));
        assert!(target.is_dir());
        assert!(target.join("keep").is_dir());
        assert!(!dir.join(".report.pdf.tmp").exists());

        let mut entries = tokio::fs::read_dir(&dir).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["report.pdf"]);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
