use crate::cmd::{ensure_directory, ExportTarget, Settings};
use anyhow::{Context, Result};
use cf_coach_libs::export::{
    self, pdf,
    report::{self, ReportInput},
    roster,
};
use chrono::Utc;
use clap::Args;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ExportArgs {
    target: ExportTarget,
    /// Student of the report
    #[arg(long, required_if_eq("target", "report"))]
    handle: Option<String>,
    /// File holding the performance analysis text
    #[arg(long)]
    analysis: Option<PathBuf>,
    /// File holding the daily problem set text
    #[arg(long)]
    daily: Option<PathBuf>,
    /// Output directory, overrides EXPORT_SAVE_DIRECTORY
    #[arg(long)]
    out: Option<PathBuf>,
}

async fn read_narrative(path: Option<&Path>) -> Option<String> {
    let path = path?;
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::warn!(
                "couldn't read {}, the placeholder text will be used: {:?}",
                path.display(),
                e
            );
            None
        }
    }
}

pub async fn run(args: ExportArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let store = settings.store();
    let save_dir = args.out.unwrap_or(settings.export_dir);
    ensure_directory(&save_dir).await?;

    let now = Utc::now();
    let (file_name, bytes) = match args.target {
        ExportTarget::Csv => {
            let students = store.list().await?;
            (
                export::roster_csv_file_name(now),
                roster::csv_bytes(&students)?,
            )
        }
        ExportTarget::Pdf => {
            let students = store.list().await?;
            let document = roster::roster_document(&students, now);
            (export::roster_pdf_file_name(now), pdf::render(&document)?)
        }
        ExportTarget::Report => {
            let handle = args
                .handle
                .context("--handle is required to export a report")?;
            let student = store.find_by_handle(&handle).await?;
            let analysis = read_narrative(args.analysis.as_deref()).await;
            let daily = read_narrative(args.daily.as_deref()).await;

            let document = report::student_report(&ReportInput {
                student: &student,
                analysis: analysis.as_deref(),
                daily: daily.as_deref(),
                generated_at: now,
            });
            (
                export::report_file_name(&student.name, now),
                pdf::render(&document)?,
            )
        }
    };

    let path = export::save(&save_dir, &file_name, &bytes)
        .await
        .with_context(|| {
            let message = format!("failed to export {} to {}", args.target, save_dir.display());
            tracing::error!(message);
            message
        })?;
    tracing::info!("{} export finished: {}", args.target, path.display());

    Ok(())
}
