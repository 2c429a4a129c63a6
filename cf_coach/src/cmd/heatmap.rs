use crate::{cmd::Settings, modules::models::response::HeatmapResponse};
use anyhow::Result;
use cf_coach_libs::{fs::write_atomically, heatmap::HeatmapFilter};
use chrono::{Datelike, Utc};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct HeatmapArgs {
    handle: String,
    #[arg(long)]
    year: Option<i32>,
    /// all, contest, practice or virtual (or their first letter)
    #[arg(long, default_value_t = HeatmapFilter::All)]
    filter: HeatmapFilter,
    /// Write the calendar as SVG instead of printing the day counts
    #[arg(long)]
    svg: Option<PathBuf>,
}

pub async fn run(args: HeatmapArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let student = settings.store().find_by_handle(&args.handle).await?;

    let (response, heatmap) =
        HeatmapResponse::new(&student, args.year, args.filter, Utc::now().year());
    tracing::info!("{}", heatmap.stats_line());

    match args.svg {
        Some(path) => {
            write_atomically(&path, heatmap.to_svg().as_bytes()).await?;
            tracing::info!("Heatmap was saved to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&response)?),
    }

    Ok(())
}
