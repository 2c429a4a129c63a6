use crate::{cmd::Settings, modules::models::response::StatsResponse};
use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    handle: String,
}

pub async fn run(args: StatsArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let student = settings.store().find_by_handle(&args.handle).await?;

    let response = StatsResponse::new(&student, Utc::now().year());
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
