use crate::{cmd::Settings, modules::students::synchronizer::Synchronizer};
use anyhow::{Context, Result};
use cf_coach_libs::codeforces::CodeforcesClient;
use clap::Args;
use tokio::time::Duration;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Synchronize only this student
    #[arg(long)]
    handle: Option<String>,
    /// Delay between two students in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let store = settings.store();
    let client = CodeforcesClient::new(&settings.api_url).with_context(|| {
        let message = format!(
            "couldn't create Codeforces client. check the value of CODEFORCES_API_URL: {}",
            settings.api_url
        );
        tracing::error!(message);
        message
    })?;
    let synchronizer = Synchronizer::new(&store, &client);

    match args.handle {
        Some(handle) => {
            synchronizer.sync_handle(&handle).await?;
        }
        None => {
            let interval = args
                .interval_ms
                .map(Duration::from_millis)
                .unwrap_or(settings.sync_interval);
            let report = synchronizer.sync_all(interval).await?;
            if report.failed > 0 {
                tracing::warn!("{} students couldn't be synchronized", report.failed);
            }
        }
    }

    Ok(())
}
