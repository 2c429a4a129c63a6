use crate::cmd::{PromptKind, Settings};
use anyhow::Result;
use cf_coach_libs::prompt;
use clap::Args;

#[derive(Debug, Args)]
pub struct PromptArgs {
    handle: String,
    kind: PromptKind,
    /// Topic of the weak-area plan
    #[arg(long, required_if_eq("kind", "weak-area"))]
    area: Option<String>,
}

pub async fn run(args: PromptArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let student = settings.store().find_by_handle(&args.handle).await?;

    let body = match args.kind {
        PromptKind::Performance => prompt::performance_analysis(&student),
        PromptKind::WeakArea => match args.area {
            Some(area) => prompt::weak_area_plan(&student, &area),
            None => anyhow::bail!("--area is required for the weak-area prompt"),
        },
        PromptKind::Daily => prompt::daily_problems(&student),
    };
    tracing::debug!("{} prompt built for {}", args.kind, student.codeforces_handle);
    println!("{}", prompt::with_system(&body));

    Ok(())
}
