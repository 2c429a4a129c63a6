mod cmd;
mod modules;

use crate::cmd::{
    export::{self, ExportArgs},
    heatmap::{self, HeatmapArgs},
    prompt::{self, PromptArgs},
    server::{self, ServerArgs},
    stats::{self, StatsArgs},
    student::{self, StudentArgs},
    sync::{self, SyncArgs},
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::{env, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "cf_coach")]
#[command(about = "Codeforces coaching toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage the student roster
    Student(StudentArgs),
    /// Pull profiles from Codeforces into the roster
    Sync(SyncArgs),
    /// Print aggregated statistics of a student
    Stats(StatsArgs),
    /// Build the submission heatmap of a student
    Heatmap(HeatmapArgs),
    /// Print a coaching prompt for a student
    Prompt(PromptArgs),
    /// Export the roster or a student report
    Export(ExportArgs),
    /// Serve the JSON API
    Server(ServerArgs),
}

fn main() {
    dotenv().ok();

    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .expect("couldn't parse specified log level")
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339().expect("couldn't get local time offset"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("failed to set tracing subscriber");

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime");

    match Cli::parse().command {
        Commands::Student(args) => runtime.block_on(student::run(args)),
        Commands::Sync(args) => runtime.block_on(sync::run(args)),
        Commands::Stats(args) => runtime.block_on(stats::run(args)),
        Commands::Heatmap(args) => runtime.block_on(heatmap::run(args)),
        Commands::Prompt(args) => runtime.block_on(prompt::run(args)),
        Commands::Export(args) => runtime.block_on(export::run(args)),
        Commands::Server(args) => runtime.block_on(server::run(args)),
    }
    .expect("command failed");
}
