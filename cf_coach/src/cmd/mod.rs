pub mod export;
pub mod heatmap;
pub mod prompt;
pub mod server;
pub mod stats;
pub mod student;
pub mod sync;

use anyhow::{Context, Result};
use cf_coach_libs::{codeforces::DEFAULT_API_URL, store::RosterStore};
use clap::ValueEnum;
use std::{
    env, fmt,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum ExportTarget {
    Csv,
    Pdf,
    Report,
}

impl fmt::Display for ExportTarget {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExportTarget::Csv => write!(f, "csv"),
            ExportTarget::Pdf => write!(f, "pdf"),
            ExportTarget::Report => write!(f, "report"),
        }
    }
}

#[derive(Debug, ValueEnum, Clone, Copy)]
pub enum PromptKind {
    Performance,
    WeakArea,
    Daily,
}

impl fmt::Display for PromptKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PromptKind::Performance => write!(f, "performance"),
            PromptKind::WeakArea => write!(f, "weak-area"),
            PromptKind::Daily => write!(f, "daily"),
        }
    }
}

/// Runtime configuration read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub api_url: String,
    pub export_dir: PathBuf,
    pub sync_interval: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("CF_COACH_DATA_DIR").unwrap_or_else(|_| {
            tracing::warn!("CF_COACH_DATA_DIR environment variable is not set. Default value `./data` will be used.");
            String::from("./data")
        });
        let api_url = env::var("CODEFORCES_API_URL").unwrap_or_else(|_| {
            tracing::debug!("CODEFORCES_API_URL environment variable is not set. Default value `{}` will be used.", DEFAULT_API_URL);
            String::from(DEFAULT_API_URL)
        });
        let export_dir = env::var("EXPORT_SAVE_DIRECTORY").unwrap_or_else(|_| {
            tracing::debug!("EXPORT_SAVE_DIRECTORY environment variable is not set. Exports will be saved in the current directory.");
            String::from(".")
        });
        let sync_interval = match env::var("SYNC_INTERVAL_MS") {
            Ok(value) => value.parse::<u64>().with_context(|| {
                let message = format!("SYNC_INTERVAL_MS must be a number of milliseconds, got `{}`", value);
                tracing::error!(message);
                message
            })?,
            Err(_) => 2000,
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            api_url,
            export_dir: PathBuf::from(export_dir),
            sync_interval: Duration::from_millis(sync_interval),
        })
    }

    pub fn store(&self) -> RosterStore {
        tracing::debug!("Roster directory: {}", self.data_dir.display());
        RosterStore::new(&self.data_dir)
    }
}

pub async fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }

    tracing::warn!(
        "The directory {} doesn't exists, so attempt to create it",
        dir.display()
    );
    match tokio::fs::create_dir_all(dir).await {
        Ok(_) => {
            tracing::info!("The directory {} was successfully created", dir.display());
            Ok(())
        }
        Err(e) => {
            let message = format!(
                "failed to create the directory {} cause {:?}",
                dir.display(),
                e
            );
            tracing::error!(message);
            anyhow::bail!(message)
        }
    }
}
