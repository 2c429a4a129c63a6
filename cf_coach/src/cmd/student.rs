use crate::{cmd::Settings, modules::models::response::StudentSummary};
use anyhow::{Context, Result};
use cf_coach_libs::models::StudentForm;
use clap::{Args, Subcommand};
use itertools::Itertools;

#[derive(Debug, Args)]
pub struct StudentArgs {
    #[command(subcommand)]
    command: StudentCommands,
}

#[derive(Debug, Subcommand)]
enum StudentCommands {
    /// Register a new student
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        handle: String,
    },
    /// Edit a registered student
    Update {
        handle: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        new_handle: Option<String>,
    },
    /// Remove a student from the roster
    Remove { handle: String },
    /// Show the roster
    List {
        #[arg(long)]
        json: bool,
    },
}

pub async fn run(args: StudentArgs) -> Result<()> {
    let settings = Settings::from_env()?;
    let store = settings.store();

    match args.command {
        StudentCommands::Add {
            name,
            email,
            handle,
        } => {
            let student = store
                .create(StudentForm {
                    name,
                    email,
                    codeforces_handle: handle,
                })
                .await
                .with_context(|| {
                    let message = "failed to register the student";
                    tracing::error!(message);
                    message
                })?;
            tracing::info!(
                "Student {} ({}) was registered with id {}",
                student.name,
                student.codeforces_handle,
                student.id
            );
        }
        StudentCommands::Update {
            handle,
            name,
            email,
            new_handle,
        } => {
            let student = store.find_by_handle(&handle).await?;
            let form = StudentForm {
                name: name.unwrap_or(student.name),
                email: email.unwrap_or(student.email),
                codeforces_handle: new_handle.unwrap_or(student.codeforces_handle),
            };
            let student = store.update(student.id, form).await.with_context(|| {
                let message = format!("failed to update the student {}", handle);
                tracing::error!(message);
                message
            })?;
            tracing::info!("Student {} was updated", student.codeforces_handle);
        }
        StudentCommands::Remove { handle } => {
            let student = store.find_by_handle(&handle).await?;
            let student = store.remove(student.id).await?;
            tracing::info!("Student {} was removed", student.codeforces_handle);
        }
        StudentCommands::List { json } => {
            let students: Vec<StudentSummary> = store
                .list()
                .await?
                .iter()
                .map(StudentSummary::from)
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&students)?);
            } else {
                let lines = students
                    .iter()
                    .map(|student| {
                        format!(
                            "{}\t{}\t{}\t{}\t{}",
                            student.codeforces_handle,
                            student.name,
                            student.email,
                            student
                                .current_rating
                                .map(|rating| rating.to_string())
                                .unwrap_or(String::from("N/A")),
                            student
                                .last_synced
                                .map(|time| time.format("%Y-%m-%d %H:%M").to_string())
                                .unwrap_or(String::from("never synced")),
                        )
                    })
                    .join("\n");
                println!("{}", lines);
            }
        }
    }

    Ok(())
}
