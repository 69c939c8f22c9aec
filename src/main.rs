use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod config;
mod detail;
mod error;
mod export;
mod models;
mod parse;
mod rank;
mod sheets;
mod validate;

use config::SheetsConfig;
use models::ClassLevel;
use sheets::SheetsClient;

#[derive(Parser)]
#[command(name = "sheet-leaderboard")]
#[command(about = "Spreadsheet-backed class leaderboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configuration status with secrets masked
    CheckConfig,
    /// Fetch and print the ranked leaderboard for a class
    Board {
        #[arg(long, value_enum, default_value_t = ClassLevel::PlusOne)]
        class: ClassLevel,
        /// Run invariant checks and print violations as diagnostics
        #[arg(long)]
        check: bool,
    },
    /// Fetch the leaderboard and write it as CSV
    Export {
        #[arg(long, value_enum, default_value_t = ClassLevel::PlusOne)]
        class: ClassLevel,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fetch the per-subject breakdown for one student
    Detail {
        #[arg(long, value_enum, default_value_t = ClassLevel::PlusOne)]
        class: ClassLevel,
        #[arg(long)]
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_leaderboard=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = SheetsConfig::from_env();

    match cli.command {
        Commands::CheckConfig => {
            let status = config.validate();
            println!("{}", config.describe());
            if status.is_valid {
                println!("Configuration is complete.");
            } else {
                println!("Configuration problems:");
                for error in &status.errors {
                    println!("- {error}");
                }
            }
        }
        Commands::Board { class, check } => {
            let client = SheetsClient::new(config);
            let students = client.fetch_class(class).await?;

            if students.is_empty() && class.empty_means_not_started() {
                println!("The {} exam has not started yet.", class.sheet_tab());
                return Ok(());
            }

            println!("{:<5} {:<24} {:>11}  Trend", "Rank", "Name", "Total");
            for student in &students {
                println!(
                    "{:<5} {:<24} {:>11}  {}",
                    student.rank,
                    student.name,
                    student.total_score,
                    student.trend.arrow()
                );
            }

            if check {
                let report = validate::validate_students(&students);
                if report.is_valid {
                    println!("\nAll invariant checks passed.");
                } else {
                    println!("\nInvariant violations:");
                    for violation in &report.violations {
                        println!("- {violation}");
                    }
                }
            }
        }
        Commands::Export { class, out } => {
            let client = SheetsClient::new(config);
            let students = client.fetch_class(class).await?;
            let csv = export::leaderboard_csv(&students)?;
            let out = out.unwrap_or_else(|| PathBuf::from(export::default_export_name(class)));
            std::fs::write(&out, csv)?;
            println!("Exported {} students to {}.", students.len(), out.display());
        }
        Commands::Detail { class, name } => {
            let client = SheetsClient::new(config);
            match client.fetch_subject_breakdown(class, &name).await? {
                Some(breakdown) => {
                    println!("{}", breakdown.name);
                    if let Some(total) = breakdown.total_score {
                        println!("Total: {total}");
                    }
                    for (subject, score) in &breakdown.subjects {
                        println!("- {subject}: {score}");
                    }
                }
                None => {
                    println!("No student named {name:?} found in {}.", class.sheet_tab());
                }
            }
        }
    }

    Ok(())
}
