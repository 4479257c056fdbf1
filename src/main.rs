use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod correlation;
mod dilemmas;
mod error;
mod loader;
mod models;
mod report;
mod session;
mod stats;

#[derive(Parser)]
#[command(name = "trolley-analytics")]
#[command(about = "Analysis pipeline for the trolley problem experiment", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze all stored result files and write the report
    Analyze {
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
        #[arg(long, default_value = "analysis_output")]
        out_dir: PathBuf,
    },
    /// Store one submitted session (JSON) as a results CSV
    Import {
        #[arg(long)]
        session: PathBuf,
        #[arg(long, default_value = "results")]
        results_dir: PathBuf,
    },
    /// Print the dilemma catalogue as JSON
    Dilemmas,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            results_dir,
            out_dir,
        } => analyze(&results_dir, &out_dir)?,
        Commands::Import {
            session,
            results_dir,
        } => {
            let raw = std::fs::read_to_string(&session)
                .with_context(|| format!("failed to read {}", session.display()))?;
            let submission: session::SessionSubmission = serde_json::from_str(&raw)
                .with_context(|| format!("invalid session submission in {}", session.display()))?;
            let stored = session::persist_session(&results_dir, &submission)?;
            println!("Session stored at {}.", stored.display());
        }
        Commands::Dilemmas => {
            println!("{}", serde_json::to_string_pretty(&dilemmas::all())?);
        }
    }

    Ok(())
}

fn analyze(results_dir: &Path, out_dir: &Path) -> anyhow::Result<()> {
    let records = loader::load_all_results(results_dir)?;
    if records.is_empty() {
        println!("No results found to analyze.");
        return Ok(());
    }

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let report = report::build_report(&records)?;
    report::write_report(&report, &out_dir.join("analysis_report.json"))?;
    loader::write_combined_csv(&records, &out_dir.join("combined_results.csv"))?;

    println!("Analysis complete. Results saved to {}", out_dir.display());
    println!("Total participants: {}", report.summary.total_participants);
    println!("Total responses: {}", report.summary.total_responses);
    println!(
        "Utilitarian choices: {:.2}%",
        report.summary.framework_distribution.utilitarian_percentage
    );
    println!(
        "Deontological choices: {:.2}%",
        report.summary.framework_distribution.deontological_percentage
    );
    println!(
        "Average reaction time: {:.2} seconds",
        report.summary.reaction_times.mean
    );

    Ok(())
}
