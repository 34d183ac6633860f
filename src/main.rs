use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use ects_cancellation_planner::config::PlannerConfig;
use ects_cancellation_planner::models::{CategorySummary, Subject, TranscriptSummary};
use ects_cancellation_planner::{optimize_cancellation, report, transcript};
use ects_cancellation_planner::{CancellationOutcome, CancellationPolicy, SubjectIdGenerator};

#[derive(Parser)]
#[command(name = "ects-planner", version)]
#[command(about = "Find the subjects to cancel for the best ECTS-weighted average", long_about = None)]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(flatten)]
    config: PlannerConfig,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every subject of the transcript
    List,
    /// Print summary statistics
    Stats,
    /// Search for the best subjects to cancel
    Optimize,
    /// Generate a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

#[derive(Serialize)]
struct StatsOutput<'a> {
    summary: &'a TranscriptSummary,
    categories: &'a [CategorySummary],
}

fn load_subjects(config: &PlannerConfig) -> anyhow::Result<Vec<Subject>> {
    let mut ids = SubjectIdGenerator::new();
    match &config.csv {
        Some(path) => transcript::load_csv(path, &mut ids),
        None => transcript::demo_transcript(&mut ids),
    }
}

fn cancellation_policy(config: &PlannerConfig) -> anyhow::Result<CancellationPolicy> {
    config.policy().context("invalid cancellation settings")
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let subjects = load_subjects(&cli.config).context("failed to load transcript")?;

    match cli.command {
        Commands::List => {
            if cli.json {
                return print_json(&subjects);
            }
            println!("=== TRANSCRIPT ===");
            for subject in subjects.iter() {
                println!("{subject}");
            }
        }
        Commands::Stats => {
            let summary = report::summarize(&subjects);
            let categories = report::summarize_by_category(&subjects);
            if cli.json {
                return print_json(&StatsOutput {
                    summary: &summary,
                    categories: &categories,
                });
            }

            println!("=== STATISTICS ===");
            println!("Subjects: {}", summary.subject_count);
            println!("Total credits: {}", summary.total_credits);
            println!("Graded subjects: {}", summary.graded_count);
            println!(
                "ECTS-weighted average: {}",
                report::format_average(summary.weighted_average)
            );
            for category in categories.iter() {
                println!(
                    "- {}: {} subjects, {} credits (avg {})",
                    category.category,
                    category.subject_count,
                    category.credits,
                    report::format_average(category.weighted_average)
                );
            }
        }
        Commands::Optimize => {
            let policy = cancellation_policy(&cli.config)?;
            let outcome = optimize_cancellation(&subjects, &policy);
            if cli.json {
                return print_json(&outcome);
            }

            match outcome {
                CancellationOutcome::NoEligibleSubjects => {
                    println!("No cancellable graded subjects found.");
                }
                CancellationOutcome::NoValidCombination => {
                    println!("No valid combination found.");
                }
                CancellationOutcome::Optimized(result) => {
                    println!("=== OPTIMAL CANCELLATION ===");
                    println!("New ECTS-weighted average: {:.2}", result.new_average);
                    println!("Cancelled credits: {}", result.cancelled_credits);
                    println!("Cancelled subjects:");
                    for subject in result.cancelled.iter() {
                        println!(
                            "  - {} (grade {}, {} credits, {})",
                            subject.name(),
                            subject.grade(),
                            subject.credits(),
                            subject.category()
                        );
                    }
                    println!("Improvement: {:.2} grade points", result.improvement());
                }
            }
        }
        Commands::Report { out } => {
            let policy = cancellation_policy(&cli.config)?;
            let outcome = optimize_cancellation(&subjects, &policy);
            let report = report::build_report(
                &cli.config.source_label(),
                Utc::now().date_naive(),
                &subjects,
                &policy,
                &outcome,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
