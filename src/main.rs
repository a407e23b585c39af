use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sales_analytics::cli::{Cli, Commands};
use sales_analytics::config::{load_dotenv, Config};
use sales_analytics::{analyze_file, catalog_for, run, PipelineOutcome};

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries progress and JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let config = cli.to_config();

    let result = match cli.resolved_command() {
        Commands::Run => run_pipeline(&config),
        Commands::Analyze { pretty } => run_analyze(&config, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "run failed");
            println!("\n!!! CRITICAL ERROR !!!");
            println!("An unexpected error occurred: {}", e);
            println!("The program will now exit safely.");
            println!("{}", "=".repeat(40));
            ExitCode::FAILURE
        }
    }
}

fn run_pipeline(config: &Config) -> Result<()> {
    println!("{}", "=".repeat(40));
    println!("SALES ANALYTICS SYSTEM");
    println!("{}\n", "=".repeat(40));

    let catalog = catalog_for(config);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();

    let outcome = run(config, catalog.as_ref(), &mut input, &mut out)?;

    match &outcome {
        PipelineOutcome::Completed(summary) => {
            tracing::info!(
                records = summary.analysis.record_count,
                revenue = summary.analysis.total_revenue,
                "pipeline complete"
            );
            println!("{}", "=".repeat(40));
        }
        PipelineOutcome::NoInput | PipelineOutcome::NoValidRecords => {
            tracing::warn!(?outcome, "pipeline stopped early");
        }
    }

    Ok(())
}

fn run_analyze(config: &Config, pretty: bool) -> Result<()> {
    let Some(analysis) = analyze_file(config)? else {
        eprintln!("No valid transactions available to analyze.");
        return Ok(());
    };

    let json = if pretty {
        serde_json::to_string_pretty(&analysis)
    } else {
        serde_json::to_string(&analysis)
    }
    .context("Failed to serialize analysis")?;

    println!("{}", json);
    Ok(())
}
