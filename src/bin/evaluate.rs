use anyhow::{Context, Result};
use clap::Parser;
use perdiem::application::benchmarking::engine::EvaluationEngine;
use perdiem::application::benchmarking::reporting::EvaluationReporter;
use perdiem::application::bootstrap;
use perdiem::config::Config;
use perdiem::infrastructure::persistence::case_store;
use std::path::PathBuf;
use tracing::info;

/// Scores the engine against a labeled case file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the labeled cases JSON (defaults to the configured table)
    #[arg(long)]
    cases: Option<PathBuf>,

    /// Directory to write the JSON report into
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Evaluate only the first N cases (0 = all)
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// Skip the memorized lookup stages, scoring only the fitted fallbacks
    #[arg(long)]
    no_lookup: bool,

    /// Skip writing the JSON report
    #[arg(long)]
    no_report: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    let mut config = Config::from_env().context("loading configuration")?;
    if let Some(cases) = args.cases {
        config.data.cases_path = cases;
    }
    if let Some(dir) = args.output_dir {
        config.data.results_dir = dir;
    }

    let mut cases =
        case_store::load_cases(&config.data.cases_path).context("loading labeled cases")?;
    if args.limit > 0 && cases.len() > args.limit {
        cases.truncate(args.limit);
        info!("Evaluating first {} cases only", args.limit);
    }

    // Scoring the memorized lookups against their own table is a
    // tautology; --no-lookup measures how the fallback stack generalizes.
    let engine = if args.no_lookup {
        bootstrap::build_fallback_engine(&config)
    } else {
        bootstrap::build_engine(&config)
    };

    let harness = EvaluationEngine::new(engine, config.engine.tolerances());
    let outcome = harness.evaluate(&cases);

    let reporter = EvaluationReporter::new(&config.data.results_dir)?;
    reporter.print_summary(&outcome);
    if !args.no_report {
        let path = reporter.write_report(&outcome, &config.data.cases_path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(())
}
