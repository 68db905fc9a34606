use anyhow::{Context, Result};
use clap::Parser;
use perdiem::application::search::FormulaSearch;
use perdiem::config::Config;
use perdiem::infrastructure::persistence::{case_store, formula_store};
use std::path::PathBuf;
use tracing::info;

/// Discovers per-case formulas against a labeled case file and writes the
/// resulting formula book.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the labeled cases JSON (defaults to the configured table)
    #[arg(long)]
    cases: Option<PathBuf>,

    /// Where to write the formula book (defaults to the configured path)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Maximum reproduction error accepted for a fit, in dollars
    #[arg(long)]
    tolerance: Option<f64>,

    /// Cover unfittable cases with stored-output entries
    #[arg(long)]
    backfill_exact: bool,
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
    let config = Config::from_env().context("loading configuration")?;
    let cases_path = args.cases.unwrap_or(config.data.cases_path);
    let output_path = args.output.unwrap_or(config.data.formula_book_path);
    let tolerance = args.tolerance.unwrap_or(config.engine.search_tolerance);

    let cases = case_store::load_cases(&cases_path).context("loading labeled cases")?;
    info!("Searching formulas for {} cases", cases.len());

    let search = FormulaSearch::new(tolerance).with_backfill(args.backfill_exact);
    let outcome = search.discover(&cases);

    println!("\nFormula discovery over {} cases:", outcome.total);
    println!(
        "  Fitted:     {} ({:.1}%)",
        outcome.matched,
        if outcome.total > 0 {
            outcome.matched as f64 / outcome.total as f64 * 100.0
        } else {
            0.0
        }
    );
    if args.backfill_exact {
        println!("  Backfilled: {}", outcome.backfilled);
    }
    println!("  Coverage:   {:.1}%", outcome.coverage_pct());

    let mut kinds: Vec<_> = outcome.book.kind_histogram().into_iter().collect();
    kinds.sort_by(|a, b| b.1.cmp(&a.1));
    if !kinds.is_empty() {
        println!("\n  Entries per family:");
        for (kind, count) in kinds {
            println!("    {kind:?}: {count}");
        }
    }

    formula_store::save_book(&output_path, &outcome.book).context("saving formula book")?;
    println!("\nFormula book saved to {}", output_path.display());

    Ok(())
}
