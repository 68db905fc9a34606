use anyhow::{Context, Result};
use clap::Parser;
use perdiem::application::bootstrap;
use perdiem::config::Config;
use perdiem::domain::trip::TripInput;

/// Reproduces the legacy travel-reimbursement calculation for one trip.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trip duration in whole days
    days: u32,

    /// Total miles traveled
    miles: f64,

    /// Total receipts amount in dollars
    receipts: f64,

    /// Also print which estimator produced the amount (to stderr)
    #[arg(long)]
    explain: bool,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // The amount goes to stdout alone; logs go to stderr so the output
    // stays machine-readable.
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let args = Args::parse();
    let trip = TripInput::new(args.days, args.miles, args.receipts)
        .context("invalid trip input")?;

    let config = Config::from_env().context("loading configuration")?;
    let engine = bootstrap::build_engine(&config);

    let result = engine.calculate(&trip);
    if args.explain {
        eprintln!(
            "# {} (confidence {:.2})",
            result.source(),
            result.confidence()
        );
    }
    println!("{:.2}", result.amount());

    Ok(())
}
