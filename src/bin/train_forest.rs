use anyhow::{Context, Result};
use clap::Parser;
use perdiem::config::Config;
use perdiem::domain::features::TripFeatures;
use perdiem::domain::trip::LabeledCase;
use perdiem::infrastructure::persistence::{case_store, feature_export};
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::path::PathBuf;

/// Trains the forest estimator on a labeled case file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the labeled cases JSON (defaults to the configured table)
    #[arg(long)]
    cases: Option<PathBuf>,

    /// Path to write the model file
    #[arg(long, default_value = "data/forest_model.json")]
    output: PathBuf,

    /// Number of trees in the random forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Maximum depth of trees
    #[arg(long, default_value_t = 8)]
    max_depth: u16,

    /// Minimum samples required to split an internal node
    #[arg(long, default_value_t = 10)]
    min_split: usize,

    /// Disable the holdout split (train on 100% of the data)
    #[arg(long)]
    no_split: bool,

    /// Expanding-window cross-validation folds. When > 1, reports the
    /// holdout MAE per fold before training the final model.
    #[arg(long, default_value_t = 0)]
    cv_folds: usize,

    /// Also export the feature matrix as CSV for external analysis
    #[arg(long)]
    export_features: Option<PathBuf>,
}

fn feature_matrix(cases: &[LabeledCase]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut x = Vec::with_capacity(cases.len());
    let mut y = Vec::with_capacity(cases.len());
    for case in cases {
        x.push(TripFeatures::extract(&case.trip).to_vector());
        y.push(case.expected_output);
    }
    (x, y)
}

fn fit(
    x: &[Vec<f64>],
    y: &[f64],
    args: &Args,
) -> Result<RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>> {
    let matrix = DenseMatrix::from_2d_vec(&x.to_vec())
        .map_err(|e| anyhow::anyhow!("matrix error: {e}"))?;
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(args.n_trees)
        .with_max_depth(args.max_depth)
        .with_min_samples_split(args.min_split);
    RandomForestRegressor::fit(&matrix, &y.to_vec(), params)
        .map_err(|e| anyhow::anyhow!("training error: {e}"))
}

fn predict(
    model: &RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>,
    x: &[Vec<f64>],
) -> Result<Vec<f64>> {
    let matrix = DenseMatrix::from_2d_vec(&x.to_vec())
        .map_err(|e| anyhow::anyhow!("matrix error: {e}"))?;
    model
        .predict(&matrix)
        .map_err(|e| anyhow::anyhow!("prediction error: {e}"))
}

fn mae(predictions: &[f64], actuals: &[f64]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    predictions
        .iter()
        .zip(actuals)
        .map(|(p, a)| (p - a).abs())
        .sum::<f64>()
        / predictions.len() as f64
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
    let cases_path = args.cases.clone().unwrap_or(config.data.cases_path.clone());

    let cases = case_store::load_cases(&cases_path).context("loading labeled cases")?;
    if cases.is_empty() {
        println!("No labeled cases found in {}", cases_path.display());
        return Ok(());
    }

    if let Some(csv_path) = &args.export_features {
        feature_export::export_features(csv_path, &cases).context("exporting features")?;
        println!("Feature matrix exported to {}", csv_path.display());
    }

    let (x, y) = feature_matrix(&cases);
    let n = x.len();

    let mean_output = y.iter().sum::<f64>() / n as f64;
    println!("\nTarget distribution over {n} cases:");
    println!("  Mean:  ${mean_output:.2}");
    println!(
        "  Range: ${:.2} .. ${:.2}",
        y.iter().cloned().fold(f64::INFINITY, f64::min),
        y.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
    );

    if args.cv_folds > 1 {
        // Expanding train window, 5% gap before each test slice.
        let gap = (n as f64 * 0.05).floor() as usize;
        let mut fold_maes = Vec::with_capacity(args.cv_folds);
        for fold in 0..args.cv_folds {
            let test_start =
                (n as f64 * (0.2 + (fold as f64 / args.cv_folds as f64) * 0.6)).floor() as usize;
            let test_end = (n as f64
                * (0.2 + ((fold + 1) as f64 / args.cv_folds as f64) * 0.6))
                .floor() as usize;
            let train_end = test_start.saturating_sub(gap);
            if train_end < 10 || test_end <= test_start {
                continue;
            }
            let model = fit(&x[..train_end], &y[..train_end], &args)?;
            let predictions = predict(&model, &x[test_start..test_end])?;
            let fold_mae = mae(&predictions, &y[test_start..test_end]);
            println!("  Fold {}: holdout MAE ${:.2}", fold + 1, fold_mae);
            fold_maes.push(fold_mae);
        }
        if !fold_maes.is_empty() {
            let cv_mae = fold_maes.iter().sum::<f64>() / fold_maes.len() as f64;
            println!("CV holdout MAE: ${cv_mae:.2}");
        }
    }

    let split = if args.no_split {
        n
    } else {
        (n as f64 * 0.8).floor() as usize
    };

    println!(
        "\nTraining forest ({} trees, depth {}, min split {}) on {} cases...",
        args.n_trees, args.max_depth, args.min_split, split
    );
    let model = fit(&x[..split], &y[..split], &args)?;

    if split < n {
        let train_mae = mae(&predict(&model, &x[..split])?, &y[..split]);
        let holdout_mae = mae(&predict(&model, &x[split..])?, &y[split..]);
        println!("Train MAE:   ${train_mae:.2}");
        println!("Holdout MAE: ${holdout_mae:.2}");
        println!("Overfit gap: ${:.2}", holdout_mae - train_mae);
    }

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    serde_json::to_writer(file, &model).context("serializing model")?;
    println!("Model saved to {}", args.output.display());
    println!("Set PERDIEM_MODEL={} to enable the forest stage.", args.output.display());

    Ok(())
}
