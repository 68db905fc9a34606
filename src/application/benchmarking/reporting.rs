use crate::application::benchmarking::engine::{CaseEvaluation, EvaluationOutcome};
use crate::domain::evaluation::ValidationMetrics;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use statrs::statistics::Statistics;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
pub struct EvaluationReport {
    pub timestamp: DateTime<Utc>,
    pub case_file: String,
    pub metrics: ValidationMetrics,
    pub error_std_dev: f64,
    pub worst_cases: Vec<CaseEvaluation>,
}

pub struct EvaluationReporter {
    output_dir: PathBuf,
}

impl EvaluationReporter {
    pub fn new(output_dir: &Path) -> Result<Self> {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("creating report directory {output_dir:?}"))?;
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    pub fn print_summary(&self, outcome: &EvaluationOutcome) {
        let m = &outcome.metrics;
        if m.total_cases == 0 {
            println!("No cases evaluated.");
            return;
        }

        println!("\n{}", "=".repeat(72));
        println!("  REIMBURSEMENT EVALUATION SUMMARY");
        println!("{}", "=".repeat(72));
        println!("  Cases:          {}", m.total_cases);
        println!(
            "  Exact matches:  {} ({:.1}%)",
            m.exact_matches,
            m.exact_match_rate()
        );
        println!(
            "  Close matches:  {} ({:.1}%)",
            m.close_matches,
            m.close_match_rate()
        );
        println!("  Avg error:      ${:.2}", m.mean_absolute_error);
        println!("  Max error:      ${:.2}", m.max_error);
        println!("  Score:          {:.2}  (lower is better)", m.score);

        println!("\n  Per-estimator breakdown:");
        println!(
            "  {:<18} | {:>7} | {:>10}",
            "Estimator", "Cases", "MAE"
        );
        println!("  {}", "-".repeat(42));
        for (source, count, mae) in outcome.source_breakdown() {
            println!("  {:<18} | {:>7} | {:>9.2}$", source, count, mae);
        }

        let worst = outcome.worst_cases(5);
        if worst.iter().any(|c| c.error.abs() > m.mean_absolute_error) {
            println!("\n  Worst cases:");
            println!(
                "  {:>4} | {:>8} | {:>9} | {:>9} | {:>9} | {:>9}",
                "Days", "Miles", "Receipts", "Expected", "Predicted", "Error"
            );
            println!("  {}", "-".repeat(64));
            for c in worst {
                println!(
                    "  {:>4} | {:>8.1} | {:>9.2} | {:>9.2} | {:>9.2} | {:>+9.2}",
                    c.days, c.miles, c.receipts, c.expected, c.predicted, c.error
                );
            }
        }
        println!("{}\n", "=".repeat(72));
    }

    /// Writes the report JSON and returns its path.
    pub fn write_report(
        &self,
        outcome: &EvaluationOutcome,
        case_file: &Path,
    ) -> Result<PathBuf> {
        let errors: Vec<f64> = outcome.cases.iter().map(|c| c.error.abs()).collect();
        let report = EvaluationReport {
            timestamp: Utc::now(),
            case_file: case_file.to_string_lossy().to_string(),
            metrics: outcome.metrics.clone(),
            error_std_dev: if errors.len() > 1 {
                errors.std_dev()
            } else {
                0.0
            },
            worst_cases: outcome.worst_cases(10).into_iter().cloned().collect(),
        };

        let filename = format!(
            "evaluation_report_{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.output_dir.join(filename);
        let json = serde_json::to_string_pretty(&report).context("serializing report")?;
        fs::write(&path, json).with_context(|| format!("writing report {path:?}"))?;
        Ok(path)
    }
}
