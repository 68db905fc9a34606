use crate::domain::features::{FEATURE_NAMES, TripFeatures};
use crate::domain::trip::LabeledCase;
use anyhow::{Context, Result};
use std::path::Path;

/// Writes the feature matrix for a case set as CSV: one row per case, the
/// registered feature columns plus the labeled output. External analysis
/// notebooks consume this file.
pub fn export_features(path: &Path, cases: &[LabeledCase]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {path:?}"))?;

    let mut header: Vec<&str> = FEATURE_NAMES.to_vec();
    header.push("expected_output");
    writer.write_record(&header).context("writing header")?;

    for case in cases {
        let mut row: Vec<String> = TripFeatures::extract(&case.trip)
            .to_vector()
            .iter()
            .map(|v| v.to_string())
            .collect();
        row.push(case.expected_output.to_string());
        writer.write_record(&row).context("writing feature row")?;
    }

    writer.flush().context("flushing feature export")?;
    Ok(())
}
