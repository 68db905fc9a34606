use crate::domain::trip::{LabeledCase, TripInput};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// On-disk layout of one historical case.
#[derive(Debug, Deserialize)]
struct CaseRecord {
    input: CaseInput,
    expected_output: f64,
}

#[derive(Debug, Deserialize)]
struct CaseInput {
    trip_duration_days: u32,
    miles_traveled: f64,
    total_receipts_amount: f64,
}

/// Loads labeled historical cases from a JSON file.
///
/// Records that fail validation are skipped with a warning rather than
/// aborting the load; the legacy data carries a few malformed rows and the
/// original loader tolerated them the same way.
pub fn load_cases(path: &Path) -> Result<Vec<LabeledCase>> {
    let file = File::open(path).with_context(|| format!("opening case file {path:?}"))?;
    let records: Vec<CaseRecord> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing case file {path:?}"))?;

    let total = records.len();
    let mut cases = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        match TripInput::new(
            record.input.trip_duration_days,
            record.input.miles_traveled,
            record.input.total_receipts_amount,
        ) {
            Ok(trip) if record.expected_output.is_finite() && record.expected_output >= 0.0 => {
                cases.push(LabeledCase {
                    trip,
                    expected_output: record.expected_output,
                });
            }
            Ok(_) => warn!("skipping case {index}: invalid expected output"),
            Err(e) => warn!("skipping case {index}: {e}"),
        }
    }

    if cases.len() < total {
        info!("Loaded {}/{} valid cases from {:?}", cases.len(), total, path);
    }
    Ok(cases)
}
