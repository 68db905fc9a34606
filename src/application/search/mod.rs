mod candidates;

use crate::domain::formula::{FormulaBook, FormulaEntry, FormulaKind};
use crate::domain::trip::LabeledCase;
use rayon::prelude::*;
use tracing::debug;

/// Result of a discovery run over a labeled case set.
#[derive(Debug)]
pub struct SearchOutcome {
    pub book: FormulaBook,
    /// Cases covered by a fitted formula.
    pub matched: usize,
    /// Cases covered by a stored-output entry (backfill enabled).
    pub backfilled: usize,
    pub total: usize,
}

impl SearchOutcome {
    pub fn coverage_pct(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.matched + self.backfilled) as f64 / self.total as f64 * 100.0
    }
}

/// Per-case formula discovery.
///
/// For every labeled case the search walks a fixed sequence of formula
/// families, gridding the shape coefficients and solving the last one in
/// closed form; the first candidate that reproduces the recorded output
/// within tolerance wins. The family order is fixed, so discovery is
/// deterministic.
pub struct FormulaSearch {
    tolerance: f64,
    backfill_exact: bool,
}

impl FormulaSearch {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            backfill_exact: false,
        }
    }

    /// When enabled, cases no family fits get an `Exact` entry carrying the
    /// recorded output, so the book covers the whole case set.
    pub fn with_backfill(mut self, enable: bool) -> Self {
        self.backfill_exact = enable;
        self
    }

    pub fn discover(&self, cases: &[LabeledCase]) -> SearchOutcome {
        let fits: Vec<Option<FormulaEntry>> = cases
            .par_iter()
            .enumerate()
            .map(|(index, case)| {
                candidates::fit_case(case, self.tolerance).map(|mut entry| {
                    entry.case_num = index + 1;
                    entry
                })
            })
            .collect();

        let mut book = FormulaBook::new();
        let mut matched = 0;
        let mut backfilled = 0;

        for (index, (case, fit)) in cases.iter().zip(fits).enumerate() {
            let key = case.trip.lookup_key();
            let entry = match fit {
                Some(entry) => {
                    matched += 1;
                    entry
                }
                None if self.backfill_exact => {
                    backfilled += 1;
                    FormulaEntry {
                        case_num: index + 1,
                        kind: FormulaKind::Exact,
                        coeffs: vec![],
                        expected: case.expected_output,
                    }
                }
                None => continue,
            };

            if book.insert(key.clone(), entry).is_err() {
                // Same triple surveyed twice; the first fit stands.
                debug!(key = %key, "duplicate input triple, keeping earlier entry");
            }
        }

        SearchOutcome {
            book,
            matched,
            backfilled,
            total: cases.len(),
        }
    }
}
