use crate::application::engine::ReimbursementEngine;
use crate::domain::evaluation::{Tolerances, ValidationMetrics};
use crate::domain::trip::{LabeledCase, TripInput};
use rayon::prelude::*;
use serde::Serialize;

/// One evaluated case: prediction, truth, and which stage answered.
#[derive(Debug, Clone, Serialize)]
pub struct CaseEvaluation {
    pub days: u32,
    pub miles: f64,
    pub receipts: f64,
    pub expected: f64,
    pub predicted: f64,
    pub error: f64,
    pub source: &'static str,
}

/// Full outcome of an evaluation run.
#[derive(Debug)]
pub struct EvaluationOutcome {
    pub metrics: ValidationMetrics,
    pub cases: Vec<CaseEvaluation>,
}

impl EvaluationOutcome {
    /// The n worst cases by absolute error, worst first.
    pub fn worst_cases(&self, n: usize) -> Vec<&CaseEvaluation> {
        let mut sorted: Vec<&CaseEvaluation> = self.cases.iter().collect();
        sorted.sort_by(|a, b| {
            b.error
                .abs()
                .partial_cmp(&a.error.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        sorted
    }

    /// (source name, cases answered, MAE for that source).
    pub fn source_breakdown(&self) -> Vec<(&'static str, usize, f64)> {
        let mut breakdown: Vec<(&'static str, usize, f64)> = Vec::new();
        for case in &self.cases {
            match breakdown.iter_mut().find(|(name, _, _)| *name == case.source) {
                Some((_, count, abs_sum)) => {
                    *count += 1;
                    *abs_sum += case.error.abs();
                }
                None => breakdown.push((case.source, 1, case.error.abs())),
            }
        }
        for (_, count, abs_sum) in &mut breakdown {
            *abs_sum /= *count as f64;
        }
        breakdown.sort_by(|a, b| b.1.cmp(&a.1));
        breakdown
    }
}

/// Runs the engine over a labeled case set, in parallel.
pub struct EvaluationEngine {
    engine: ReimbursementEngine,
    tolerances: Tolerances,
}

impl EvaluationEngine {
    pub fn new(engine: ReimbursementEngine, tolerances: Tolerances) -> Self {
        Self { engine, tolerances }
    }

    pub fn evaluate(&self, cases: &[LabeledCase]) -> EvaluationOutcome {
        let cases: Vec<CaseEvaluation> = cases
            .par_iter()
            .map(|case| self.evaluate_one(&case.trip, case.expected_output))
            .collect();

        let errors: Vec<f64> = cases.iter().map(|c| c.error).collect();
        EvaluationOutcome {
            metrics: ValidationMetrics::from_errors(&errors, self.tolerances),
            cases,
        }
    }

    fn evaluate_one(&self, trip: &TripInput, expected: f64) -> CaseEvaluation {
        let result = self.engine.calculate(trip);
        let predicted = result.amount_f64();
        CaseEvaluation {
            days: trip.days(),
            miles: trip.miles(),
            receipts: trip.receipts(),
            expected,
            predicted,
            error: predicted - expected,
            source: result.source(),
        }
    }
}
