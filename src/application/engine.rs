use crate::application::estimators::{
    AmountBounds, CaseTable, DecisionTree, ForestEstimator, FormulaBookEstimator, LinearHeuristic,
};
use crate::domain::ports::Estimator;
use crate::domain::trip::{ReimbursementResult, TripInput};
use tracing::{debug, trace};

/// The estimation pipeline: memorized answers first, fitted models next,
/// heuristics last.
///
/// Each stage either produces an estimate or declines; the first estimate
/// wins. The linear heuristic never declines, so every valid trip gets an
/// amount. The whole pipeline is pure, so identical inputs always produce
/// identical results.
pub struct ReimbursementEngine {
    chain: Vec<Box<dyn Estimator>>,
    fallback: LinearHeuristic,
}

impl ReimbursementEngine {
    pub fn new(
        case_table: Option<CaseTable>,
        formula_book: Option<FormulaBookEstimator>,
        forest: Option<ForestEstimator>,
        bounds: AmountBounds,
    ) -> Self {
        let mut chain: Vec<Box<dyn Estimator>> = Vec::new();
        if let Some(table) = case_table {
            chain.push(Box::new(table));
        }
        if let Some(book) = formula_book {
            chain.push(Box::new(book));
        }
        if let Some(forest) = forest {
            chain.push(Box::new(forest));
        }
        chain.push(Box::new(DecisionTree));

        Self {
            chain,
            fallback: LinearHeuristic::new(bounds),
        }
    }

    /// A minimal engine with no fitted data: tree plus linear fallback.
    pub fn bare(bounds: AmountBounds) -> Self {
        Self::new(None, None, None, bounds)
    }

    pub fn calculate(&self, trip: &TripInput) -> ReimbursementResult {
        for estimator in &self.chain {
            if let Some(estimate) = estimator.estimate(trip) {
                debug!(
                    estimator = estimator.name(),
                    amount = estimate.amount,
                    "estimate accepted"
                );
                return ReimbursementResult::from_raw(
                    estimate.amount,
                    estimator.name(),
                    estimate.confidence,
                );
            }
            trace!(estimator = estimator.name(), "declined, falling through");
        }

        debug!("all estimators declined, using linear heuristic");
        ReimbursementResult::from_raw(self.fallback.predict(trip), self.fallback.name(), 0.3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::formula::{FormulaBook, FormulaEntry, FormulaKind};
    use crate::domain::trip::LabeledCase;
    use rust_decimal_macros::dec;

    fn trip(days: u32, miles: f64, receipts: f64) -> TripInput {
        TripInput::new(days, miles, receipts).unwrap()
    }

    fn engine_with_table() -> ReimbursementEngine {
        let cases = vec![LabeledCase {
            trip: trip(5, 250.0, 150.75),
            expected_output: 581.58,
        }];
        ReimbursementEngine::new(
            Some(CaseTable::from_cases(&cases)),
            None,
            None,
            AmountBounds::default(),
        )
    }

    #[test]
    fn test_case_table_takes_priority() {
        let engine = engine_with_table();
        let result = engine.calculate(&trip(5, 250.0, 150.75));
        assert_eq!(result.amount(), dec!(581.58));
        assert_eq!(result.source(), "case-table");
    }

    #[test]
    fn test_formula_book_beats_tree() {
        let mut book = FormulaBook::new();
        book.insert(
            "1,76,13.74".to_string(),
            FormulaEntry {
                case_num: 1,
                kind: FormulaKind::Linear,
                coeffs: vec![110.0, 0.6, 0.2],
                expected: 158.35,
            },
        )
        .unwrap();
        let engine = ReimbursementEngine::new(
            None,
            Some(FormulaBookEstimator::new(book)),
            None,
            AmountBounds::default(),
        );

        let result = engine.calculate(&trip(1, 76.0, 13.74));
        assert_eq!(result.amount(), dec!(158.35));
        assert_eq!(result.source(), "formula-book");
    }

    #[test]
    fn test_unknown_trip_uses_tree() {
        let engine = engine_with_table();
        let result = engine.calculate(&trip(1, 50.0, 10.0));
        assert_eq!(result.amount(), dec!(287.10));
        assert_eq!(result.source(), "decision-tree");
    }

    #[test]
    fn test_extreme_trip_falls_through_to_linear() {
        let engine = ReimbursementEngine::bare(AmountBounds::default());
        let result = engine.calculate(&trip(45, 8000.0, 30_000.0));
        assert_eq!(result.source(), "linear-heuristic");
        assert_eq!(result.amount(), dec!(2500.00));
    }

    #[test]
    fn test_deterministic_mapping() {
        let engine = engine_with_table();
        let a = engine.calculate(&trip(7, 430.0, 912.33));
        let b = engine.calculate(&trip(7, 430.0, 912.33));
        assert_eq!(a, b);
    }
}
