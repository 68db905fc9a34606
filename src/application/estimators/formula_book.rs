use crate::domain::formula::FormulaBook;
use crate::domain::ports::{Estimate, Estimator};
use crate::domain::trip::TripInput;

/// Evaluates a discovered per-case formula when one exists for the trip.
pub struct FormulaBookEstimator {
    book: FormulaBook,
}

impl FormulaBookEstimator {
    pub fn new(book: FormulaBook) -> Self {
        Self { book }
    }

    pub fn book(&self) -> &FormulaBook {
        &self.book
    }
}

impl Estimator for FormulaBookEstimator {
    fn name(&self) -> &'static str {
        "formula-book"
    }

    fn estimate(&self, trip: &TripInput) -> Option<Estimate> {
        self.book
            .lookup(trip)
            .map(|entry| Estimate::new(entry.evaluate(trip), 0.95))
    }
}
