mod case_table;
mod decision_tree;
mod forest;
mod formula_book;
mod linear;

pub use case_table::CaseTable;
pub use decision_tree::DecisionTree;
pub use forest::ForestEstimator;
pub use formula_book::FormulaBookEstimator;
pub use linear::LinearHeuristic;

// Re-exported for the engine constructors' signatures
pub use crate::domain::trip::AmountBounds;
