// JSON case table loading
pub mod case_store;

// Formula book load/save
pub mod formula_store;

// CSV feature matrix export for external analysis
pub mod feature_export;
