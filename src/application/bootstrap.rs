use crate::application::engine::ReimbursementEngine;
use crate::application::estimators::{CaseTable, ForestEstimator, FormulaBookEstimator};
use crate::config::Config;
use crate::infrastructure::persistence::{case_store, formula_store};
use tracing::{info, warn};

/// Assembles the engine from the configured data files.
///
/// Every data source is optional: a missing case table, formula book or
/// model file degrades the engine to its fallback stages with a warning,
/// matching the legacy scripts' behavior when their sidecar files were
/// absent.
pub fn build_engine(config: &Config) -> ReimbursementEngine {
    build(config, true)
}

/// Engine without the memorized lookup stages (case table and formula
/// book). The evaluation harness uses this to measure how the fitted
/// fallbacks generalize instead of scoring recall.
pub fn build_fallback_engine(config: &Config) -> ReimbursementEngine {
    build(config, false)
}

fn build(config: &Config, with_lookup: bool) -> ReimbursementEngine {
    if !with_lookup {
        let forest = load_forest(config);
        return ReimbursementEngine::new(None, None, forest, config.engine.bounds());
    }

    let case_table = match case_store::load_cases(&config.data.cases_path) {
        Ok(cases) => {
            let table = CaseTable::from_cases(&cases);
            info!(
                "Loaded {} historical cases from {:?}",
                table.len(),
                config.data.cases_path
            );
            Some(table)
        }
        Err(e) => {
            warn!(
                "Historical case table unavailable ({e:#}); continuing without exact lookup"
            );
            None
        }
    };

    let formula_book = match formula_store::load_book(&config.data.formula_book_path) {
        Ok(book) => {
            info!(
                "Loaded {} formula entries from {:?}",
                book.len(),
                config.data.formula_book_path
            );
            Some(FormulaBookEstimator::new(book))
        }
        Err(e) => {
            warn!("Formula book unavailable ({e:#}); continuing without formula lookup");
            None
        }
    };

    let forest = load_forest(config);

    ReimbursementEngine::new(case_table, formula_book, forest, config.engine.bounds())
}

fn load_forest(config: &Config) -> Option<ForestEstimator> {
    config.data.model_path.as_ref().map(|path| {
        let estimator = ForestEstimator::new(path.clone());
        if !estimator.is_loaded() {
            warn!("Forest model configured but not loaded; stage will decline");
        }
        estimator
    })
}
