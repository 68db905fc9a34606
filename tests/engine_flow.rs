use perdiem::application::engine::ReimbursementEngine;
use perdiem::application::estimators::{AmountBounds, CaseTable, FormulaBookEstimator};
use perdiem::domain::trip::TripInput;
use perdiem::infrastructure::persistence::{case_store, formula_store};
use rust_decimal_macros::dec;
use std::path::Path;

fn trip(days: u32, miles: f64, receipts: f64) -> TripInput {
    TripInput::new(days, miles, receipts).unwrap()
}

/// Engine assembled from the bundled data files, as the CLI would build it.
fn bundled_engine() -> ReimbursementEngine {
    let cases = case_store::load_cases(Path::new("data/public_cases.json")).unwrap();
    let book = formula_store::load_book(Path::new("data/formula_book.json")).unwrap();
    ReimbursementEngine::new(
        Some(CaseTable::from_cases(&cases)),
        Some(FormulaBookEstimator::new(book)),
        None,
        AmountBounds::default(),
    )
}

#[test]
fn bundled_cases_reproduce_exactly() {
    let engine = bundled_engine();
    let cases = case_store::load_cases(Path::new("data/public_cases.json")).unwrap();
    assert!(!cases.is_empty());

    for case in &cases {
        let result = engine.calculate(&case.trip);
        assert!(
            (result.amount_f64() - case.expected_output).abs() <= 0.01,
            "case {:?} expected {} got {}",
            case.trip,
            case.expected_output,
            result.amount()
        );
    }
}

#[test]
fn documented_example_case() {
    let engine = bundled_engine();
    let result = engine.calculate(&trip(5, 250.0, 150.75));
    assert_eq!(result.amount(), dec!(581.58));
}

#[test]
fn unknown_trips_stay_in_plausible_range() {
    let engine = bundled_engine();
    for days in [1u32, 2, 4, 6, 9, 15, 40] {
        for miles in [0.0, 37.5, 410.0, 1500.0, 6000.0] {
            for receipts in [0.0, 12.34, 480.0, 2100.0, 15_000.0] {
                let amount = engine.calculate(&trip(days, miles, receipts)).amount_f64();
                assert!(
                    (50.0..=2500.0).contains(&amount),
                    "implausible {amount} for ({days}, {miles}, {receipts})"
                );
            }
        }
    }
}

#[test]
fn identical_inputs_yield_identical_outputs() {
    let engine = bundled_engine();
    let first = engine.calculate(&trip(6, 333.3, 217.89));
    for _ in 0..10 {
        assert_eq!(engine.calculate(&trip(6, 333.3, 217.89)), first);
    }
}

#[test]
fn priority_order_table_then_formulas_then_tree() {
    let engine = bundled_engine();

    // In both the table and the book: the table answers.
    let memorized = engine.calculate(&trip(1, 76.0, 13.74));
    assert_eq!(memorized.source(), "case-table");

    // Unknown everywhere: the tree answers.
    let unknown = engine.calculate(&trip(4, 555.0, 55.5));
    assert_eq!(unknown.source(), "decision-tree");
}
