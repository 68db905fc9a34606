use perdiem::application::engine::ReimbursementEngine;
use perdiem::application::estimators::{AmountBounds, FormulaBookEstimator};
use perdiem::application::search::FormulaSearch;
use perdiem::domain::trip::{LabeledCase, TripInput};
use perdiem::infrastructure::persistence::formula_store;

fn case(days: u32, miles: f64, receipts: f64, expected: f64) -> LabeledCase {
    LabeledCase {
        trip: TripInput::new(days, miles, receipts).unwrap(),
        expected_output: expected,
    }
}

/// Cases generated from blends the candidate grids can express.
fn synthetic_cases() -> Vec<LabeledCase> {
    vec![
        case(1, 76.0, 13.74, 110.0 + 0.6 * 76.0 + 0.2 * 13.74),
        case(2, 89.0, 13.85, 90.0 * 2.0 + 0.5 * 89.0 + 0.7 * 13.85),
        case(3, 210.0, 45.0, 80.0 * 3.0 + 0.3 * 210.0 + 0.6 * 45.0),
        case(6, 420.0, 380.0, 75.0 * 6.0 + 0.45 * 420.0 + 0.5 * 380.0 + 120.0),
        case(4, 150.0, 900.0, 0.8 * 900.0 + 95.0 * 4.0 + 60.0),
    ]
}

#[test]
fn discovered_book_reproduces_every_case() {
    let cases = synthetic_cases();
    let outcome = FormulaSearch::new(0.01).discover(&cases);
    assert_eq!(outcome.matched, cases.len());

    let engine = ReimbursementEngine::new(
        None,
        Some(FormulaBookEstimator::new(outcome.book)),
        None,
        AmountBounds::default(),
    );
    for case in &cases {
        let amount = engine.calculate(&case.trip).amount_f64();
        assert!(
            (amount - case.expected_output).abs() <= 0.01,
            "expected {} got {amount}",
            case.expected_output
        );
    }
}

#[test]
fn saved_book_survives_a_round_trip() {
    let cases = synthetic_cases();
    let outcome = FormulaSearch::new(0.01).with_backfill(true).discover(&cases);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("book.json");
    formula_store::save_book(&path, &outcome.book).unwrap();
    let reloaded = formula_store::load_book(&path).unwrap();
    assert_eq!(reloaded.len(), outcome.book.len());

    let engine = ReimbursementEngine::new(
        None,
        Some(FormulaBookEstimator::new(reloaded)),
        None,
        AmountBounds::default(),
    );
    for case in &cases {
        let amount = engine.calculate(&case.trip).amount_f64();
        assert!((amount - case.expected_output).abs() <= 0.01);
    }
}
