use crate::domain::formula::{FormulaEntry, FormulaKind};
use crate::domain::trip::{LabeledCase, TripInput};

// Shape-coefficient grids. Rates are dollars per day / per mile / per
// receipt dollar, spanning the plausible band the coefficient analysis
// found in the historical data.
const PER_DIEM_STEPS: usize = 17; // 50 to 130 by 5
const MILE_RATE_STEPS: usize = 13; // 0.20 to 0.80 by 0.05
const RECEIPT_RATE_STEPS: usize = 19; // 0.10 to 1.00 by 0.05

fn per_diem_rates() -> impl Iterator<Item = f64> {
    (0..PER_DIEM_STEPS).map(|i| 50.0 + 5.0 * i as f64)
}

fn mile_rates() -> impl Iterator<Item = f64> {
    (0..MILE_RATE_STEPS).map(|i| 0.20 + 0.05 * i as f64)
}

fn receipt_rates() -> impl Iterator<Item = f64> {
    (0..RECEIPT_RATE_STEPS).map(|i| 0.10 + 0.05 * i as f64)
}

// Acceptance windows for the solved coefficient. A solved value outside
// its window is a degenerate fit (the family is absorbing the whole
// output into one term) and is rejected.
const RECEIPT_COEFF_WINDOW: (f64, f64) = (0.0, 2.0);
const LOG_COEFF_WINDOW: (f64, f64) = (0.0, 500.0);
const SQRT_COEFF_WINDOW: (f64, f64) = (0.0, 50.0);
const CONSTANT_WINDOW: (f64, f64) = (-500.0, 1500.0);

/// Tries every family in a fixed order; first reproduction within
/// tolerance wins.
pub(super) fn fit_case(case: &LabeledCase, tolerance: f64) -> Option<FormulaEntry> {
    fit_linear(case, tolerance)
        .or_else(|| fit_linear_with_constant(case, tolerance))
        .or_else(|| fit_log_receipts(case, tolerance))
        .or_else(|| fit_sqrt_miles(case, tolerance))
        .or_else(|| fit_receipt_dominant(case, tolerance))
}

fn within(window: (f64, f64), value: f64) -> bool {
    value.is_finite() && value >= window.0 && value <= window.1
}

fn verified(
    kind: FormulaKind,
    coeffs: Vec<f64>,
    case: &LabeledCase,
    tolerance: f64,
) -> Option<FormulaEntry> {
    let entry = FormulaEntry {
        case_num: 0,
        kind,
        coeffs,
        expected: case.expected_output,
    };
    let error = (entry.evaluate(&case.trip) - case.expected_output).abs();
    (error <= tolerance).then_some(entry)
}

/// a*d + b*m + c*r with a, b gridded and c solved.
fn fit_linear(case: &LabeledCase, tolerance: f64) -> Option<FormulaEntry> {
    let (d, m, r) = split(&case.trip);
    if r < 0.5 {
        return None;
    }
    for a in per_diem_rates() {
        for b in mile_rates() {
            let c = (case.expected_output - a * d - b * m) / r;
            if within(RECEIPT_COEFF_WINDOW, c)
                && let Some(entry) =
                    verified(FormulaKind::Linear, vec![a, b, c], case, tolerance)
            {
                return Some(entry);
            }
        }
    }
    None
}

/// a*d + b*m + c*r + k with the constant solved.
fn fit_linear_with_constant(case: &LabeledCase, tolerance: f64) -> Option<FormulaEntry> {
    let (d, m, r) = split(&case.trip);
    for a in per_diem_rates() {
        for b in mile_rates() {
            for c in receipt_rates() {
                let k = case.expected_output - a * d - b * m - c * r;
                if within(CONSTANT_WINDOW, k)
                    && let Some(entry) = verified(
                        FormulaKind::LinearWithConstant,
                        vec![a, b, c, k],
                        case,
                        tolerance,
                    )
                {
                    return Some(entry);
                }
            }
        }
    }
    None
}

/// a*d + b*m + c*log1p(r) with c solved.
fn fit_log_receipts(case: &LabeledCase, tolerance: f64) -> Option<FormulaEntry> {
    let (d, m, r) = split(&case.trip);
    let log_r = r.ln_1p();
    if log_r < 0.1 {
        return None;
    }
    for a in per_diem_rates() {
        for b in mile_rates() {
            let c = (case.expected_output - a * d - b * m) / log_r;
            if within(LOG_COEFF_WINDOW, c)
                && let Some(entry) =
                    verified(FormulaKind::LogReceipts, vec![a, b, c], case, tolerance)
            {
                return Some(entry);
            }
        }
    }
    None
}

/// a*d + b*sqrt(m) + c*r with b solved.
fn fit_sqrt_miles(case: &LabeledCase, tolerance: f64) -> Option<FormulaEntry> {
    let (d, m, r) = split(&case.trip);
    let sqrt_m = m.sqrt();
    if sqrt_m < 1.0 {
        return None;
    }
    for a in per_diem_rates() {
        for c in receipt_rates() {
            let b = (case.expected_output - a * d - c * r) / sqrt_m;
            if within(SQRT_COEFF_WINDOW, b)
                && let Some(entry) =
                    verified(FormulaKind::SqrtMiles, vec![a, b, c], case, tolerance)
            {
                return Some(entry);
            }
        }
    }
    None
}

/// a*r + b*d + k for receipt-heavy cases, with the constant solved.
fn fit_receipt_dominant(case: &LabeledCase, tolerance: f64) -> Option<FormulaEntry> {
    let (d, _, r) = split(&case.trip);
    if r < 100.0 {
        return None;
    }
    for a in receipt_rates() {
        for b in per_diem_rates() {
            let k = case.expected_output - a * r - b * d;
            if within(CONSTANT_WINDOW, k)
                && let Some(entry) = verified(
                    FormulaKind::ReceiptDominantWithDays,
                    vec![a, b, k],
                    case,
                    tolerance,
                )
            {
                return Some(entry);
            }
        }
    }
    None
}

fn split(trip: &TripInput) -> (f64, f64, f64) {
    (f64::from(trip.days()), trip.miles(), trip.receipts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::trip::TripInput;

    fn case(days: u32, miles: f64, receipts: f64, expected: f64) -> LabeledCase {
        LabeledCase {
            trip: TripInput::new(days, miles, receipts).unwrap(),
            expected_output: expected,
        }
    }

    #[test]
    fn test_fit_reproduces_within_tolerance() {
        // 90*d + 0.5*m + 0.7*r, the two-day pattern
        let expected = 90.0 * 2.0 + 0.5 * 89.0 + 0.7 * 13.85;
        let c = case(2, 89.0, 13.85, expected);

        let entry = fit_case(&c, 0.01).unwrap();
        assert!((entry.evaluate(&c.trip) - expected).abs() <= 0.01);
    }

    #[test]
    fn test_degenerate_fits_are_rejected() {
        // Output far beyond anything the rate windows can absorb
        assert!(fit_case(&case(1, 5.0, 2.0, 50_000.0), 0.01).is_none());
    }

    #[test]
    fn test_zero_receipt_case_skips_receipt_families() {
        // Solvable only through the constant family: 80*d + 0.4*m + k
        let c = case(4, 200.0, 0.0, 80.0 * 4.0 + 0.4 * 200.0 + 100.0);
        let entry = fit_case(&c, 0.01).unwrap();
        assert!((entry.evaluate(&c.trip) - c.expected_output).abs() <= 0.01);
    }
}
