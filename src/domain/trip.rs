use crate::domain::errors::TripValidationError;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

/// A single trip to be reimbursed.
///
/// Validated on construction: duration is at least one day, miles and
/// receipts are non-negative finite numbers. Instances are immutable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TripInput {
    days: u32,
    miles: f64,
    receipts: f64,
}

impl TripInput {
    pub fn new(days: u32, miles: f64, receipts: f64) -> Result<Self, TripValidationError> {
        if days == 0 {
            return Err(TripValidationError::InvalidDuration { days });
        }
        if !miles.is_finite() || miles < 0.0 {
            return Err(TripValidationError::InvalidMiles { miles });
        }
        if !receipts.is_finite() || receipts < 0.0 {
            return Err(TripValidationError::InvalidReceipts { receipts });
        }
        Ok(Self {
            days,
            miles,
            receipts,
        })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn miles(&self) -> f64 {
        self.miles
    }

    pub fn receipts(&self) -> f64 {
        self.receipts
    }

    /// Travel efficiency in miles per day.
    pub fn miles_per_day(&self) -> f64 {
        self.miles / f64::from(self.days)
    }

    /// Spending rate in dollars per day.
    pub fn receipts_per_day(&self) -> f64 {
        self.receipts / f64::from(self.days)
    }

    /// Cents portion of the receipts total (0-99).
    pub fn receipt_cents(&self) -> u32 {
        ((self.receipts * 100.0).round() as i64).rem_euclid(100) as u32
    }

    /// Key used by the historical case table and the formula book.
    ///
    /// Whole-number miles and receipts collapse to their integer form so
    /// that `250` and `250.0` address the same entry.
    pub fn lookup_key(&self) -> String {
        format!(
            "{},{},{}",
            self.days,
            collapse_whole(self.miles),
            collapse_whole(self.receipts)
        )
    }
}

fn collapse_whole(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

/// A historical case: an input triple with its known legacy output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledCase {
    pub trip: TripInput,
    pub expected_output: f64,
}

/// Plausible dollar range for heuristic estimates.
#[derive(Debug, Clone, Copy)]
pub struct AmountBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for AmountBounds {
    fn default() -> Self {
        Self {
            min: 50.0,
            max: 2500.0,
        }
    }
}

/// Final reimbursement for one trip, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReimbursementResult {
    amount: Decimal,
    source: &'static str,
    confidence: f64,
}

impl ReimbursementResult {
    /// Rounds a raw estimate to cents using banker's rounding, matching the
    /// legacy system's cent behavior.
    pub fn from_raw(raw: f64, source: &'static str, confidence: f64) -> Self {
        let amount = Decimal::from_f64(raw)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2)
            .max(Decimal::ZERO);
        Self {
            amount,
            source,
            confidence,
        }
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Amount as a float, for error arithmetic in evaluation.
    pub fn amount_f64(&self) -> f64 {
        use rust_decimal::prelude::ToPrimitive;
        self.amount.to_f64().unwrap_or(0.0)
    }

    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}
