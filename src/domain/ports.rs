use crate::domain::trip::TripInput;

/// A raw estimate before rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub amount: f64,
    /// Rough reliability of the producing estimator, 0-1.
    pub confidence: f64,
}

impl Estimate {
    pub fn new(amount: f64, confidence: f64) -> Self {
        Self { amount, confidence }
    }
}

/// One stage of the estimation chain.
///
/// Estimators are pure and deterministic. `None` means "no opinion" (a
/// lookup miss, or an unavailable model) and sends the trip to the next
/// stage; there is no error taxonomy to surface per the legacy behavior.
pub trait Estimator: Send + Sync {
    fn name(&self) -> &'static str;

    fn estimate(&self, trip: &TripInput) -> Option<Estimate>;
}
