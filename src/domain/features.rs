use crate::domain::trip::TripInput;

/// Ordered list of feature names.
/// This order MUST match exactly the layout produced by `TripFeatures::to_vector`.
/// Any change here is a breaking change for saved forest models.
pub const FEATURE_NAMES: &[&str] = &[
    "days",
    "miles",
    "receipts",
    "miles_per_day",
    "receipts_per_day",
    "log_days",
    "log_miles",
    "log_receipts",
    "inv_receipts",
    "inv_miles",
    "days_miles",
    "days_receipts",
    "miles_receipts_scaled",
    "three_way_scaled",
    "receipts_sq_scaled",
    "cents",
    "is_five_day",
    "is_long_trip",
    "ends_49",
    "ends_99",
];

/// Derived features for one trip.
///
/// The interaction and inverse terms carry most of the signal: the legacy
/// output tracks days*miles and the scaled three-way product far more
/// closely than any single input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripFeatures {
    pub days: f64,
    pub miles: f64,
    pub receipts: f64,
    pub miles_per_day: f64,
    pub receipts_per_day: f64,
    pub log_days: f64,
    pub log_miles: f64,
    pub log_receipts: f64,
    pub inv_receipts: f64,
    pub inv_miles: f64,
    pub days_miles: f64,
    pub days_receipts: f64,
    /// miles * receipts / 1000
    pub miles_receipts_scaled: f64,
    /// days * miles * receipts / 1000
    pub three_way_scaled: f64,
    /// receipts^2 / 1e6
    pub receipts_sq_scaled: f64,
    pub cents: f64,
    pub is_five_day: bool,
    pub is_long_trip: bool,
    pub ends_49: bool,
    pub ends_99: bool,
}

impl TripFeatures {
    pub fn extract(trip: &TripInput) -> Self {
        let days = f64::from(trip.days());
        let miles = trip.miles();
        let receipts = trip.receipts();
        let cents = trip.receipt_cents();

        Self {
            days,
            miles,
            receipts,
            miles_per_day: trip.miles_per_day(),
            receipts_per_day: trip.receipts_per_day(),
            log_days: days.ln_1p(),
            log_miles: miles.ln_1p(),
            log_receipts: receipts.ln_1p(),
            inv_receipts: 1.0 / (1.0 + receipts),
            inv_miles: 1.0 / (1.0 + miles),
            days_miles: days * miles,
            days_receipts: days * receipts,
            miles_receipts_scaled: miles * receipts / 1000.0,
            three_way_scaled: days * miles * receipts / 1000.0,
            receipts_sq_scaled: receipts.powi(2) / 1e6,
            cents: f64::from(cents),
            is_five_day: trip.days() == 5,
            is_long_trip: trip.days() >= 7,
            ends_49: cents == 49,
            ends_99: cents == 99,
        }
    }

    /// Flattens the features into the vector layout the forest trains on.
    pub fn to_vector(&self) -> Vec<f64> {
        vec![
            self.days,
            self.miles,
            self.receipts,
            self.miles_per_day,
            self.receipts_per_day,
            self.log_days,
            self.log_miles,
            self.log_receipts,
            self.inv_receipts,
            self.inv_miles,
            self.days_miles,
            self.days_receipts,
            self.miles_receipts_scaled,
            self.three_way_scaled,
            self.receipts_sq_scaled,
            self.cents,
            f64::from(u8::from(self.is_five_day)),
            f64::from(u8::from(self.is_long_trip)),
            f64::from(u8::from(self.ends_49)),
            f64::from(u8::from(self.ends_99)),
        ]
    }
}
