use crate::domain::features::TripFeatures;
use crate::domain::ports::{Estimate, Estimator};
use crate::domain::trip::TripInput;

/// Hand-fitted decision tree over the derived features.
///
/// The split thresholds and leaf values approximate a gradient-boosted fit
/// against the historical cases; the tree is the workhorse for trips with
/// no table or formula entry. Leaf values are dollars.
#[derive(Debug, Default)]
pub struct DecisionTree;

/// Envelope of the historical cases the tree was fit on. Far outside it
/// the saturated leaves stop tracking anything; the engine lets the
/// extrapolating linear blend handle those trips instead.
const MAX_FITTED_DAYS: u32 = 30;
const MAX_FITTED_MILES: f64 = 3000.0;
const MAX_FITTED_RECEIPTS: f64 = 10_000.0;

impl DecisionTree {
    fn in_fitted_envelope(trip: &TripInput) -> bool {
        trip.days() <= MAX_FITTED_DAYS
            && trip.miles() <= MAX_FITTED_MILES
            && trip.receipts() <= MAX_FITTED_RECEIPTS
    }

    /// Walks the tree and applies the categorical adjustments the splits
    /// do not capture (receipt cent endings, five-day trips).
    pub fn predict(&self, trip: &TripInput) -> f64 {
        let f = TripFeatures::extract(trip);
        let mut amount = Self::walk(&f);

        if f.ends_49 {
            amount += 3.0;
        }
        if f.ends_99 {
            amount += 3.0;
        }
        if f.is_five_day {
            amount += 10.0;
        }

        amount
    }

    fn walk(f: &TripFeatures) -> f64 {
        if f.log_receipts <= 6.720334 {
            Self::low_receipt_branch(f)
        } else {
            Self::high_receipt_branch(f)
        }
    }

    fn low_receipt_branch(f: &TripFeatures) -> f64 {
        if f.days_miles <= 2070.0 {
            if f.days_receipts <= 562.984985 {
                if f.days_miles <= 566.0 { 287.10 } else { 581.58 }
            } else if f.days_receipts <= 3089.01001 {
                if f.days_miles <= 1310.5 {
                    if f.receipts <= 461.820007 { 557.93 } else { 643.31 }
                } else {
                    750.45
                }
            } else {
                876.59
            }
        } else if f.three_way_scaled <= 2172.216919 {
            if f.days_miles <= 4940.0 {
                if f.three_way_scaled <= 1258.291565 {
                    if f.days <= 5.5 { 770.85 } else { 864.46 }
                } else if f.receipts <= 506.684998 {
                    941.68
                } else {
                    1012.53
                }
            } else {
                1145.20
            }
        } else if f.three_way_scaled <= 3762.473267 {
            if f.miles <= 771.0 { 1163.81 } else { 1240.19 }
        } else {
            1442.54
        }
    }

    fn high_receipt_branch(f: &TripFeatures) -> f64 {
        if f.three_way_scaled <= 6405.638672 {
            if f.three_way_scaled <= 1253.387817 {
                if f.days_receipts <= 9442.660156 {
                    if f.inv_receipts <= 0.000923 {
                        if f.days_miles <= 449.0 { 1196.52 } else { 1296.70 }
                    } else {
                        1067.12
                    }
                } else {
                    1505.52
                }
            } else if f.days_receipts <= 5494.430176 {
                if f.three_way_scaled <= 2917.123047 {
                    if f.miles_receipts_scaled <= 834.080933 {
                        1297.57
                    } else {
                        1392.04
                    }
                } else {
                    1488.02
                }
            } else if f.days_receipts <= 13199.189941 {
                if f.miles <= 518.5 {
                    if f.days_miles <= 2517.5 {
                        if f.three_way_scaled <= 2272.934448 {
                            1463.72
                        } else {
                            1523.63
                        }
                    } else {
                        1410.89
                    }
                } else if f.three_way_scaled <= 5415.271729 {
                    1571.23
                } else {
                    1618.87
                }
            } else if f.days <= 10.5 {
                1588.76
            } else {
                1671.65
            }
        } else if f.days_miles <= 6483.0 {
            if f.receipts_sq_scaled <= 4.168643 {
                if f.days <= 7.5 { 1765.20 } else { 1693.27 }
            } else if f.log_receipts <= 7.739514 {
                1642.03
            } else {
                1677.18
            }
        } else if f.miles <= 995.0 {
            if f.days <= 12.5 {
                if f.miles <= 774.0 {
                    1774.64
                } else if f.receipts <= 1758.599976 {
                    1876.53
                } else {
                    1802.38
                }
            } else {
                1900.41
            }
        } else if f.miles_receipts_scaled <= 1842.686523 {
            2033.30
        } else {
            1882.41
        }
    }
}

impl Estimator for DecisionTree {
    fn name(&self) -> &'static str {
        "decision-tree"
    }

    fn estimate(&self, trip: &TripInput) -> Option<Estimate> {
        if !Self::in_fitted_envelope(trip) {
            return None;
        }
        Some(Estimate::new(self.predict(trip), 0.5))
    }
}
