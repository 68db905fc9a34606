use crate::domain::ports::{Estimate, Estimator};
use crate::domain::trip::{AmountBounds, TripInput};

/// Linear blends per trip length, with efficiency and spending
/// adjustments. Always produces an estimate; the engine runs it when every
/// other stage has declined.
pub struct LinearHeuristic {
    bounds: AmountBounds,
}

impl LinearHeuristic {
    pub fn new(bounds: AmountBounds) -> Self {
        Self { bounds }
    }

    pub fn predict(&self, trip: &TripInput) -> f64 {
        let days = f64::from(trip.days());
        let miles = trip.miles();
        let receipts = trip.receipts();

        let mut amount = match trip.days() {
            1 => {
                if miles <= 100.0 && receipts <= 20.0 {
                    110.0 * days + 0.6 * miles + 0.2 * receipts
                } else {
                    100.0 * days + 0.5 * miles + 0.3 * receipts
                }
            }
            2 => {
                if miles <= 150.0 && receipts <= 30.0 {
                    90.0 * days + 0.5 * miles + 0.7 * receipts
                } else {
                    85.0 * days + 0.45 * miles + 0.6 * receipts
                }
            }
            _ => {
                let mut base = 80.0 * days + 0.3 * miles + 0.6 * receipts;
                if trip.days() > 7 {
                    base += (days - 7.0) * 10.0;
                }
                base
            }
        };

        let mpd = trip.miles_per_day();
        if (150.0..=250.0).contains(&mpd) {
            amount += 15.0;
        } else if mpd > 300.0 {
            amount -= 20.0;
        }

        let rpd = trip.receipts_per_day();
        if rpd > 150.0 {
            amount -= (rpd - 150.0) * 0.5;
        }

        amount.clamp(self.bounds.min, self.bounds.max)
    }
}

impl Estimator for LinearHeuristic {
    fn name(&self) -> &'static str {
        "linear-heuristic"
    }

    fn estimate(&self, trip: &TripInput) -> Option<Estimate> {
        Some(Estimate::new(self.predict(trip), 0.3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(days: u32, miles: f64, receipts: f64) -> TripInput {
        TripInput::new(days, miles, receipts).unwrap()
    }

    fn heuristic() -> LinearHeuristic {
        LinearHeuristic::new(AmountBounds::default())
    }

    #[test]
    fn test_single_day_low_complexity_blend() {
        // 110*1 + 0.6*76 + 0.2*13.74 = 158.348
        let amount = heuristic().predict(&trip(1, 76.0, 13.74));
        assert!((amount - 158.348).abs() < 1e-9);
    }

    #[test]
    fn test_long_trip_bonus() {
        let nine_day = heuristic().predict(&trip(9, 300.0, 400.0));
        // 80*9 + 0.3*300 + 0.6*400 + 2*10, no efficiency or spending hits
        assert!((nine_day - (720.0 + 90.0 + 240.0 + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_efficiency_adjustments() {
        let optimal = heuristic().predict(&trip(3, 600.0, 100.0));
        let excessive = heuristic().predict(&trip(1, 400.0, 100.0));
        // 3-day at 200 mi/day gets +15
        assert!((optimal - (240.0 + 180.0 + 60.0 + 15.0)).abs() < 1e-9);
        // 1-day at 400 mi/day gets -20
        assert!((excessive - (100.0 + 200.0 + 30.0 - 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_high_spending_penalty() {
        // 1000/4 = 250 per day, penalty (250-150)*0.5 = 50
        let amount = heuristic().predict(&trip(4, 0.0, 1000.0));
        assert!((amount - (320.0 + 600.0 - 50.0)).abs() < 1e-9);
    }

    #[test]
    fn test_clamped_to_bounds() {
        // The spending penalty can drive the blend negative; the floor holds.
        // 100 + 0.3*2000 = 700, penalty (2000-150)*0.5 = 925
        let floor = heuristic().predict(&trip(1, 0.0, 2000.0));
        assert_eq!(floor, 50.0);

        // Huge everything still stays under the cap
        let ceiling = heuristic().predict(&trip(30, 9000.0, 40000.0));
        assert_eq!(ceiling, 2500.0);
    }
}
