use serde::{Deserialize, Serialize};

/// Match tolerances, in dollars.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tolerances {
    /// |error| at or below this counts as an exact reproduction.
    pub exact: f64,
    /// |error| at or below this counts as a close reproduction.
    pub close: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            exact: 0.01,
            close: 1.00,
        }
    }
}

/// Accuracy of the engine against a set of labeled cases.
///
/// `score` is the challenge score the legacy exercise graded on:
/// `avg_error * 100 + (total - exact) * 0.1`, lower is better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationMetrics {
    pub mean_absolute_error: f64,
    pub exact_matches: usize,
    pub close_matches: usize,
    pub max_error: f64,
    pub total_cases: usize,
    pub score: f64,
}

impl ValidationMetrics {
    pub fn from_errors(errors: &[f64], tolerances: Tolerances) -> Self {
        let total_cases = errors.len();
        if total_cases == 0 {
            return Self {
                mean_absolute_error: 0.0,
                exact_matches: 0,
                close_matches: 0,
                max_error: 0.0,
                total_cases: 0,
                score: 0.0,
            };
        }

        let abs: Vec<f64> = errors.iter().map(|e| e.abs()).collect();
        let mean_absolute_error = abs.iter().sum::<f64>() / total_cases as f64;
        let exact_matches = abs.iter().filter(|e| **e <= tolerances.exact).count();
        let close_matches = abs.iter().filter(|e| **e <= tolerances.close).count();
        let max_error = abs.iter().cloned().fold(0.0, f64::max);
        let score = mean_absolute_error * 100.0 + (total_cases - exact_matches) as f64 * 0.1;

        Self {
            mean_absolute_error,
            exact_matches,
            close_matches,
            max_error,
            total_cases,
            score,
        }
    }

    pub fn exact_match_rate(&self) -> f64 {
        if self.total_cases == 0 {
            return 0.0;
        }
        self.exact_matches as f64 / self.total_cases as f64 * 100.0
    }

    pub fn close_match_rate(&self) -> f64 {
        if self.total_cases == 0 {
            return 0.0;
        }
        self.close_matches as f64 / self.total_cases as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_reproduction_scores_zero() {
        let metrics = ValidationMetrics::from_errors(&[0.0, 0.0, 0.0], Tolerances::default());
        assert_eq!(metrics.exact_matches, 3);
        assert_eq!(metrics.score, 0.0);
        assert_eq!(metrics.exact_match_rate(), 100.0);
    }

    #[test]
    fn test_tree_baseline_score() {
        // The documented tree baseline: $90.50 average error, no exact
        // matches over 1000 cases scored 9150.00.
        let errors = vec![90.50; 1000];
        let metrics = ValidationMetrics::from_errors(&errors, Tolerances::default());
        assert_eq!(metrics.exact_matches, 0);
        assert!((metrics.score - 9150.0).abs() < 1e-9);
    }

    #[test]
    fn test_close_matches_include_exact() {
        let metrics =
            ValidationMetrics::from_errors(&[0.005, -0.5, 2.0, -30.0], Tolerances::default());
        assert_eq!(metrics.exact_matches, 1);
        assert_eq!(metrics.close_matches, 2);
        assert_eq!(metrics.max_error, 30.0);
    }

    #[test]
    fn test_empty_case_set() {
        let metrics = ValidationMetrics::from_errors(&[], Tolerances::default());
        assert_eq!(metrics.total_cases, 0);
        assert_eq!(metrics.score, 0.0);
        assert_eq!(metrics.close_match_rate(), 0.0);
    }
}
