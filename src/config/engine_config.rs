use crate::domain::evaluation::Tolerances;
use crate::domain::trip::AmountBounds;
use anyhow::Result;

use super::env_or;

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// |error| at or below this counts as an exact reproduction, dollars.
    pub exact_match_tolerance: f64,
    /// |error| at or below this counts as a close reproduction, dollars.
    pub close_match_tolerance: f64,
    /// Floor for the linear heuristic of last resort, dollars.
    pub min_amount: f64,
    /// Cap for the linear heuristic of last resort, dollars.
    pub max_amount: f64,
    /// Maximum reproduction error accepted by formula discovery, dollars.
    pub search_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            exact_match_tolerance: 0.01,
            close_match_tolerance: 1.00,
            min_amount: 50.0,
            max_amount: 2500.0,
            search_tolerance: 0.01,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            exact_match_tolerance: env_or("PERDIEM_EXACT_TOL", defaults.exact_match_tolerance)?,
            close_match_tolerance: env_or("PERDIEM_CLOSE_TOL", defaults.close_match_tolerance)?,
            min_amount: env_or("PERDIEM_MIN_AMOUNT", defaults.min_amount)?,
            max_amount: env_or("PERDIEM_MAX_AMOUNT", defaults.max_amount)?,
            search_tolerance: env_or("PERDIEM_SEARCH_TOL", defaults.search_tolerance)?,
        })
    }

    pub fn bounds(&self) -> AmountBounds {
        AmountBounds {
            min: self.min_amount,
            max: self.max_amount,
        }
    }

    pub fn tolerances(&self) -> Tolerances {
        Tolerances {
            exact: self.exact_match_tolerance,
            close: self.close_match_tolerance,
        }
    }
}
