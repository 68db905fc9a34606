use thiserror::Error;

/// Errors raised while constructing or validating trip inputs
#[derive(Debug, Error)]
pub enum TripValidationError {
    #[error("trip duration must be at least 1 day, got {days}")]
    InvalidDuration { days: u32 },

    #[error("miles traveled must be a non-negative finite number, got {miles}")]
    InvalidMiles { miles: f64 },

    #[error("receipts amount must be a non-negative finite number, got {receipts}")]
    InvalidReceipts { receipts: f64 },
}

/// Errors raised while assembling the formula book
#[derive(Debug, Error)]
pub enum FormulaError {
    #[error("duplicate formula entry for key '{key}'")]
    DuplicateKey { key: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_formatting() {
        let err = TripValidationError::InvalidMiles { miles: -12.5 };

        let msg = err.to_string();
        assert!(msg.contains("-12.5"));
        assert!(msg.contains("non-negative"));
    }

    #[test]
    fn test_formula_error_formatting() {
        let err = FormulaError::DuplicateKey {
            key: "3,93,1.42".to_string(),
        };

        assert!(err.to_string().contains("3,93,1.42"));
    }
}
