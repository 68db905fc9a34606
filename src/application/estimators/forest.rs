use crate::domain::features::TripFeatures;
use crate::domain::ports::{Estimate, Estimator};
use crate::domain::trip::TripInput;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest trained on the historical cases (see the `train_forest`
/// binary). Optional stage: when no model file is available the estimator
/// declines every trip and the tree fallback takes over.
pub struct ForestEstimator {
    model: Option<ForestModel>,
    model_path: PathBuf,
}

impl ForestEstimator {
    pub fn new(model_path: PathBuf) -> Self {
        let mut estimator = Self {
            model: None,
            model_path,
        };
        estimator.load_model();
        estimator
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    fn load_model(&mut self) {
        if !self.model_path.exists() {
            warn!(
                "Forest model not found at {:?}. Estimator will decline all trips.",
                self.model_path
            );
            return;
        }

        match File::open(&self.model_path) {
            Ok(file) => match serde_json::from_reader(BufReader::new(file)) {
                Ok(model) => {
                    info!("Loaded forest model from {:?}", self.model_path);
                    self.model = Some(model);
                }
                Err(e) => {
                    error!("Failed to deserialize forest model: {}", e);
                }
            },
            Err(e) => {
                error!("Failed to open forest model file: {}", e);
            }
        }
    }
}

impl Estimator for ForestEstimator {
    fn name(&self) -> &'static str {
        "forest"
    }

    fn estimate(&self, trip: &TripInput) -> Option<Estimate> {
        let model = self.model.as_ref()?;
        let vector = TripFeatures::extract(trip).to_vector();

        let matrix = match DenseMatrix::from_2d_vec(&vec![vector]) {
            Ok(m) => m,
            Err(e) => {
                warn!("Feature matrix construction failed: {}", e);
                return None;
            }
        };

        match model.predict(&matrix) {
            Ok(predictions) => predictions
                .first()
                .filter(|p| p.is_finite())
                .map(|p| Estimate::new(*p, 0.7)),
            Err(e) => {
                warn!("Forest prediction failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_declines() {
        let estimator = ForestEstimator::new(PathBuf::from("does/not/exist.json"));
        assert!(!estimator.is_loaded());

        let trip = TripInput::new(3, 120.0, 80.0).unwrap();
        assert!(estimator.estimate(&trip).is_none());
    }
}
