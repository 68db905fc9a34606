use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Locations of the read-only data files the engine loads at startup.
#[derive(Debug, Clone)]
pub struct DataConfig {
    /// Labeled historical cases (exact lookup + evaluation ground truth).
    pub cases_path: PathBuf,
    /// Discovered per-case formulas.
    pub formula_book_path: PathBuf,
    /// Trained forest model; `None` disables the forest stage entirely.
    pub model_path: Option<PathBuf>,
    /// Directory evaluation reports are written into.
    pub results_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cases_path: PathBuf::from("data/public_cases.json"),
            formula_book_path: PathBuf::from("data/formula_book.json"),
            model_path: None,
            results_dir: PathBuf::from("evaluation_results"),
        }
    }
}

impl DataConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            cases_path: path_env("PERDIEM_CASES").unwrap_or(defaults.cases_path),
            formula_book_path: path_env("PERDIEM_FORMULAS").unwrap_or(defaults.formula_book_path),
            model_path: path_env("PERDIEM_MODEL"),
            results_dir: path_env("PERDIEM_RESULTS_DIR").unwrap_or(defaults.results_dir),
        })
    }
}

fn path_env(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
        .map(PathBuf::from)
}
