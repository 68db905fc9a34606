// Estimation pipeline
pub mod engine;

// Pipeline stages
pub mod estimators;

// Engine assembly from configuration
pub mod bootstrap;

// Formula discovery against labeled cases
pub mod search;

// Evaluation harness and reporting
pub mod benchmarking;
