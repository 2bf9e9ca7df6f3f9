//! Configuration module

use std::env;
use std::path::PathBuf;

use waste_sorter_core::constants;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// ONNX model file
    pub model_path: PathBuf,

    /// Feedback CSV log
    pub feedback_file: PathBuf,

    /// Sample gallery directory, served under /samples
    pub sample_dir: PathBuf,

    /// Largest accepted upload
    pub max_upload_bytes: usize,

    /// Environment (development, production)
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),

            model_path: constants::get_model_path(),

            feedback_file: constants::get_feedback_file(),

            sample_dir: constants::get_sample_dir(),

            max_upload_bytes: env::var("MAX_UPLOAD_MB")
                .ok()
                .and_then(|m| m.parse::<usize>().ok())
                .unwrap_or(10)
                * 1024
                * 1024,

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
