//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! Every default can be overridden through an environment variable.

use std::path::PathBuf;

/// Default model path (ONNX export of the fine-tuned EfficientNet)
pub const DEFAULT_MODEL_PATH: &str = "recycle_efficientnet_finetuned.onnx";

/// Default feedback log
pub const DEFAULT_FEEDBACK_FILE: &str = "user_feedback.csv";

/// Default sample gallery directory
pub const DEFAULT_SAMPLE_DIR: &str = "sample_data";

/// Square input resolution expected by the model
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Below this confidence the result carries a warning
pub const DEFAULT_LOW_CONFIDENCE: f32 = 0.50;

// ============================================
// Classifier tuning (read by ClassifierConfig::from_env)
// ============================================

/// Low-confidence threshold, 0.0 - 1.0
pub const ENV_LOW_CONFIDENCE: &str = "WASTE_LOW_CONFIDENCE";

/// Square input resolution in pixels
pub const ENV_INPUT_SIZE: &str = "WASTE_INPUT_SIZE";

/// efficientnet | unit_range | imagenet
pub const ENV_NORMALIZATION: &str = "WASTE_NORMALIZATION";

/// nhwc | nchw
pub const ENV_TENSOR_LAYOUT: &str = "WASTE_TENSOR_LAYOUT";

/// true | 1 when the model emits logits
pub const ENV_APPLY_SOFTMAX: &str = "WASTE_APPLY_SOFTMAX";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Waste Sorter";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> PathBuf {
    std::env::var("WASTE_MODEL_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Get feedback log path from environment or use default
pub fn get_feedback_file() -> PathBuf {
    std::env::var("WASTE_FEEDBACK_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_FEEDBACK_FILE))
}

/// Get sample directory from environment or use default
pub fn get_sample_dir() -> PathBuf {
    std::env::var("WASTE_SAMPLE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_SAMPLE_DIR))
}
