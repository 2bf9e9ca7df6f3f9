//! Model Module - Preprocessing, Inference, Confidence Policy
//!
//! Inference is kept apart from the adapter so the runtime or model can be swapped.

pub mod inference;
pub mod preprocess;
pub mod threshold;

// Re-export common types
pub use inference::{softmax, EngineStatus, InferenceEngine, InferenceError, OnnxEngine, UnloadedEngine};
pub use preprocess::{preprocess, Normalization, PreprocessConfig, TensorLayout, UnknownOption};
pub use threshold::{ConfidencePolicy, LOW_CONFIDENCE_WARNING};
