//! Inference Engine - ONNX Runtime Integration
//!
//! Loads the exported classifier once and runs single forward passes.
//! Kept behind a trait so the adapter can be driven by a stub in tests
//! or by a different runtime later.

use std::path::Path;

use ndarray::Array4;
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::Tensor;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logic::error::ClassifyError;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Engine Status for UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub inference_device: String,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Model could not be loaded
#[derive(Debug, Error)]
#[error("InferenceError: {0}")]
pub struct InferenceError(pub String);

// ============================================================================
// INFERENCE ENGINE TRAIT
// ============================================================================

/// Anything that maps a preprocessed batch to one output vector
pub trait InferenceEngine: Send + Sync {
    /// Single forward pass; returns the first output row
    fn run(&self, input: Array4<f32>) -> Result<Vec<f32>, ClassifyError>;

    /// Model identifier for status displays
    fn name(&self) -> String;

    fn device(&self) -> String {
        "CPU".to_string()
    }

    fn is_loaded(&self) -> bool {
        true
    }
}

/// Stand-in when no model could be loaded: every run fails, so callers
/// get the no-image fallback instead of a crash.
pub struct UnloadedEngine {
    reason: String,
}

impl UnloadedEngine {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl InferenceEngine for UnloadedEngine {
    fn run(&self, _input: Array4<f32>) -> Result<Vec<f32>, ClassifyError> {
        Err(ClassifyError::Inference(format!("Model not loaded: {}", self.reason)))
    }

    fn name(&self) -> String {
        "None".to_string()
    }

    fn is_loaded(&self) -> bool {
        false
    }
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

pub struct OnnxEngine {
    session: Mutex<Session>,
    model_path: String,
    output_name: String,
}

impl OnnxEngine {
    /// Load ONNX model from file
    pub fn load(model_path: impl AsRef<Path>) -> Result<Self, InferenceError> {
        let model_path = model_path.as_ref();
        log::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError(format!("Model not found: {}", model_path.display())));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        log::info!("ONNX model loaded successfully");
        Self::from_session(session, model_path.display().to_string())
    }

    /// Load ONNX model from bytes
    pub fn load_from_bytes(model_bytes: &[u8]) -> Result<Self, InferenceError> {
        log::info!("Loading ONNX model from memory ({} bytes)", model_bytes.len());

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Session builder error: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Optimization error: {}", e)))?
            .commit_from_memory(model_bytes)
            .map_err(|e| InferenceError(format!("Load from memory error: {}", e)))?;

        Self::from_session(session, "<memory>".to_string())
    }

    fn from_session(session: Session, model_path: String) -> Result<Self, InferenceError> {
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| InferenceError("Model defines no outputs".to_string()))?;

        Ok(Self {
            session: Mutex::new(session),
            model_path,
            output_name,
        })
    }
}

impl InferenceEngine for OnnxEngine {
    fn run(&self, input: Array4<f32>) -> Result<Vec<f32>, ClassifyError> {
        let input_tensor = Tensor::from_array(input)
            .map_err(|e| ClassifyError::Inference(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| ClassifyError::Inference(e.to_string()))?;

        let output = outputs
            .get(self.output_name.as_str())
            .ok_or_else(|| ClassifyError::Inference("No output".to_string()))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| ClassifyError::Inference(format!("Extract error: {}", e)))?;

        Ok(data.to_vec())
    }

    fn name(&self) -> String {
        self.model_path.clone()
    }

    fn device(&self) -> String {
        "ONNX Runtime (CPU)".to_string()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Numerically stable softmax, for models exported without a final activation
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum <= 0.0 || !sum.is_finite() {
        return exps;
    }
    exps.into_iter().map(|v| v / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softmax_sums_to_one() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }

    #[test]
    fn test_softmax_large_logits() {
        let probs = softmax(&[1000.0, 1000.0]);
        assert!((probs[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_unloaded_engine_always_fails() {
        let engine = UnloadedEngine::new("missing file");
        assert!(!engine.is_loaded());
        let err = engine.run(Array4::zeros((1, 2, 2, 3))).unwrap_err();
        assert_eq!(err.code(), "inference");
        assert!(err.to_string().contains("missing file"));
    }

    const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/flatten_slice_softmax.onnx");

    #[test]
    fn test_onnx_engine_runs_fixture() {
        let engine = OnnxEngine::load(FIXTURE).unwrap();
        assert!(engine.name().ends_with("flatten_slice_softmax.onnx"));
        assert_eq!(engine.output_name, "probs");

        let mut input = Array4::<f32>::zeros((1, 224, 224, 3));
        input[[0, 0, 0, 2]] = 5.0;
        let output = engine.run(input).unwrap();

        assert_eq!(output.len(), 9);
        let total: f32 = output.iter().sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert!(output[2] > 0.9);
    }

    #[test]
    fn test_onnx_engine_from_bytes() {
        let engine = OnnxEngine::load_from_bytes(include_bytes!("../../../tests/fixtures/flatten_slice_softmax.onnx")).unwrap();
        assert_eq!(engine.name(), "<memory>");
        assert_eq!(engine.run(Array4::zeros((1, 224, 224, 3))).unwrap().len(), 9);
    }

    #[test]
    fn test_invalid_model_bytes() {
        assert!(OnnxEngine::load_from_bytes(b"not a model").is_err());
    }

    #[test]
    fn test_missing_model_file() {
        let err = OnnxEngine::load("does/not/exist.onnx").err().unwrap();
        assert!(err.to_string().contains("Model not found"));
    }
}
