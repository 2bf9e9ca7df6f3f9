//! Classifier Adapter
//!
//! Image in, prediction out: preprocess, one forward pass, argmax over the
//! label set, confidence check, advice lookup. Any failure on the way ends
//! in the same "no image detected" result so front-ends never have to
//! branch on error causes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::constants;
use crate::logic::error::ClassifyError;
use crate::logic::labels::Label;
use crate::logic::model::{preprocess, softmax, ConfidencePolicy, EngineStatus, InferenceEngine, PreprocessConfig};

pub const NO_IMAGE_MESSAGE: &str = "❌ No image detected. Please upload or take a photo.";

// ============================================================================
// CONFIG
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub preprocess: PreprocessConfig,
    pub policy: ConfidencePolicy,
    /// Apply softmax to the raw output (models exported without activation)
    pub apply_softmax: bool,
}

impl ClassifierConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup; unset or unparsable values keep the default
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(threshold) = get(constants::ENV_LOW_CONFIDENCE).and_then(|v| v.trim().parse::<f32>().ok()) {
            config.policy = ConfidencePolicy::new(threshold);
        }
        if let Some(size) = get(constants::ENV_INPUT_SIZE)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|s| *s > 0)
        {
            config.preprocess.input_size = size;
        }
        if let Some(value) = get(constants::ENV_NORMALIZATION) {
            match value.parse() {
                Ok(normalization) => config.preprocess.normalization = normalization,
                Err(e) => log::warn!("{}, keeping {:?}", e, config.preprocess.normalization),
            }
        }
        if let Some(value) = get(constants::ENV_TENSOR_LAYOUT) {
            match value.parse() {
                Ok(layout) => config.preprocess.layout = layout,
                Err(e) => log::warn!("{}, keeping {:?}", e, config.preprocess.layout),
            }
        }
        if let Some(value) = get(constants::ENV_APPLY_SOFTMAX) {
            config.apply_softmax = matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

/// Result of one classify call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Text shown to the user
    pub message: String,
    /// Empty string when nothing was classified
    #[serde(with = "label_or_empty")]
    pub label: Option<Label>,
    /// 0.0 - 1.0
    pub confidence: f32,
    pub advice: String,
    pub low_confidence: bool,
    /// Error kind code when the fallback result was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub inference_time_us: u64,
}

impl Prediction {
    /// Fixed fallback for any failure
    pub fn no_image(cause: &ClassifyError) -> Self {
        Self {
            message: NO_IMAGE_MESSAGE.to_string(),
            label: None,
            confidence: 0.0,
            advice: String::new(),
            low_confidence: false,
            error: Some(cause.code().to_string()),
            inference_time_us: 0,
        }
    }

    pub fn label_name(&self) -> &str {
        self.label.map(|l| l.as_str()).unwrap_or("")
    }

    pub fn is_fallback(&self) -> bool {
        self.label.is_none()
    }
}

/// `"{LABEL} (87.50%)\n\n{advice}"` plus the optional warning paragraph
pub fn format_message(label: Label, confidence: f32, warning: Option<&str>) -> String {
    let mut text = format!(
        "{} ({:.2}%)\n\n{}",
        label.as_str().to_uppercase(),
        confidence * 100.0,
        label.advice()
    );
    if let Some(w) = warning {
        text.push_str("\n\n");
        text.push_str(w);
    }
    text
}

/// Argmax over the output vector; ties go to the lowest index
fn select(output: &[f32]) -> Result<(Label, f32), ClassifyError> {
    if output.len() != Label::COUNT {
        return Err(ClassifyError::ShapeMismatch {
            expected: Label::COUNT,
            actual: output.len(),
        });
    }
    if output.iter().any(|v| !v.is_finite()) {
        return Err(ClassifyError::InvalidOutput);
    }

    let (index, value) = output
        .iter()
        .copied()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, v)| if v > best.1 { (i, v) } else { best });

    let label = Label::from_index(index).ok_or(ClassifyError::InvalidOutput)?;
    Ok((label, value.clamp(0.0, 1.0)))
}

// ============================================================================
// CLASSIFIER
// ============================================================================

pub struct Classifier {
    engine: Box<dyn InferenceEngine>,
    config: ClassifierConfig,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl Classifier {
    pub fn new(engine: impl InferenceEngine + 'static, config: ClassifierConfig) -> Self {
        Self::from_boxed(Box::new(engine), config)
    }

    pub fn from_boxed(engine: Box<dyn InferenceEngine>, config: ClassifierConfig) -> Self {
        Self {
            engine,
            config,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        }
    }

    /// Classify an image; `None` stands for an empty upload
    pub fn predict(&self, image: Option<&DynamicImage>) -> Prediction {
        let result = image
            .ok_or(ClassifyError::NoImage)
            .and_then(|img| self.try_predict(img));
        Self::or_fallback(result)
    }

    /// Classify encoded image bytes (PNG, JPEG)
    pub fn predict_bytes(&self, bytes: Option<&[u8]>) -> Prediction {
        let result = bytes
            .filter(|b| !b.is_empty())
            .ok_or(ClassifyError::NoImage)
            .and_then(|b| self.try_predict_bytes(b));
        Self::or_fallback(result)
    }

    pub fn try_predict_bytes(&self, bytes: &[u8]) -> Result<Prediction, ClassifyError> {
        let img = image::load_from_memory(bytes)?;
        self.try_predict(&img)
    }

    pub fn try_predict(&self, image: &DynamicImage) -> Result<Prediction, ClassifyError> {
        let start_time = Instant::now();

        let input = preprocess(image, &self.config.preprocess)?;
        let mut output = self.engine.run(input)?;
        if self.config.apply_softmax {
            output = softmax(&output);
        }
        let (label, confidence) = select(&output)?;

        let inference_time = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(inference_time, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        let warning = self.config.policy.warning(confidence);
        log::debug!(
            "Classified as {} ({:.4}) in {}us",
            label,
            confidence,
            inference_time
        );

        Ok(Prediction {
            message: format_message(label, confidence, warning),
            label: Some(label),
            confidence,
            advice: label.advice().to_string(),
            low_confidence: warning.is_some(),
            error: None,
            inference_time_us: inference_time,
        })
    }

    fn or_fallback(result: Result<Prediction, ClassifyError>) -> Prediction {
        match result {
            Ok(prediction) => prediction,
            Err(ClassifyError::NoImage) => Prediction::no_image(&ClassifyError::NoImage),
            Err(e) => {
                log::warn!("Classification failed ({}), returning no-image result", e);
                Prediction::no_image(&e)
            }
        }
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: self.engine.is_loaded(),
            model_name: self.engine.name(),
            inference_device: self.engine.device(),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}

mod label_or_empty {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::logic::labels::Label;

    pub fn serialize<S: Serializer>(label: &Option<Label>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(label.map(|l| l.as_str()).unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Label>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse().map(Some).map_err(serde::de::Error::custom)
    }
}
