//! Classification errors
//!
//! Every failure on the way from upload to label. The front-ends collapse
//! all of them into one user-facing message, but the kind is kept so logs
//! and API responses can tell a bad upload from a broken model.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no image provided")]
    NoImage,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("failed to preprocess image: {0}")]
    Preprocess(String),

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model output has {actual} values, expected {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model output is not finite")]
    InvalidOutput,
}

impl ClassifyError {
    /// Stable short code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            ClassifyError::NoImage => "no_image",
            ClassifyError::Decode(_) => "decode",
            ClassifyError::Preprocess(_) => "preprocess",
            ClassifyError::Inference(_) => "inference",
            ClassifyError::ShapeMismatch { .. } => "shape_mismatch",
            ClassifyError::InvalidOutput => "invalid_output",
        }
    }
}

impl From<image::ImageError> for ClassifyError {
    fn from(err: image::ImageError) -> Self {
        ClassifyError::Decode(err.to_string())
    }
}
