//! Image preprocessing
//!
//! Turns an arbitrary decoded image into the batched float tensor the
//! classifier was trained on: RGB, fixed square size, one batch row.

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::constants::DEFAULT_INPUT_SIZE;
use crate::logic::error::ClassifyError;

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Pixel normalization applied after resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    /// EfficientNet rescales inside the graph, so pixels stay in [0, 255]
    EfficientNet,
    /// Pixels scaled to [0, 1]
    UnitRange,
    /// Unit range, then per-channel ImageNet mean/std
    ImageNet,
}

impl Normalization {
    #[inline]
    fn apply(&self, value: u8, channel: usize) -> f32 {
        let v = value as f32;
        match self {
            Normalization::EfficientNet => v,
            Normalization::UnitRange => v / 255.0,
            Normalization::ImageNet => (v / 255.0 - IMAGENET_MEAN[channel]) / IMAGENET_STD[channel],
        }
    }
}

impl FromStr for Normalization {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "efficientnet" => Ok(Normalization::EfficientNet),
            "unit_range" | "unit" => Ok(Normalization::UnitRange),
            "imagenet" => Ok(Normalization::ImageNet),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

/// Memory layout of the input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TensorLayout {
    /// [batch, height, width, channels] (Keras export)
    Nhwc,
    /// [batch, channels, height, width] (PyTorch export)
    Nchw,
}

impl FromStr for TensorLayout {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nhwc" => Ok(TensorLayout::Nhwc),
            "nchw" => Ok(TensorLayout::Nchw),
            _ => Err(UnknownOption(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown preprocessing option: {0}")]
pub struct UnknownOption(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    pub input_size: u32,
    pub normalization: Normalization,
    pub layout: TensorLayout,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            normalization: Normalization::EfficientNet,
            layout: TensorLayout::Nhwc,
        }
    }
}

/// Resize, convert and normalize `img` into a single-item batch
pub fn preprocess(img: &DynamicImage, config: &PreprocessConfig) -> Result<Array4<f32>, ClassifyError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(ClassifyError::Preprocess("image has zero size".to_string()));
    }
    if config.input_size == 0 {
        return Err(ClassifyError::Preprocess("input size must be positive".to_string()));
    }

    let size = config.input_size;
    let rgb = img.resize_exact(size, size, FilterType::CatmullRom).to_rgb8();
    let side = size as usize;

    let shape = match config.layout {
        TensorLayout::Nhwc => (1, side, side, 3),
        TensorLayout::Nchw => (1, 3, side, side),
    };
    let mut tensor = Array4::<f32>::zeros(shape);

    for (x, y, pixel) in rgb.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            let v = config.normalization.apply(pixel[c], c);
            match config.layout {
                TensorLayout::Nhwc => tensor[[0, y, x, c]] = v,
                TensorLayout::Nchw => tensor[[0, c, y, x]] = v,
            }
        }
    }

    Ok(tensor)
}
