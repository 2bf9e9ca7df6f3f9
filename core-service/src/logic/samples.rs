//! Sample gallery
//!
//! Demonstration images shipped next to the app. Only files that are
//! actually present are listed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const SAMPLE_IMAGES: [&str; 5] = [
    "10537723_web1_M-Light-Bulb-EDH-180212.jpg",
    "458-4583586_cardboard-recycling-png-paper-waste-clipart-transparent-png.png",
    "assorted-clothes-isolated-heap-colorful-white-36145930.jpg",
    "aa-batteries-energy-household-appliances-battery-recycling-used-alkaline-batteries-aa-size-format-207672475.jpg",
    "banana-peel-white-background-composting-organic-waste-banana-peel-white-background-composting-organic-waste-210728827.jpg",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleImage {
    pub file_name: String,
    pub path: PathBuf,
}

/// Gallery entries found under `dir`, in gallery order
pub fn list(dir: &Path) -> Vec<SampleImage> {
    let samples: Vec<SampleImage> = SAMPLE_IMAGES
        .iter()
        .map(|name| SampleImage {
            file_name: name.to_string(),
            path: dir.join(name),
        })
        .filter(|s| s.path.is_file())
        .collect();

    if samples.len() < SAMPLE_IMAGES.len() {
        log::debug!(
            "{} of {} sample images present in {}",
            samples.len(),
            SAMPLE_IMAGES.len(),
            dir.display()
        );
    }
    samples
}
