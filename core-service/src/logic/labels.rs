//! Label set
//!
//! The nine waste categories the model was trained on, in output order,
//! and the disposal advice shown for each one.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Waste category. Variant order matches the model's output vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Label {
    #[serde(rename = "batteries")]
    Batteries,
    #[serde(rename = "clothes")]
    Clothes,
    #[serde(rename = "e-waste")]
    EWaste,
    #[serde(rename = "glass")]
    Glass,
    #[serde(rename = "light blubs")]
    LightBulbs,
    #[serde(rename = "metal")]
    Metal,
    #[serde(rename = "organic")]
    Organic,
    #[serde(rename = "paper")]
    Paper,
    #[serde(rename = "plastic")]
    Plastic,
}

impl Label {
    pub const COUNT: usize = 9;

    pub const ALL: [Label; Label::COUNT] = [
        Label::Batteries,
        Label::Clothes,
        Label::EWaste,
        Label::Glass,
        Label::LightBulbs,
        Label::Metal,
        Label::Organic,
        Label::Paper,
        Label::Plastic,
    ];

    pub fn from_index(index: usize) -> Option<Label> {
        Self::ALL.get(index).copied()
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Class name as exported with the model (the "light blubs" spelling
    /// comes from the training dataset and is kept for log compatibility).
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Batteries => "batteries",
            Label::Clothes => "clothes",
            Label::EWaste => "e-waste",
            Label::Glass => "glass",
            Label::LightBulbs => "light blubs",
            Label::Metal => "metal",
            Label::Organic => "organic",
            Label::Paper => "paper",
            Label::Plastic => "plastic",
        }
    }

    /// Disposal guidance
    pub fn advice(&self) -> &'static str {
        match self {
            Label::Batteries => "Hazardous waste. Recycle at battery collection points.",
            Label::Clothes => "Reusable or recyclable textiles. Donate or use textile recycling bins.",
            Label::EWaste => "Electronic waste. Contains toxic components. Use certified e-waste recyclers.",
            Label::Glass => "Non-biodegradable. Place in glass recycling containers.",
            Label::LightBulbs => "May contain mercury. Dispose at special light bulb collection points.",
            Label::Metal => "Recyclable material. Sort into metal recycling containers.",
            Label::Organic => "Biodegradable. Compost or dispose in organic waste bins.",
            Label::Paper => "Recyclable if clean. Place in paper recycling bins.",
            Label::Plastic => "Non-biodegradable. Sort into plastic recycling bins.",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for Label {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Label::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}
