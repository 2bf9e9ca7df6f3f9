use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header row, written once when the log is created
pub const FEEDBACK_HEADER: [&str; 5] = [
    "timestamp",
    "predicted_label",
    "confidence_percentage",
    "advice",
    "correct_prediction",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected \"yes\" or \"no\", got {0:?}")]
pub struct InvalidCorrectness(pub String);

/// Was the prediction right?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correctness {
    Yes,
    No,
}

impl Correctness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Correctness::Yes => "yes",
            Correctness::No => "no",
        }
    }
}

impl From<bool> for Correctness {
    fn from(correct: bool) -> Self {
        if correct { Correctness::Yes } else { Correctness::No }
    }
}

impl fmt::Display for Correctness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Correctness {
    type Err = InvalidCorrectness;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(Correctness::Yes),
            "no" => Ok(Correctness::No),
            _ => Err(InvalidCorrectness(s.to_string())),
        }
    }
}

/// One row of the feedback log. Field order is the column order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub timestamp: String,
    pub predicted_label: String,
    /// e.g. "87.50%"
    pub confidence_percentage: String,
    pub advice: String,
    pub correct_prediction: Correctness,
}

impl FeedbackRecord {
    pub fn new(label: &str, confidence: f32, advice: &str, correct: Correctness) -> Self {
        Self::at(Local::now(), label, confidence, advice, correct)
    }

    pub fn at(
        time: DateTime<Local>,
        label: &str,
        confidence: f32,
        advice: &str,
        correct: Correctness,
    ) -> Self {
        Self {
            timestamp: time.format(TIMESTAMP_FORMAT).to_string(),
            predicted_label: label.to_string(),
            confidence_percentage: format_confidence(confidence),
            advice: advice.to_string(),
            correct_prediction: correct,
        }
    }
}

/// 0.875 -> "87.50%"
pub fn format_confidence(confidence: f32) -> String {
    format!("{:.2}%", confidence * 100.0)
}
