//! Aggregates over the feedback log

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{Correctness, FeedbackRecord};

/// Key used for feedback given on a no-image result
pub const UNCLASSIFIED: &str = "unclassified";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTally {
    pub correct: u64,
    pub incorrect: u64,
}

impl LabelTally {
    fn add(&mut self, correct: Correctness) {
        match correct {
            Correctness::Yes => self.correct += 1,
            Correctness::No => self.incorrect += 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSummary {
    pub total: u64,
    pub correct: u64,
    pub incorrect: u64,
    /// correct / total, 0.0 when empty
    pub accuracy: f32,
    pub per_label: BTreeMap<String, LabelTally>,
}

impl FeedbackSummary {
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        let mut overall = LabelTally::default();
        let mut per_label: BTreeMap<String, LabelTally> = BTreeMap::new();

        for record in records {
            overall.add(record.correct_prediction);
            let key = if record.predicted_label.is_empty() {
                UNCLASSIFIED.to_string()
            } else {
                record.predicted_label.clone()
            };
            per_label.entry(key).or_default().add(record.correct_prediction);
        }

        let total = overall.correct + overall.incorrect;
        let accuracy = if total > 0 { overall.correct as f32 / total as f32 } else { 0.0 };

        Self {
            total,
            correct: overall.correct,
            incorrect: overall.incorrect,
            accuracy,
            per_label,
        }
    }
}
