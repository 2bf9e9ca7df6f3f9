//! Feedback Module - User judgments on predictions
//!
//! Every yes/no answer becomes one row in a flat CSV file for later review.
//! The file only ever grows: no rotation, no rewrites, no dedup.

pub mod record;
pub mod summary;
pub mod writer;


pub use record::{format_confidence, Correctness, FeedbackRecord, InvalidCorrectness, FEEDBACK_HEADER, TIMESTAMP_FORMAT};
pub use summary::{FeedbackSummary, LabelTally};
pub use writer::{FeedbackError, FeedbackLog, FEEDBACK_SAVED};
