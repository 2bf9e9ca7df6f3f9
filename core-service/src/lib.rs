//! Waste Sorter Core
//!
//! Classifier adapter around a pre-trained waste image model, a static
//! advisory table, and an append-only feedback log. Both front-ends
//! (`waste-sorter` in this crate and `waste-sorter-web`) sit on top of
//! the same [`Classifier`] and [`FeedbackLog`].

pub mod constants;
pub mod logic;

pub use logic::classifier::{Classifier, ClassifierConfig, Prediction};
pub use logic::error::ClassifyError;
pub use logic::feedback::{Correctness, FeedbackLog, FeedbackRecord, FeedbackSummary};
pub use logic::labels::Label;
pub use logic::model::{EngineStatus, InferenceEngine, OnnxEngine};
