//! Logic Module - Classification & Feedback
//!
//! - `labels` - Fixed label set and disposal advice
//! - `model/` - Preprocessing, ONNX inference, confidence policy
//! - `classifier` - Adapter: image in, prediction out
//! - `feedback/` - Append-only CSV feedback log
//! - `samples` - Demonstration image gallery

pub mod error;
pub mod labels;
pub mod model;
pub mod classifier;
pub mod feedback;
pub mod samples;
