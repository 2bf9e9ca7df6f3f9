use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Terminator, WriterBuilder};
use parking_lot::Mutex;
use thiserror::Error;

use super::record::{Correctness, FeedbackRecord, FEEDBACK_HEADER};
use super::summary::FeedbackSummary;

pub const FEEDBACK_SAVED: &str = "✅ Feedback saved. Thanks!";

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("feedback log I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("feedback log CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Append-only CSV log.
///
/// Appends from one process are serialized through an internal mutex;
/// there is no locking across processes.
pub struct FeedbackLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record one judgment and return the confirmation text
    pub fn save(
        &self,
        label: &str,
        confidence: f32,
        advice: &str,
        correct: Correctness,
    ) -> Result<String, FeedbackError> {
        let record = FeedbackRecord::new(label, confidence, advice, correct);
        self.append(&record)?;
        log::info!(
            "Feedback recorded: label={:?} confidence={} correct={}",
            record.predicted_label,
            record.confidence_percentage,
            record.correct_prediction
        );
        Ok(FEEDBACK_SAVED.to_string())
    }

    /// Append one row, writing the header first if the file is new
    pub fn append(&self, record: &FeedbackRecord) -> Result<(), FeedbackError> {
        let _guard = self.lock.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let file_exists = self.path.is_file();
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_writer(file);

        if !file_exists {
            writer.write_record(FEEDBACK_HEADER)?;
        }
        writer.serialize(record)?;
        writer.flush()?;

        Ok(())
    }

    /// All rows in write order; a missing log reads as empty
    pub fn read_all(&self) -> Result<Vec<FeedbackRecord>, FeedbackError> {
        let _guard = self.lock.lock();

        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let records = reader
            .deserialize::<FeedbackRecord>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn summary(&self) -> Result<FeedbackSummary, FeedbackError> {
        Ok(FeedbackSummary::from_records(&self.read_all()?))
    }
}
