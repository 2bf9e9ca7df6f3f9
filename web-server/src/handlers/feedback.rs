//! Feedback handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use waste_sorter_core::{Correctness, FeedbackSummary, Label};

use crate::{AppError, AppResult, AppState};

/// Echo of the prediction being judged, plus the verdict
#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    /// Empty when judging a no-image result
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub advice: String,
    pub correct: Correctness,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub message: String,
}

impl FeedbackRequest {
    /// Canonical label name to store; empty for a no-image result
    fn validate(&self) -> Result<&'static str, AppError> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(AppError::ValidationError(
                "confidence must be between 0 and 1".to_string(),
            ));
        }
        if self.label.trim().is_empty() {
            return Ok("");
        }
        self.label
            .parse::<Label>()
            .map(|label| label.as_str())
            .map_err(|e| AppError::ValidationError(e.to_string()))
    }
}

/// Append one yes/no judgment to the feedback log
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> AppResult<Json<FeedbackResponse>> {
    let label = req.validate()?;

    let log = state.feedback.clone();
    let message = tokio::task::spawn_blocking(move || {
        log.save(label, req.confidence, &req.advice, req.correct)
    })
    .await??;

    Ok(Json(FeedbackResponse { message }))
}

/// Aggregate counts over the whole log
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<FeedbackSummary>> {
    let log = state.feedback.clone();
    let summary = tokio::task::spawn_blocking(move || log.summary()).await??;
    Ok(Json(summary))
}
