//! Classify handler

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use waste_sorter_core::Prediction;

use crate::{AppResult, AppState};

/// Multipart form field carrying the photo
pub const IMAGE_FIELD: &str = "image";

/// Classify an uploaded photo.
///
/// A missing or unreadable image is not an HTTP error: the response is the
/// regular no-image prediction.
pub async fn classify(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<Prediction>> {
    let mut image: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            image = Some(field.bytes().await?);
            break;
        }
    }

    let classifier = state.classifier.clone();
    let prediction = tokio::task::spawn_blocking(move || classifier.predict_bytes(image.as_deref())).await?;

    match &prediction.error {
        Some(kind) => tracing::info!("Classify: no result ({})", kind),
        None => tracing::info!(
            "Classify: {} ({:.2}%) in {}us",
            prediction.label_name(),
            prediction.confidence * 100.0,
            prediction.inference_time_us
        ),
    }

    Ok(Json(prediction))
}
