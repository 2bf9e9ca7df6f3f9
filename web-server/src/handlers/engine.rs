//! Engine status handler

use axum::{extract::State, Json};
use waste_sorter_core::EngineStatus;

use crate::AppState;

pub async fn status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.classifier.status())
}
