//! Sample gallery handler

use axum::{extract::State, Json};
use serde::Serialize;
use waste_sorter_core::logic::samples;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct SampleEntry {
    pub name: String,
    pub url: String,
}

pub async fn list(State(state): State<AppState>) -> Json<Vec<SampleEntry>> {
    let entries = samples::list(&state.config.sample_dir)
        .into_iter()
        .map(|s| SampleEntry {
            url: format!("/samples/{}", s.file_name),
            name: s.file_name,
        })
        .collect();
    Json(entries)
}
