//! Waste Sorter Web Front-end
//!
//! Upload a photo, get a waste category with disposal advice, tell us
//! whether it was right.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  WASTE SORTER WEB                    │
//! ├──────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────┐  │
//! │  │  Router   │──▶│  Classifier  │──▶│ ONNX model  │  │
//! │  │  (Axum)   │   │  (blocking)  │   └─────────────┘  │
//! │  └─────┬─────┘   └──────────────┘                    │
//! │        ▼                                             │
//! │  ┌─────────────────┐                                 │
//! │  │ user_feedback   │                                 │
//! │  │ .csv (append)   │                                 │
//! │  └─────────────────┘                                 │
//! └──────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;

#[cfg(test)]
mod tests;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use waste_sorter_core::logic::model::UnloadedEngine;
use waste_sorter_core::constants;
use waste_sorter_core::{Classifier, ClassifierConfig, FeedbackLog, OnnxEngine};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "waste_sorter_web=debug,waste_sorter_core=info,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!(
        "{} web front-end v{} starting ({})...",
        constants::APP_NAME,
        env!("CARGO_PKG_VERSION"),
        config.environment
    );
    tracing::info!("Feedback log: {}", config.feedback_file.display());

    // Load the model once; without it every request gets the no-image result
    let classifier_config = ClassifierConfig::from_env();
    let classifier = match OnnxEngine::load(&config.model_path) {
        Ok(engine) => Classifier::new(engine, classifier_config),
        Err(e) => {
            if config.is_production() {
                return Err(anyhow::anyhow!(e));
            }
            tracing::warn!("{} - serving without a model", e);
            Classifier::new(UnloadedEngine::new(e.to_string()), classifier_config)
        }
    };

    // Build application state
    let state = AppState {
        classifier: Arc::new(classifier),
        feedback: Arc::new(FeedbackLog::new(config.feedback_file.clone())),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub feedback: Arc<FeedbackLog>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/v1/classify", post(handlers::classify::classify))
        .route("/api/v1/feedback", post(handlers::feedback::submit))
        .route("/api/v1/feedback/summary", get(handlers::feedback::summary))
        .route("/api/v1/samples", get(handlers::samples::list))
        .route("/api/v1/engine/status", get(handlers::engine::status))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    Router::new()
        .route("/", get(handlers::index::page))
        .route("/health", get(handlers::health::check))
        .merge(api_routes)
        .nest_service("/samples", ServeDir::new(&state.config.sample_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
