//! Axum-based JSON front end over one shared conversation.
//!
//! The engine's turn order still holds here: handlers lock the conversation
//! for a whole turn, so reconfiguration and stepping land between turns and
//! no two backend calls are ever in flight for the same conversation.

mod handlers;

use crate::config::Config;
use crate::conversation::{Conversation, RunMetadata};
use crate::providers::{OllamaProvider, Provider};
use anyhow::Result;
use axum::{
    Router,
    routing::{get, post},
};
use handlers::{
    handle_health, handle_models, handle_restart, handle_save, handle_step, handle_transcript,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Maximum request body size (64KB) — prompt edits are the largest payload
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout — a step blocks on model generation, so this is generous
pub const REQUEST_TIMEOUT_SECS: u64 = 600;

/// Shared state for all axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn Provider>,
    pub conversation: Arc<Mutex<Conversation>>,
    pub metadata: Arc<Mutex<RunMetadata>>,
    pub config: Arc<Config>,
    pub log_dir: PathBuf,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/models", get(handle_models))
        .route("/api/transcript", get(handle_transcript))
        .route("/api/step", post(handle_step))
        .route("/api/restart", post(handle_restart))
        .route("/api/save", post(handle_save))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
        .with_state(state)
}

/// Serve the web front end until the process exits.
pub async fn serve(host: &str, port: u16, config: Config) -> Result<()> {
    let personas = config.load_personas()?;
    let provider: Arc<dyn Provider> = Arc::new(OllamaProvider::new(&config.endpoint));

    let metadata = RunMetadata {
        endpoint: config.endpoint.clone(),
        models: [personas[0].model.clone(), personas[1].model.clone()],
        system_prompts: [
            personas[0].system_prompt.clone(),
            personas[1].system_prompt.clone(),
        ],
        started_at: chrono::Local::now(),
    };
    let conversation = Conversation::new(
        Arc::clone(&provider),
        personas,
        config.token_budget(),
        config.options.clone(),
        config.initial_message.clone(),
    );

    let state = AppState {
        provider,
        conversation: Arc::new(Mutex::new(conversation)),
        metadata: Arc::new(Mutex::new(metadata)),
        config: Arc::new(config),
        log_dir: PathBuf::from("."),
    };

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "web front end listening on http://{host}:{}",
        listener.local_addr()?.port()
    );

    axum::serve(listener, router(state)).await?;
    Ok(())
}
