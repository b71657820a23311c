use super::AppState;
use crate::conversation::{Conversation, PersonaConfig, write_log};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// GET /health — liveness probe
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// GET /api/models — model tags straight from the backend
pub(super) async fn handle_models(State(state): State<AppState>) -> impl IntoResponse {
    match state.provider.list_models().await {
        Ok(models) => (StatusCode::OK, Json(json!({"models": models}))),
        Err(e) => {
            tracing::warn!(error = %e, "model listing failed");
            (StatusCode::BAD_GATEWAY, Json(json!({"error": e.to_string()})))
        }
    }
}

/// GET /api/transcript — accumulated formatted entries
pub(super) async fn handle_transcript(State(state): State<AppState>) -> impl IntoResponse {
    let conversation = state.conversation.lock().await;
    Json(json!({
        "entries": conversation.transcript().entries(),
        "exchanges": conversation.exchanges(),
        "done": conversation.is_stopped(),
    }))
}

/// POST /api/step — advance exactly one turn
pub(super) async fn handle_step(State(state): State<AppState>) -> impl IntoResponse {
    let mut conversation = state.conversation.lock().await;
    match conversation.step().await {
        Ok(Some(record)) => (
            StatusCode::OK,
            Json(json!({
                "done": conversation.is_stopped(),
                "persona": record.persona.number(),
                "model": record.model,
                "formatted": record.formatted,
            })),
        ),
        Ok(None) => (StatusCode::OK, Json(json!({"done": true}))),
        Err(e) => {
            tracing::error!(error = %e, "turn failed");
            (StatusCode::BAD_GATEWAY, Json(json!({"error": e.to_string()})))
        }
    }
}

/// POST /api/restart request body — every field optional, current values
/// carry over when absent.
#[derive(Debug, Default, Deserialize)]
pub(super) struct RestartBody {
    pub initial_message: Option<String>,
    pub model_1: Option<String>,
    pub model_2: Option<String>,
    pub system_prompt_1: Option<String>,
    pub system_prompt_2: Option<String>,
}

/// POST /api/restart — rebuild the conversation with edited personas.
///
/// Reconfiguring a persona re-seeds both histories: a fresh engine value
/// replaces the old one wholesale.
pub(super) async fn handle_restart(
    State(state): State<AppState>,
    body: Result<Json<RestartBody>, axum::extract::rejection::JsonRejection>,
) -> impl IntoResponse {
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let mut metadata = state.metadata.lock().await;
    let models = [
        body.model_1.unwrap_or_else(|| metadata.models[0].clone()),
        body.model_2.unwrap_or_else(|| metadata.models[1].clone()),
    ];
    let prompts = [
        body.system_prompt_1
            .unwrap_or_else(|| metadata.system_prompts[0].clone()),
        body.system_prompt_2
            .unwrap_or_else(|| metadata.system_prompts[1].clone()),
    ];
    let initial = body
        .initial_message
        .unwrap_or_else(|| state.config.initial_message.clone());

    let personas = [
        PersonaConfig {
            model: models[0].clone(),
            system_prompt: prompts[0].clone(),
        },
        PersonaConfig {
            model: models[1].clone(),
            system_prompt: prompts[1].clone(),
        },
    ];
    let fresh = Conversation::new(
        Arc::clone(&state.provider),
        personas,
        state.config.token_budget(),
        state.config.options.clone(),
        initial.clone(),
    );
    *state.conversation.lock().await = fresh;

    metadata.models = models;
    metadata.system_prompts = prompts;
    metadata.started_at = chrono::Local::now();
    tracing::info!("conversation restarted");

    Json(json!({"restarted": true, "initial_message": initial}))
}

/// POST /api/save — write the transcript log now
pub(super) async fn handle_save(State(state): State<AppState>) -> impl IntoResponse {
    let metadata = state.metadata.lock().await;
    let conversation = state.conversation.lock().await;
    match write_log(&state.log_dir, &metadata, conversation.transcript()) {
        Ok(path) => (
            StatusCode::OK,
            Json(json!({"path": path.display().to_string()})),
        ),
        Err(e) => {
            tracing::error!(error = %e, "transcript save failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": e.to_string()})),
            )
        }
    }
}
