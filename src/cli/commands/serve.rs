//! HTTP API server exposing the question-answering endpoint.

use crate::cli::Output;
use crate::config::{Prompts, Settings};
use crate::embedding::OpenAIEmbedder;
use crate::error::HarkError;
use crate::generation::OpenAIGenerator;
use crate::index::{IndexStore, SnapshotHandle};
use crate::rag::{AnswerSynthesizer, ContextRetriever, HistoryTurn, RagEngine, RagResponse};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

/// Shared application state.
struct AppState {
    engine: RagEngine,
    snapshot: Arc<SnapshotHandle>,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let prompts = Prompts::load(settings.prompts.custom_path.as_deref())?;

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        &settings.embedding.model,
        settings.embedding.dimensions as usize,
    ));

    let store = IndexStore::open(&settings.index_path())?;
    let snapshot = Arc::new(SnapshotHandle::new(store.load_snapshot()?));

    let retriever =
        ContextRetriever::new(embedder, snapshot.clone()).with_top_k(settings.rag.top_k);
    let generator = Arc::new(OpenAIGenerator::new(
        &settings.generation.model,
        &prompts.rag.system,
    ));
    let synthesizer = AnswerSynthesizer::new(generator);
    let engine = RagEngine::new(retriever, synthesizer, settings.rag.max_history_words);

    let state = Arc::new(AppState { engine, snapshot });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health_check", get(health_check))
        .route("/ask", post(ask))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Hark API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health_check");
    Output::kv("Ask (RAG)", "POST /ask");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    history: Vec<HistoryTurn>,
}

#[derive(Serialize)]
struct AskResponse {
    meta: serde_json::Value,
    data: RagResponse,
}

#[derive(Serialize)]
struct ErrorResponse {
    meta: serde_json::Value,
    errors: serde_json::Value,
}

impl ErrorResponse {
    fn message(msg: &str) -> Self {
        Self {
            meta: json!({}),
            errors: json!({ "message": msg }),
        }
    }
}

// === Handlers ===

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let ok = !state.snapshot.current().is_empty();
    Json(json!({ "meta": { "ok": ok } }))
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> impl IntoResponse {
    let message = req.message.unwrap_or_default();

    match state.engine.answer_question(&message, &req.history).await {
        Ok(response) => Json(AskResponse {
            meta: json!({}),
            data: response,
        })
        .into_response(),
        Err(HarkError::Validation(msg)) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::message(&msg))).into_response()
        }
        Err(e) => {
            error!("Failed to answer question: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::message(&e.to_string())),
            )
                .into_response()
        }
    }
}
