// http server mode - run dbchat as an api

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::{Db, Engine, Error, Provider, SqlTool};

struct AppState {
    // one turn at a time; also serializes same-thread turns as required
    engine: tokio::sync::Mutex<Engine>,
    schema: String,
}

#[derive(Deserialize)]
struct ChatRequest {
    message: String,
    #[serde(default = "default_thread")]
    thread_id: String,
}

fn default_thread() -> String {
    "default".to_string()
}

#[derive(Serialize)]
struct ChatResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    queries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub struct Server;

impl Server {
    pub async fn run(
        db_url: &str,
        host: &str,
        port: u16,
        provider: Provider,
        api_key: Option<String>,
    ) -> Result<(), Error> {
        let db = Db::connect(db_url).await?;
        let schema = db.schema().await?;

        let model = provider.client(api_key)?;
        let engine = Engine::new(model, SqlTool::new(Box::new(db)), &schema);

        let state = Arc::new(AppState {
            engine: tokio::sync::Mutex::new(engine),
            schema,
        });

        let app = Router::new()
            .route("/health", get(health))
            .route("/chat", post(chat))
            .route("/schema", get(get_schema))
            .layer(CorsLayer::permissive())
            .with_state(state);

        let addr = format!("{host}:{port}");
        println!("server running at http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn get_schema(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "schema": state.schema }))
}

async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> (StatusCode, Json<ChatResponse>) {
    let mut engine = state.engine.lock().await;

    match engine.run_turn(&req.thread_id, &req.message).await {
        Ok(output) => (
            StatusCode::OK,
            Json(ChatResponse {
                reply: Some(output.reply),
                queries: output.queries,
                error: None,
            }),
        ),
        // turn-level faults; history stays intact for a retry
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(ChatResponse {
                reply: None,
                queries: Vec::new(),
                error: Some(e.to_string()),
            }),
        ),
    }
}
