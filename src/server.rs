use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use tracing::info;

use crate::config::AppConfig;
use crate::graph::{DatabaseStats, GraphError, GraphStore, Neo4jStore, Params, QueryExecutor, Row};
use crate::llm::{ChatCompletionsClient, LlmSettings};
use crate::translator::{QueryGuard, Translator};

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Natural-language to Cypher translation.
    pub translator: Arc<Translator>,
    /// Runs translated queries.
    pub executor: QueryExecutor,
    /// Direct store access for health and stats.
    pub graph: Arc<dyn GraphStore>,
}

impl AppState {
    pub fn new(translator: Translator, graph: Arc<dyn GraphStore>) -> Self {
        Self {
            translator: Arc::new(translator),
            executor: QueryExecutor::new(Arc::clone(&graph)),
            graph,
        }
    }
}

/// Build the state from configuration: one graph pool, one model client.
pub async fn build_state(config: &AppConfig, settings: LlmSettings) -> Result<AppState, GraphError> {
    let graph: Arc<dyn GraphStore> = Arc::new(Neo4jStore::connect(&config.graph).await?);
    let client = Arc::new(ChatCompletionsClient::new(settings));

    let mut translator = Translator::new(client);
    if config.translator.validate_generated {
        translator = translator.with_guard(QueryGuard::default());
        info!("Generated-query validation enabled");
    }

    Ok(AppState::new(translator, graph))
}

/// All routes, with request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/movies/search/{query}", get(search_movies))
        .route("/health", get(health_check))
        .route("/debug/database-stats", get(database_stats))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>, settings: LlmSettings) -> anyhow::Result<()> {
    info!(
        name: "llm.config.loaded",
        base_url = %settings.base_url,
        model = %settings.model,
        provider = settings.provider.name(),
        api_key_set = settings.api_key.is_some(),
        "LLM configuration loaded"
    );
    info!(graph = ?config.graph, "Graph store configured");

    let state = build_state(&config, settings).await?;
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Any handler failure: `500 {"detail": message}`.
#[derive(Debug)]
pub struct ApiError(String);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": self.0 })),
        )
            .into_response()
    }
}

/// Executed query, echoed back for inspection.
#[derive(Debug, Serialize)]
pub struct QueryDebug {
    pub cypher: String,
    pub params: Params,
}

/// Response from the search API.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub message: String,
    /// The translator's explanation of what was searched.
    pub interpretation: String,
    pub results: Vec<Row>,
    pub debug: QueryDebug,
}

/// GET /movies/search/{query}
async fn search_movies(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<SearchResponse>, ApiError> {
    info!(query = %query, "Received search query");

    let generated = state.translator.translate(&query).await;
    let results = state.executor.execute(&generated).await.map_err(|e| {
        tracing::error!(error = %e, "Search failed");
        ApiError(e.to_string())
    })?;

    let message = if results.is_empty() {
        "No movies found matching your criteria".to_string()
    } else {
        format!("Found {} movies", results.len())
    };

    Ok(Json(SearchResponse {
        message,
        interpretation: generated.explanation,
        results,
        debug: QueryDebug {
            cypher: generated.cypher,
            params: generated.params,
        },
    }))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.graph.ping().await.map_err(|e| {
        tracing::error!(error = %e, "Health check failed");
        ApiError(format!("Database connection error: {e}"))
    })?;
    Ok(Json(json!({ "status": "healthy", "database": "connected" })))
}

/// GET /debug/database-stats
async fn database_stats(State(state): State<AppState>) -> Result<Json<DatabaseStats>, ApiError> {
    DatabaseStats::collect(state.graph.as_ref())
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(error = %e, "Error getting stats");
            ApiError(e.to_string())
        })
}
