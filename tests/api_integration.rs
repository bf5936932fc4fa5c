//! HTTP surface tests against in-process fakes for both the graph store and
//! the completion service.

use anyhow::anyhow;
use async_trait::async_trait;
use axum_test::TestServer;
use movie_graph_explorer::graph::{GraphError, GraphStore, Params, Row};
use movie_graph_explorer::llm::{CompletionClient, CompletionRequest};
use movie_graph_explorer::server::{AppState, build_router};
use movie_graph_explorer::translator::Translator;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

// =============================================================================
// Test Utilities
// =============================================================================

/// Graph store answering from a fixed row set, or failing every call.
#[derive(Debug, Default)]
struct FakeGraph {
    rows: Vec<Row>,
    down: bool,
    seen: Mutex<Vec<(String, Params)>>,
}

impl FakeGraph {
    fn with_rows(rows: Vec<Value>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .filter_map(|v| v.as_object().cloned())
                .collect(),
            ..Self::default()
        }
    }

    fn down() -> Self {
        Self {
            down: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl GraphStore for FakeGraph {
    async fn run(&self, statement: &str, params: &Params) -> Result<Vec<Row>, GraphError> {
        self.seen
            .lock()
            .unwrap()
            .push((statement.to_string(), params.clone()));
        if self.down {
            return Err(refused());
        }
        if statement.contains("count(") {
            let mut row = Row::new();
            row.insert("count".to_string(), json!(self.rows.len()));
            return Ok(vec![row]);
        }
        Ok(self.rows.clone())
    }
}

fn refused() -> GraphError {
    GraphError::from(neo4rs::Error::from(std::io::Error::from(
        std::io::ErrorKind::ConnectionRefused,
    )))
}

#[derive(Debug)]
struct ScriptedClient(Result<String, String>);

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _req: CompletionRequest) -> anyhow::Result<String> {
        self.0.clone().map_err(|e| anyhow!(e))
    }
}

fn server(graph: Arc<FakeGraph>, answer: Result<&str, &str>) -> TestServer {
    let client = Arc::new(ScriptedClient(
        answer.map(str::to_string).map_err(str::to_string),
    ));
    let state = AppState::new(Translator::new(client), graph);
    TestServer::new(build_router(state)).expect("test server")
}

fn matrix_row() -> Value {
    json!({
        "title": "The Matrix",
        "genre": "Sci-Fi",
        "description": "A hacker learns the truth about reality.",
        "director": "Wachowski Sisters",
        "actors": ["Keanu Reeves", "Laurence Fishburne"]
    })
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_prefixed_search_uses_template() {
    let graph = Arc::new(FakeGraph::with_rows(vec![matrix_row()]));
    let server = server(Arc::clone(&graph), Err("model must not be called"));

    let response = server.get("/movies/search/genre:Sci-Fi").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "Found 1 movies");
    assert_eq!(body["interpretation"], "Finding movies in the sci-fi genre");
    assert_eq!(body["results"][0]["title"], "The Matrix");
    assert_eq!(body["debug"]["params"], json!({ "value": "sci-fi" }));
    assert!(
        body["debug"]["cypher"]
            .as_str()
            .unwrap()
            .contains("toLower(m.genre)")
    );

    let seen = graph.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].1, body["debug"]["params"].as_object().unwrap().clone());
}

#[tokio::test]
async fn test_empty_results_message() {
    let graph = Arc::new(FakeGraph::default());
    let server = server(graph, Err("unused"));

    let response = server.get("/movies/search/actor:Nobody").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "No movies found matching your criteria");
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn test_model_failure_still_answers_with_fallback() {
    let graph = Arc::new(FakeGraph::with_rows(vec![matrix_row()]));
    let server = server(graph, Err("connection refused"));

    let response = server.get("/movies/search/hacker").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["interpretation"], "Fallback to general search due to error");
    assert_eq!(body["debug"]["params"], json!({ "query": "hacker" }));
}

#[tokio::test]
async fn test_model_query_is_executed() {
    let answer = json!({
        "cypher": "MATCH (m:Movie) WHERE m.title = $title RETURN m.title AS title",
        "params": { "title": "The Matrix" },
        "explanation": "Look up one title"
    })
    .to_string();
    let graph = Arc::new(FakeGraph::with_rows(vec![json!({ "title": "The Matrix" })]));
    let server = server(Arc::clone(&graph), Ok(&answer));

    let response = server.get("/movies/search/tell%20me%20about%20the%20matrix").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["interpretation"], "Look up one title");
    assert_eq!(body["results"], json!([{ "title": "The Matrix" }]));
    assert_eq!(
        graph.seen.lock().unwrap()[0].0,
        "MATCH (m:Movie) WHERE m.title = $title RETURN m.title AS title"
    );
}

#[tokio::test]
async fn test_store_failure_is_500_with_detail() {
    let server = server(Arc::new(FakeGraph::down()), Err("unused"));

    let response = server.get("/movies/search/genre:Drama").await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(body["detail"], refused().to_string());
}

// =============================================================================
// Health and stats
// =============================================================================

#[tokio::test]
async fn test_health_ok() {
    let server = server(Arc::new(FakeGraph::default()), Err("unused"));

    let response = server.get("/health").await;
    response.assert_status_ok();
    response.assert_json(&json!({ "status": "healthy", "database": "connected" }));
}

#[tokio::test]
async fn test_health_reports_database_error() {
    let server = server(Arc::new(FakeGraph::down()), Err("unused"));

    let response = server.get("/health").await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Database connection error: ")
    );
}

#[tokio::test]
async fn test_database_stats_shape() {
    let server = server(
        Arc::new(FakeGraph::with_rows(vec![matrix_row()])),
        Err("unused"),
    );

    let response = server.get("/debug/database-stats").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["movies"], 1);
    assert_eq!(body["actors"], 1);
    assert_eq!(body["directors"], 1);
    assert_eq!(body["sample_data"][0]["title"], "The Matrix");
}
