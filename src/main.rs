//! Movie Graph Explorer server and loader.
//!
//! `serve` (the default) runs the search API; `load`, `verify` and `check`
//! operate on the stores directly and exit.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use serde::Serialize;
use tracing::info;

use movie_graph_explorer::config::{AppConfig, Cli, Command, load_llm_settings};
use movie_graph_explorer::documents::{DocumentStore, SurrealDocumentStore};
use movie_graph_explorer::graph::{GraphStore, Neo4jStore, Params};
use movie_graph_explorer::loader::{CorpusLoader, parse_csv};
use movie_graph_explorer::{server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before anything reads the environment
    let _ = dotenv();

    telemetry::init();

    let cli = Cli::parse();
    let config = Arc::new(AppConfig::from_cli(&cli).context("Failed to load configuration")?);

    match cli.command.clone().unwrap_or(Command::Serve) {
        Command::Serve => server::start_server(config, load_llm_settings()).await,
        Command::Load {
            skip_documents, ..
        } => load(&config, skip_documents).await,
        Command::Verify => verify(&config).await,
        Command::Check => check(&config).await,
    }
}

async fn stores(config: &AppConfig) -> anyhow::Result<CorpusLoader> {
    let graph: Arc<dyn GraphStore> = Arc::new(
        Neo4jStore::connect(&config.graph)
            .await
            .context("Failed to open graph store")?,
    );
    let documents: Arc<dyn DocumentStore> = Arc::new(
        SurrealDocumentStore::connect(&config.documents)
            .await
            .context("Failed to open document store")?,
    );
    Ok(CorpusLoader::new(graph, documents))
}

async fn load(config: &AppConfig, skip_documents: bool) -> anyhow::Result<()> {
    let loader = stores(config).await?;
    let path = config.loader.csv_path.as_path();

    if !skip_documents {
        let report = loader.run(path).await?;
        return print_json(&report);
    }

    let records = parse_csv(path)?;
    let summary = loader.load_to_graph(&records).await?;
    info!("Skipping document store");
    print_json(&summary)?;
    print_json(&loader.verify().await?)
}

async fn verify(config: &AppConfig) -> anyhow::Result<()> {
    let report = stores(config).await?.verify().await?;
    print_json(&report)
}

async fn check(config: &AppConfig) -> anyhow::Result<()> {
    let graph = Neo4jStore::connect(&config.graph)
        .await
        .with_context(|| format!("Connection failed: {}", config.graph.url))?;
    let rows = graph
        .run("RETURN 'Connection Successful' AS message", &Params::new())
        .await
        .with_context(|| format!("Connection failed: {}", config.graph.url))?;

    let message = rows
        .first()
        .and_then(|row| row.get("message"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default();
    println!("{message}");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
