use crate::llm::provider::DEFAULT_AZURE_API_VERSION;
use crate::llm::{LlmSettings, Provider};
use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT", global = true)]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the search API (default)
    Serve,
    /// Rebuild the graph and document stores from a CSV file
    Load {
        /// CSV file to load (overrides `loader.csv_path`)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Only load the graph store
        #[arg(long)]
        skip_documents: bool,
    },
    /// Print graph and document store statistics
    Verify,
    /// Check that the graph store answers
    Check,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub documents: DocumentsConfig,
    pub translator: TranslatorConfig,
    pub loader: LoaderConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct GraphConfig {
    /// Bolt URI, e.g. `neo4j://localhost:7687` or `neo4j+s://<id>.databases.neo4j.io`
    pub url: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl std::fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    /// SurrealDB endpoint: `mem://`, `surrealkv://path` or `ws://host:port`
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub collection: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TranslatorConfig {
    /// Reject model-generated queries that write or leave the movie schema.
    pub validate_generated: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoaderConfig {
    pub csv_path: PathBuf,
}

impl AppConfig {
    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Self::from_cli(&cli)
    }

    /// Layers, lowest first: defaults, legacy `NEO4J_*` env, config file,
    /// `MOVIES_*` env, CLI flags (and their env vars).
    pub fn from_cli(cli: &Cli) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.port", 8000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("graph.url", "neo4j://localhost:7687")?
            .set_default("graph.user", "neo4j")?
            .set_default("graph.password", "password")?
            .set_default("graph.database", "neo4j")?
            .set_default("documents.url", "mem://")?
            .set_default("documents.namespace", "movies")?
            .set_default("documents.database", "movies")?
            .set_default("documents.collection", "movie_descriptions")?
            .set_default("translator.validate_generated", false)?
            .set_default("loader.csv_path", "data/movies.csv")?;

        // Legacy deployment variables only replace the built-in defaults.
        if let Ok(uri) = env::var("NEO4J_URI") {
            builder = builder.set_default("graph.url", uri)?;
        }
        if let Ok(user) = env::var("NEO4J_USER") {
            builder = builder.set_default("graph.user", user)?;
        }
        if let Ok(password) = env::var("NEO4J_PASSWORD") {
            builder = builder.set_default("graph.password", password)?;
        }

        // Explicit file must exist; ./config.* is picked up only if present.
        builder = match &cli.config {
            Some(path) => builder.add_source(File::from(Path::new(path))),
            None => builder.add_source(File::with_name("config").required(false)),
        };

        // E.g. MOVIES_GRAPH__URL=neo4j://graph:7687
        builder = builder.add_source(
            Environment::with_prefix("MOVIES")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(Command::Load { csv: Some(csv), .. }) = &cli.command {
            builder = builder.set_override("loader.csv_path", csv.to_string_lossy().as_ref())?;
        }

        let cfg = builder.build()?;
        cfg.try_deserialize()
    }
}

/// Completion-service settings from the environment.
///
/// Never fails: a missing key only makes model calls fail later, which the
/// translator absorbs with its fallback query.
pub fn load_llm_settings() -> LlmSettings {
    let base_url = env::var("LLM_BASE_URL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "https://api.openai.com".to_string());

    let model = env::var("LLM_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| "gpt-4-turbo-preview".to_string());

    let api_key = env::var("LLM_API_KEY")
        .ok()
        .or_else(|| env::var("OPENAI_API_KEY").ok())
        .filter(|s| !s.trim().is_empty());

    let temperature = env::var("LLM_TEMPERATURE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0.1);

    // Auto-detect provider from base URL
    let mut provider = Provider::detect_from_url(&base_url);
    if let Provider::AzureOpenAI { .. } = &provider {
        if let Ok(deployment) = env::var("AZURE_DEPLOYMENT_NAME") {
            provider = Provider::AzureOpenAI {
                deployment_name: deployment,
                api_version: env::var("AZURE_API_VERSION")
                    .unwrap_or_else(|_| DEFAULT_AZURE_API_VERSION.to_string()),
            };
        }
    }

    LlmSettings {
        base_url,
        api_key,
        model,
        temperature,
        provider,
    }
}
