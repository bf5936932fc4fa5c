//! Corpus loading: CSV → graph store + document store.
//!
//! The pipeline is strictly sequential: [`parse_csv`], then
//! [`CorpusLoader::load_to_graph`], then [`CorpusLoader::load_to_documents`],
//! then [`CorpusLoader::verify`]. The graph load is destructive; it wipes
//! the whole graph before writing, so a reload of the same file always ends
//! in the same node and relationship counts. Readers that query during a
//! reload can see a partially rebuilt graph.

pub mod parse;

pub use parse::{REQUIRED_COLUMNS, parse_csv, parse_reader, split_actors};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::documents::{DocumentStore, MovieDocument};
use crate::graph::stats::{COUNT_ACTORS, COUNT_DIRECTORS, COUNT_MOVIES};
use crate::graph::{GraphError, GraphStore, Params, Row, params, scalar};

const CLEAR_GRAPH: &str = "MATCH (n) DETACH DELETE n";

const CREATE_INDEXES: [&str; 3] = [
    "CREATE INDEX movie_id IF NOT EXISTS FOR (m:Movie) ON (m.movie_id)",
    "CREATE INDEX actor_name IF NOT EXISTS FOR (a:Actor) ON (a.name)",
    "CREATE INDEX director_name IF NOT EXISTS FOR (d:Director) ON (d.name)",
];

const CREATE_MOVIE: &str = "
CREATE (m:Movie {
    movie_id: $movie_id,
    title: $title,
    genre: $genre,
    description: $description
})
";

const MERGE_DIRECTOR: &str = "
MERGE (d:Director {name: $director})
WITH d
MATCH (m:Movie {movie_id: $movie_id})
CREATE (d)-[:DIRECTED]->(m)
";

const MERGE_ACTOR: &str = "
MERGE (a:Actor {name: $actor})
WITH a
MATCH (m:Movie {movie_id: $movie_id})
CREATE (a)-[:ACTED_IN]->(m)
";

const ACTED_IN_STATS: &str = "
MATCH (a:Actor)-[r:ACTED_IN]->(m:Movie)
RETURN count(r) AS total_rels,
       count(DISTINCT a) AS unique_actors,
       count(DISTINCT m) AS unique_movies
";

const COUNT_MOVIES_WITHOUT_CAST: &str =
    "MATCH (m:Movie) WHERE NOT (m)<-[:ACTED_IN]-(:Actor) RETURN count(m) AS count";

const SAMPLE_RELATIONSHIPS: &str = "
MATCH (a:Actor)-[r:ACTED_IN]->(m:Movie)
RETURN a.name AS actor, m.title AS movie
LIMIT 5
";

/// One normalised CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieRecord {
    pub movie_id: String,
    pub title: String,
    /// Empty when the source row names no director.
    pub director: String,
    pub genre: String,
    pub actors: Vec<String>,
    pub description: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    #[error("row on line {line} has no movie_id")]
    MissingMovieId { line: usize },

    #[error("movie_id {0:?} appears more than once")]
    DuplicateMovieId(String),

    #[error("graph store: {0}")]
    Graph(#[from] GraphError),

    #[error("document store: {0:#}")]
    Documents(anyhow::Error),
}

/// Node counts after a graph load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphLoadSummary {
    pub movies: i64,
    pub actors: i64,
    pub directors: i64,
}

/// Outcome of a document load; failed rows are skipped, not fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentLoadSummary {
    pub inserted: usize,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActedInStats {
    pub total_rels: i64,
    pub unique_actors: i64,
    pub unique_movies: i64,
}

/// Read-only diagnostics over both stores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub movies: i64,
    pub acted_in: ActedInStats,
    pub movies_without_cast: i64,
    pub sample_relationships: Vec<Row>,
    pub documents: usize,
}

/// Everything a full `load` run produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub records: usize,
    pub graph: GraphLoadSummary,
    pub documents: DocumentLoadSummary,
    pub verification: VerificationReport,
}

/// Writes parsed records into the graph and document stores.
#[derive(Debug, Clone)]
pub struct CorpusLoader {
    graph: Arc<dyn GraphStore>,
    documents: Arc<dyn DocumentStore>,
}

impl CorpusLoader {
    pub fn new(graph: Arc<dyn GraphStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { graph, documents }
    }

    /// Parse, load both stores and verify.
    pub async fn run(&self, path: &Path) -> Result<LoadReport, LoadError> {
        let records = parse_csv(path)?;
        let graph = self.load_to_graph(&records).await?;
        let documents = self.load_to_documents(&records).await;
        let verification = self.verify().await?;

        Ok(LoadReport {
            records: records.len(),
            graph,
            documents,
            verification,
        })
    }

    /// Replace the whole graph with `records`.
    pub async fn load_to_graph(
        &self,
        records: &[MovieRecord],
    ) -> Result<GraphLoadSummary, LoadError> {
        tracing::info!(records = records.len(), "Loading to graph store");
        let store = self.graph.as_ref();
        let none = Params::new();

        store.run(CLEAR_GRAPH, &none).await?;

        tracing::debug!("Creating indexes");
        for statement in CREATE_INDEXES {
            store.run(statement, &none).await?;
        }

        for record in records {
            // Movie first: both edge statements MATCH on it.
            store
                .run(
                    CREATE_MOVIE,
                    &params([
                        ("movie_id", record.movie_id.as_str()),
                        ("title", record.title.as_str()),
                        ("genre", record.genre.as_str()),
                        ("description", record.description.as_str()),
                    ]),
                )
                .await?;

            if !record.director.trim().is_empty() {
                store
                    .run(
                        MERGE_DIRECTOR,
                        &params([
                            ("director", record.director.as_str()),
                            ("movie_id", record.movie_id.as_str()),
                        ]),
                    )
                    .await?;
            }

            for actor in &record.actors {
                store
                    .run(
                        MERGE_ACTOR,
                        &params([
                            ("actor", actor.as_str()),
                            ("movie_id", record.movie_id.as_str()),
                        ]),
                    )
                    .await?;
            }
        }

        let summary = GraphLoadSummary {
            movies: scalar(store, COUNT_MOVIES, "count").await?,
            actors: scalar(store, COUNT_ACTORS, "count").await?,
            directors: scalar(store, COUNT_DIRECTORS, "count").await?,
        };
        tracing::info!(
            movies = summary.movies,
            actors = summary.actors,
            directors = summary.directors,
            "Graph load complete"
        );
        Ok(summary)
    }

    /// Write one document per record; failures are logged and skipped.
    pub async fn load_to_documents(&self, records: &[MovieRecord]) -> DocumentLoadSummary {
        tracing::info!(records = records.len(), "Loading to document store");
        let mut summary = DocumentLoadSummary::default();

        for record in records {
            let doc = MovieDocument::from(record);
            match self.documents.add(&doc).await {
                Ok(()) => summary.inserted += 1,
                Err(e) => {
                    tracing::error!(
                        movie_id = %record.movie_id,
                        error = %format!("{e:#}"),
                        "Error processing record"
                    );
                    summary.failed.push(record.movie_id.clone());
                }
            }
        }

        tracing::info!(
            inserted = summary.inserted,
            failed = summary.failed.len(),
            "Document load complete"
        );
        summary
    }

    /// Report counts and samples from both stores. Never writes.
    pub async fn verify(&self) -> Result<VerificationReport, LoadError> {
        let store = self.graph.as_ref();

        let movies = scalar(store, COUNT_MOVIES, "count").await?;
        let acted_in = acted_in_stats(store).await?;
        let movies_without_cast = scalar(store, COUNT_MOVIES_WITHOUT_CAST, "count").await?;
        let sample_relationships = store.run(SAMPLE_RELATIONSHIPS, &Params::new()).await?;
        let documents = self.documents.count().await.map_err(LoadError::Documents)?;

        tracing::info!(
            movies,
            total_rels = acted_in.total_rels,
            unique_actors = acted_in.unique_actors,
            unique_movies = acted_in.unique_movies,
            movies_without_cast,
            documents,
            "Verification statistics"
        );

        Ok(VerificationReport {
            movies,
            acted_in,
            movies_without_cast,
            sample_relationships,
            documents,
        })
    }
}

async fn acted_in_stats(store: &dyn GraphStore) -> Result<ActedInStats, GraphError> {
    let rows = store.run(ACTED_IN_STATS, &Params::new()).await?;
    let field = |name: &str| -> Result<i64, GraphError> {
        rows.first()
            .map_or(Some(0), |row| row.get(name).and_then(serde_json::Value::as_i64))
            .ok_or_else(|| GraphError::Decode(format!("missing integer column `{name}`")))
    };

    Ok(ActedInStats {
        total_rels: field("total_rels")?,
        unique_actors: field("unique_actors")?,
        unique_movies: field("unique_movies")?,
    })
}
