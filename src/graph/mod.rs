//! Property-graph store access.
//!
//! The rest of the crate talks to the graph through [`GraphStore`]: a
//! statement plus bound parameters go in, rows come out as maps from column
//! name to JSON value. Every call is its own implicit transaction.

pub mod executor;
pub mod neo4j;
pub mod stats;

pub use executor::QueryExecutor;
pub use neo4j::Neo4jStore;
pub use stats::DatabaseStats;

use async_trait::async_trait;

/// One result row: column name to value.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Bound query parameters.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Errors raised by a graph store.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The driver failed to connect, or the server rejected the statement.
    #[error("graph store error: {0}")]
    Driver(#[from] neo4rs::Error),

    /// The store's response could not be understood.
    #[error("could not decode graph store response: {0}")]
    Decode(String),
}

/// A property-graph store that executes parameterised statements.
#[async_trait]
pub trait GraphStore: Send + Sync + std::fmt::Debug {
    /// Execute one statement and return all rows.
    async fn run(&self, statement: &str, params: &Params) -> Result<Vec<Row>, GraphError>;

    /// Trivial round trip used by health checks.
    async fn ping(&self) -> Result<(), GraphError> {
        self.run("RETURN 1 AS n", &Params::new()).await.map(|_| ())
    }
}

/// Build a parameter map from `(name, value)` pairs.
pub fn params<I, K, V>(pairs: I) -> Params
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<serde_json::Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Run a statement expected to return a single integer column.
///
/// An empty result counts as zero.
pub async fn scalar(
    store: &dyn GraphStore,
    statement: &str,
    column: &str,
) -> Result<i64, GraphError> {
    let rows = store.run(statement, &Params::new()).await?;
    match rows.first() {
        None => Ok(0),
        Some(row) => row
            .get(column)
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| GraphError::Decode(format!("missing integer column `{column}`"))),
    }
}
