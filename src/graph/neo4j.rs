//! Neo4j over Bolt, through the `neo4rs` driver.
//!
//! Every call runs as one auto-commit statement on the configured database.
//! JSON parameters are converted to Bolt values on the way in and result rows
//! are deserialized back into JSON maps on the way out.

use async_trait::async_trait;
use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType, ConfigBuilder, Graph, query};
use serde_json::Value;

use super::{GraphError, GraphStore, Params, Row};
use crate::config::GraphConfig;

/// Graph store backed by a Neo4j connection pool.
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Graph,
    uri: String,
    database: String,
}

impl std::fmt::Debug for Neo4jStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Neo4jStore")
            .field("uri", &self.uri)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl Neo4jStore {
    /// Open a pool against `config.url` (`neo4j://`, `bolt://`, `neo4j+s://`, ...).
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let driver_config = ConfigBuilder::default()
            .uri(config.url.as_str())
            .user(config.user.as_str())
            .password(config.password.as_str())
            .db(config.database.as_str())
            .build()?;
        let graph = Graph::connect(driver_config).await?;

        Ok(Self {
            graph,
            uri: config.url.clone(),
            database: config.database.clone(),
        })
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn run(&self, statement: &str, params: &Params) -> Result<Vec<Row>, GraphError> {
        let q = params
            .iter()
            .fold(query(statement), |q, (name, value)| q.param(name, to_bolt(value)));

        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(decode_row(&row)?);
        }
        Ok(rows)
    }
}

/// JSON parameter value to its Bolt counterpart.
///
/// Integral numbers stay integers so `LIMIT $n` and id comparisons work.
fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => BoltType::List(BoltList {
            value: items.iter().map(to_bolt).collect(),
        }),
        Value::Object(map) => BoltType::Map(BoltMap {
            value: map
                .iter()
                .map(|(k, v)| (BoltString::from(k.as_str()), to_bolt(v)))
                .collect(),
        }),
    }
}

fn decode_row(row: &neo4rs::Row) -> Result<Row, GraphError> {
    row.to::<Row>()
        .map_err(|e| GraphError::Decode(e.to_string()))
}
