use std::sync::Arc;

use super::{GraphError, GraphStore, Row};
use crate::translator::GeneratedQuery;

/// Runs translated queries against the graph store.
///
/// No retry, no timeout and no pagination: store failures are returned
/// to the caller exactly as the store reported them.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    store: Arc<dyn GraphStore>,
}

impl QueryExecutor {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, query: &GeneratedQuery) -> Result<Vec<Row>, GraphError> {
        tracing::debug!(
            cypher = %query.cypher.trim(),
            params = %serde_json::Value::Object(query.params.clone()),
            "Executing query"
        );

        match self.store.run(&query.cypher, &query.params).await {
            Ok(rows) => {
                tracing::debug!(row_count = rows.len(), "Query returned rows");
                Ok(rows)
            }
            Err(e) => {
                tracing::error!(error = %e, "Query execution failed");
                Err(e)
            }
        }
    }
}
