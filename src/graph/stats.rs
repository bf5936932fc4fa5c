//! Read-only database statistics.

use serde::Serialize;

use super::{GraphError, GraphStore, Params, Row, scalar};

pub const COUNT_MOVIES: &str = "MATCH (m:Movie) RETURN count(m) AS count";
pub const COUNT_ACTORS: &str = "MATCH (a:Actor) RETURN count(a) AS count";
pub const COUNT_DIRECTORS: &str = "MATCH (d:Director) RETURN count(d) AS count";

const SAMPLE_MOVIES: &str = "
MATCH (m:Movie)
OPTIONAL MATCH (d:Director)-[:DIRECTED]->(m)
OPTIONAL MATCH (a:Actor)-[:ACTED_IN]->(m)
WITH m, d, collect(a.name) AS actors
RETURN m.title AS title, d.name AS director, actors
LIMIT 3
";

/// Node counts per entity type plus a small sample join.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseStats {
    pub movies: i64,
    pub actors: i64,
    pub directors: i64,
    pub sample_data: Vec<Row>,
}

impl DatabaseStats {
    pub async fn collect(store: &dyn GraphStore) -> Result<Self, GraphError> {
        let movies = scalar(store, COUNT_MOVIES, "count").await?;
        let actors = scalar(store, COUNT_ACTORS, "count").await?;
        let directors = scalar(store, COUNT_DIRECTORS, "count").await?;
        let sample_data = store.run(SAMPLE_MOVIES, &Params::new()).await?;

        Ok(Self {
            movies,
            actors,
            directors,
            sample_data,
        })
    }
}
