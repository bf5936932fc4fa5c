use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::any::{Any, connect};

use super::{DocumentMetadata, DocumentStore, MovieDocument};
use crate::config::DocumentsConfig;

/// Stored shape; the record id carries the document id.
#[derive(Debug, Serialize, Deserialize)]
struct DocumentRecord {
    document: String,
    metadata: DocumentMetadata,
}

/// Document store on SurrealDB.
///
/// `mem://` gives a process-local store that is empty on every start;
/// `surrealkv://path` or `ws://host:port` persist.
#[derive(Debug)]
pub struct SurrealDocumentStore {
    db: Surreal<Any>,
    collection: String,
}

impl SurrealDocumentStore {
    pub async fn connect(config: &DocumentsConfig) -> Result<Self> {
        let db = connect(config.url.as_str()).await?;
        db.use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await?;

        tracing::info!(
            url = %config.url,
            collection = %config.collection,
            "Document store connected"
        );

        Ok(Self {
            db,
            collection: config.collection.clone(),
        })
    }
}

#[async_trait]
impl DocumentStore for SurrealDocumentStore {
    async fn add(&self, doc: &MovieDocument) -> Result<()> {
        let record = DocumentRecord {
            document: doc.document.clone(),
            metadata: doc.metadata.clone(),
        };

        let _: Option<DocumentRecord> = self
            .db
            .upsert((self.collection.as_str(), doc.id.clone()))
            .content(record)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        let sql = "SELECT count() AS count FROM type::table($table) GROUP ALL";
        let mut response = self
            .db
            .query(sql)
            .bind(("table", self.collection.clone()))
            .await?;
        let count: Option<usize> = response.take((0, "count"))?;
        Ok(count.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DocumentsConfig {
        DocumentsConfig {
            url: "mem://".to_string(),
            namespace: "test".to_string(),
            database: "test".to_string(),
            collection: "movie_descriptions".to_string(),
        }
    }

    fn doc(movie_id: &str, title: &str) -> MovieDocument {
        MovieDocument {
            id: MovieDocument::document_id(movie_id),
            document: format!("Movie: {title}\nGenre: Drama\nDescription: "),
            metadata: DocumentMetadata {
                movie_id: movie_id.to_string(),
                title: title.to_string(),
                genre: "Drama".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_empty_store_counts_zero() {
        let store = SurrealDocumentStore::connect(&config()).await.expect("connect");
        assert_eq!(store.count().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_add_is_keyed_by_document_id() {
        let store = SurrealDocumentStore::connect(&config()).await.expect("connect");

        store.add(&doc("1", "Heat")).await.expect("add");
        store.add(&doc("2", "Se7en")).await.expect("add");
        // Same id again replaces instead of duplicating.
        store.add(&doc("1", "Heat (1995)")).await.expect("re-add");

        assert_eq!(store.count().await.expect("count"), 2);
    }
}
