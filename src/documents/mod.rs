//! Per-movie text documents for later semantic retrieval.
//!
//! The loader writes one [`MovieDocument`] per movie; nothing in this crate
//! reads them back beyond a count. Embedding, if any, is the store's concern.

pub mod surreal;

pub use surreal::SurrealDocumentStore;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::loader::MovieRecord;

/// Metadata stored beside each document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub movie_id: String,
    pub title: String,
    pub genre: String,
}

/// One free-text document describing a movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDocument {
    /// `movie_{movie_id}`
    pub id: String,
    pub document: String,
    pub metadata: DocumentMetadata,
}

impl MovieDocument {
    pub fn document_id(movie_id: &str) -> String {
        format!("movie_{movie_id}")
    }
}

impl From<&MovieRecord> for MovieDocument {
    fn from(record: &MovieRecord) -> Self {
        Self {
            id: Self::document_id(&record.movie_id),
            document: format!(
                "Movie: {}\nGenre: {}\nDescription: {}",
                record.title, record.genre, record.description
            ),
            metadata: DocumentMetadata {
                movie_id: record.movie_id.clone(),
                title: record.title.clone(),
                genre: record.genre.clone(),
            },
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync + std::fmt::Debug {
    /// Insert or replace a document under its id.
    async fn add(&self, doc: &MovieDocument) -> Result<()>;

    /// Number of documents currently stored.
    async fn count(&self) -> Result<usize>;
}
