//! Error types for the aor-index crate.

use std::{io, path::PathBuf};

use aor_archive::ArchiveError;
use aor_query::RequestError;
use aor_transform::TransformError;
use thiserror::Error;

/// Errors that can occur when building or reading the search index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Failed to open or create the index.
    #[error("failed to open index at {path}: {message}")]
    OpenIndex {
        /// Path to the index directory.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to write to the index.
    #[error("failed to write to index: {0}")]
    Write(String),

    /// Failed to commit changes to the index.
    #[error("failed to commit index: {0}")]
    Commit(String),

    /// Failed to execute a query.
    #[error("failed to search index: {0}")]
    Search(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The collection could not be loaded.
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

impl IndexError {
    /// Creates an `OpenIndex` error from a path and Tantivy error.
    pub(crate) fn open_index(path: PathBuf, source: &tantivy::TantivyError) -> Self {
        Self::OpenIndex {
            path,
            message: source.to_string(),
        }
    }

    /// Creates a `Write` error from a Tantivy error.
    pub(crate) fn write(source: &tantivy::TantivyError) -> Self {
        Self::Write(source.to_string())
    }

    /// Creates a `Commit` error from a Tantivy error.
    pub(crate) fn commit(source: &tantivy::TantivyError) -> Self {
        Self::Commit(source.to_string())
    }

    /// Creates a `Search` error from a Tantivy error.
    pub(crate) fn search(source: &tantivy::TantivyError) -> Self {
        Self::Search(source.to_string())
    }
}

/// Errors raised while answering a search or list request.
#[derive(Debug, Error)]
pub enum SearchError {
    /// No index has been built for the collection.
    #[error("no index for collection {collection:?}")]
    UnknownScope {
        /// Collection id.
        collection: String,
    },

    /// The request could not be parsed.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The index could not be read.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The archive could not be read.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// A lookup table could not be loaded.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// The requested page does not exist in the book.
    #[error("book {book}: no page {page:?}")]
    UnknownPage {
        /// Book id.
        book: String,
        /// Requested page.
        page: String,
    },

    /// The response could not be serialized.
    #[error("failed to serialize response: {0}")]
    Serialize(#[from] serde_json::Error),
}
