//! Error types for the aor-archive crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while loading collections and books.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No collection with this id exists in the archive.
    #[error("unknown collection: {0}")]
    UnknownCollection(String),

    /// No book with this id exists in the collection.
    #[error("unknown book {book} in collection {collection}")]
    UnknownBook {
        /// Collection id.
        collection: String,
        /// Book id.
        book: String,
    },

    /// An id contains characters that cannot name an archive entry.
    #[error("invalid archive id: {0:?}")]
    InvalidId(String),

    /// A book file could not be read.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path of the book file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A book file is not valid book JSON.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Path of the book file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The id inside a book file disagrees with its file name.
    #[error("book file {path} declares id {declared}")]
    IdMismatch {
        /// Path of the book file.
        path: PathBuf,
        /// Id found in the file.
        declared: String,
    },

    /// Listing a collection directory failed.
    #[error("failed to list collection {collection}: {message}")]
    List {
        /// Collection id.
        collection: String,
        /// Error message.
        message: String,
    },
}
