//! Archive access.
//!
//! The [`Archive`] trait is the narrow contract the rest of the system uses to
//! reach archived books. [`FsArchive`] implements it over a directory tree:
//!
//! ```text
//! {root}/{collection}/{book}.json
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{ArchiveError, Book, BookCollection};

/// File extension of book files.
const BOOK_EXTENSION: &str = "json";

/// Read access to archived collections and books.
pub trait Archive: Send + Sync {
    /// Loads a collection listing.
    fn load_collection(&self, id: &str) -> Result<BookCollection, ArchiveError>;

    /// Loads one book of a collection.
    fn load_book(&self, collection: &str, book: &str) -> Result<Book, ArchiveError>;
}

/// Archive stored as JSON book files on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsArchive {
    /// Directory holding one subdirectory per collection.
    root: PathBuf,
}

impl FsArchive {
    /// Creates an archive rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the archive root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of a collection.
    fn collection_dir(&self, id: &str) -> Result<PathBuf, ArchiveError> {
        check_id(id)?;
        Ok(self.root.join(id))
    }
}

/// Rejects ids that could escape the archive root.
fn check_id(id: &str) -> Result<(), ArchiveError> {
    if id.is_empty() || id == "." || id == ".." || id.contains(['/', '\\']) {
        return Err(ArchiveError::InvalidId(id.to_string()));
    }
    Ok(())
}

impl Archive for FsArchive {
    fn load_collection(&self, id: &str) -> Result<BookCollection, ArchiveError> {
        let dir = self.collection_dir(id)?;
        if !dir.is_dir() {
            return Err(ArchiveError::UnknownCollection(id.to_string()));
        }

        let mut book_ids = Vec::new();
        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ArchiveError::List {
                collection: id.to_string(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(BOOK_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                book_ids.push(stem.to_string());
            }
        }

        Ok(BookCollection {
            id: id.to_string(),
            book_ids,
        })
    }

    fn load_book(&self, collection: &str, book: &str) -> Result<Book, ArchiveError> {
        check_id(book)?;
        let dir = self.collection_dir(collection)?;
        if !dir.is_dir() {
            return Err(ArchiveError::UnknownCollection(collection.to_string()));
        }

        let path = dir.join(format!("{book}.{BOOK_EXTENSION}"));
        if !path.is_file() {
            return Err(ArchiveError::UnknownBook {
                collection: collection.to_string(),
                book: book.to_string(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| ArchiveError::ReadFile {
            path: path.clone(),
            source,
        })?;
        let mut parsed: Book =
            serde_json::from_str(&contents).map_err(|source| ArchiveError::Parse {
                path: path.clone(),
                source,
            })?;

        if parsed.id.is_empty() {
            parsed.id = book.to_string();
        } else if parsed.id != book {
            return Err(ArchiveError::IdMismatch {
                path,
                declared: parsed.id,
            });
        }

        Ok(parsed)
    }
}
