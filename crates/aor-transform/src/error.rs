//! Error types for the aor-transform crate.

use std::{io, path::PathBuf};

use aor_iiif::IiifError;
use thiserror::Error;

/// Errors raised while turning raw records into annotations.
///
/// A failing record is skipped and reported; no defaults are substituted.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The record names a page the book does not have.
    #[error("book {book}: record refers to unknown page {reference:?}")]
    UnresolvedPage {
        /// Book id.
        book: String,
        /// Page reference found in the record.
        reference: String,
    },

    /// The record uses a position tag with no known region.
    #[error("page {page}: unknown position {position:?}")]
    UnknownPosition {
        /// Page id.
        page: String,
        /// Position tag.
        position: String,
    },

    /// A position region was needed but the page has no dimensions.
    #[error("page {page}: missing image dimensions")]
    MissingDimensions {
        /// Page id.
        page: String,
    },

    /// The recorded outline is not a valid SVG shape.
    #[error("page {page}: invalid outline: {source}")]
    Outline {
        /// Page id.
        page: String,
        /// Underlying selector error.
        source: IiifError,
    },

    /// A lookup table file could not be read.
    #[error("failed to read lookup table {path}: {source}")]
    ReadTable {
        /// Table path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A lookup table file is not a JSON object of strings.
    #[error("failed to parse lookup table {path}: {source}")]
    ParseTable {
        /// Table path.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
