//! Archive access for aor.
//!
//! Books are stored as one JSON file per book under a collection directory.
//! This crate defines:
//! - the raw record model ([`Book`], [`Page`], [`AnnotationRecord`] and the
//!   per-type record structs)
//! - the [`Archive`] contract used by the transformer and the indexer
//! - [`FsArchive`], the filesystem implementation
//!
//! No checksum or integrity verification is performed.

#![warn(missing_docs)]

mod archive;
mod error;
mod model;

pub use archive::{Archive, FsArchive};
pub use error::ArchiveError;
pub use model::{
    AnnotationRecord, Book, BookCollection, Drawing, Errata, Illustration, Mark, Marginalia,
    Numeral, Page, RawOutline, RawRegion, Symbol, Underline, normalize_page_id,
};
