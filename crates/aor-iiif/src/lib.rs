//! IIIF resource model for the aor annotation layer.
//!
//! This crate defines the protocol-facing side of the system:
//! - [`Selector`] variants locating an annotation on a page or in a text
//! - [`Annotation`] resources with their sources and targets
//! - [`PresentationUris`] for stable resource identifiers
//! - JSON-LD views for annotations, annotation lists and search responses
//!
//! Nothing here touches the archive or the index; the transformer and the
//! search crates produce and consume these types.

#![warn(missing_docs)]

mod annotation;
mod error;
mod json;
mod search;
mod selector;
mod uri;

pub use annotation::{Annotation, Motivation, Source, Target};
pub use error::IiifError;
pub use json::{AnnotationJson, AnnotationListJson, Depth, PRESENTATION_CONTEXT, annotation_list};
pub use search::{Hit, IGNORED_PARAMETERS, SEARCH_CONTEXT, SearchResponseJson, SearchResultPage};
pub use selector::{
    OA_CONTEXT, Point, Rect, SVG_CONTEXT, Selector, SvgSelector, SvgShape, TextQuote,
};
pub use uri::PresentationUris;
