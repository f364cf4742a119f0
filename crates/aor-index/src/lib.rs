//! Tantivy-based annotation index and IIIF search for aor.
//!
//! This crate turns an archive collection into a searchable index and answers
//! IIIF Search requests against it. It handles:
//! - Flattening annotations into index documents, one per annotation
//! - Per-subtype text analysis (plain, stemmed, image names, identifiers)
//! - Whole-collection builds that replace the previous index in one commit
//! - Compiling translated query trees, with scope restrictions, to Tantivy
//! - Hits with context windows and result page serialization
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use aor_config::Config;
//! use aor_iiif::Depth;
//! use aor_index::{SearchService, TracingReporter, serialize};
//!
//! let config = Config::load(Path::new(".")).unwrap();
//! let service = SearchService::from_config(config);
//!
//! service.build("demo", &mut TracingReporter).unwrap();
//!
//! let page = service.search_query_string("demo", "q=sun").unwrap();
//! println!("{}", serialize(&page, Depth::Top).unwrap());
//! ```

#![warn(missing_docs)]

mod analyzer;
mod compile;
mod document;
mod error;
mod indexer;
mod schema;
mod search;
mod serialize;
mod service;
mod writer;

pub use analyzer::{Analyzers, ImageNameTokenizer, build_analyzer, tokenizer_name};
pub use compile::QueryCompiler;
pub use document::AnnotationDocument;
pub use error::{IndexError, SearchError};
pub use indexer::{
    BuildIssue, BuildReport, Indexer, ProgressReporter, SilentReporter, TracingReporter,
};
pub use schema::IndexSchema;
pub use search::{MatchedAnnotation, PageSettings, SearchHits, Searcher};
pub use serialize::{result_id, result_page, serialize};
pub use service::{PageAnnotations, SearchService};
pub use writer::IndexWriter;
