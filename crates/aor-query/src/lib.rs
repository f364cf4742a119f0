//! Search fields, requests and query translation for aor.
//!
//! This crate owns the search vocabulary shared by the indexer and the search
//! engine:
//!
//! - [`SearchField`]: named index slots with their analysis subtypes
//! - [`SearchCategory`]: the category to field table used for term expansion
//! - [`SearchRequest`] and [`SearchScope`]: parsed client requests
//! - [`Query`]: the translated query tree
//!
//! # Example
//!
//! ```
//! use aor_query::{SearchRequest, translate};
//!
//! let request = SearchRequest::from_query_string("demo", "q=sun").unwrap();
//! let query = translate(&request);
//! assert_eq!(query.leaf_count(), 15);
//! ```

#![warn(missing_docs)]

mod error;
mod field;
mod lexer;
mod query;
mod request;
mod translate;

pub use error::RequestError;
pub use field::{FieldSubtype, SearchCategory, SearchField, TextLanguage, category_for_term};
pub use lexer::split_terms;
pub use query::{BoolOp, Query};
pub use request::{SearchRequest, SearchScope};
pub use translate::translate;
