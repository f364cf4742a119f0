//! Annotation transformer for aor.
//!
//! Turns raw archive records into IIIF annotation resources:
//! - [`Transformer`] and [`BookTransformer`] apply the per-type rules
//! - [`Decorator`] links known names through the [`LookupTables`]
//! - [`Position`] maps coarse position tags to page regions
//!
//! Records that cannot be transformed are skipped and reported as
//! [`TransformError`]s; defaults are never substituted.

#![warn(missing_docs)]

mod decorator;
mod error;
mod escape;
mod position;
mod transformer;

pub use decorator::{Decorator, LookupTable, LookupTables};
pub use error::TransformError;
pub use escape::{decode_entities, escape_html};
pub use position::Position;
pub use transformer::{BookTransformer, Transformed, Transformer};
