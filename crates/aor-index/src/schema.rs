//! Index schema definition for the aor search index.
//!
//! Each [`SearchField`] becomes one Tantivy field per declared subtype, named
//! `{field}{suffix}`: a transcription is indexed as `marginalia_transcription`,
//! `marginalia_transcription_en` and `marginalia_transcription_it`. Only the
//! field of the first subtype stores the value; the others are index-only.
//!
//! Bookkeeping fields kept alongside:
//! - `page_id`: page the annotation belongs to (string, stored)
//! - `page_key`: page id and image name without leading zeros (string)
//! - `motivation`: wire name of the annotation motivation (string, stored)

use aor_query::{FieldSubtype, SearchField};
use tantivy::schema::{
    Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing, TextOptions,
};

use crate::analyzer::tokenizer_name;

/// Physical fields of one search field.
type Physical = Vec<(FieldSubtype, Field)>;

/// Handles to all fields in the index schema.
#[derive(Debug, Clone)]
pub struct IndexSchema {
    /// The underlying Tantivy schema.
    schema: Schema,
    /// Physical fields, in [`SearchField::ALL`] order.
    fields: Vec<(SearchField, Physical)>,
    /// Page id.
    pub page: Field,
    /// Exact page keys a page scope matches against.
    pub page_key: Field,
    /// Annotation motivation.
    pub motivation: Field,
}

impl IndexSchema {
    /// Creates the index schema with every search field configured.
    pub fn new() -> Self {
        let mut builder = Schema::builder();

        let mut fields = Vec::with_capacity(SearchField::ALL.len());
        for field in SearchField::ALL {
            let mut physical = Vec::with_capacity(field.subtypes().len());
            for (i, &subtype) in field.subtypes().iter().enumerate() {
                let name = format!("{}{}", field.name(), subtype.suffix());
                let handle = match subtype {
                    FieldSubtype::Identifier => builder.add_text_field(&name, STRING | STORED),
                    _ => builder.add_text_field(&name, text_options(subtype, i == 0)),
                };
                physical.push((subtype, handle));
            }
            fields.push((field, physical));
        }

        let page = builder.add_text_field("page_id", STRING | STORED);
        let page_key = builder.add_text_field("page_key", STRING);
        let motivation = builder.add_text_field("motivation", STRING | STORED);

        Self {
            schema: builder.build(),
            fields,
            page,
            page_key,
            motivation,
        }
    }

    /// Returns a reference to the underlying Tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Physical fields of `field` with their subtypes.
    pub fn physical(&self, field: SearchField) -> &[(FieldSubtype, Field)] {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, physical)| physical.as_slice())
            .unwrap_or_default()
    }

    /// The physical field holding the stored value of `field`.
    pub fn stored(&self, field: SearchField) -> Option<Field> {
        self.physical(field).first().map(|&(_, handle)| handle)
    }
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for an analyzed text field.
fn text_options(subtype: FieldSubtype, stored: bool) -> TextOptions {
    let options = TextOptions::default().set_indexing_options(
        TextFieldIndexing::default()
            .set_tokenizer(tokenizer_name(subtype))
            .set_index_option(IndexRecordOption::WithFreqsAndPositions),
    );
    if stored { options.set_stored() } else { options }
}
